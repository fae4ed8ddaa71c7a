use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote, quote_spanned};
use syn::spanned::Spanned;
use syn::visit_mut::{self, VisitMut};
use syn::{
    AngleBracketedGenericArguments, Attribute, Error as SynError, FnArg, GenericArgument, Ident,
    ImplItem, ImplItemFn, ItemImpl, PathArguments, Result as SynResult, ReturnType, Signature,
    Type, TypePath,
};

const RETURN_TYPE_MESSAGE: &str =
    "a constructor's return type should be `Self` or `Result<Self, E>`";

#[derive(Debug)]
struct ConstructorData {
    self_type: TypePath,
    identifier: Ident,
    arguments: Vec<ArgumentData>,
    return_type: ReturnTypeData,
}

#[derive(Debug)]
struct ArgumentData {
    span: Span,
    ty: Type,
}

#[derive(Debug)]
enum ReturnTypeData {
    Infallible,
    Result { error_type: Type },
}

struct InjectRemovalVisitor;

impl VisitMut for InjectRemovalVisitor {
    fn visit_impl_item_fn_mut(&mut self, item_fn: &mut ImplItemFn) {
        item_fn.attrs.retain(|attr| !is_inject(attr));
        visit_mut::visit_impl_item_fn_mut(self, item_fn);
    }
}

fn is_inject(attr: &Attribute) -> bool {
    attr.path().is_ident("inject")
}

pub fn expand_implementation(item: TokenStream) -> SynResult<TokenStream2> {
    let mut impls = syn::parse::<ItemImpl>(item).map_err(|err| {
        SynError::new(
            err.span(),
            "`#[component]` should be annotated on the `impl` block",
        )
    })?;

    if let Some((_, path, _)) = &impls.trait_ {
        return Err(SynError::new(
            path.span(),
            "`#[component]` can't be annotated on a trait implementation",
        ));
    }
    if let Some(lt_token) = impls.generics.lt_token {
        return Err(SynError::new(
            lt_token.spans[0],
            "generic components are not supported",
        ));
    }

    let self_type = get_self_type(&impls)?;
    let signature = get_constructor_signature(&impls)?;
    let ctor_data = parse_constructor(self_type, signature)?;
    let expanded = expand_component_implementation(&ctor_data);

    InjectRemovalVisitor.visit_item_impl_mut(&mut impls);

    Ok(quote! {
        #impls
        #expanded
    })
}

fn get_self_type(impls: &ItemImpl) -> SynResult<TypePath> {
    match impls.self_ty.as_ref() {
        Type::Path(ty) if ty.qself.is_none() => Ok(ty.clone()),
        ty => Err(SynError::new(ty.span(), "invalid self type")),
    }
}

fn get_constructor_signature(impls: &ItemImpl) -> SynResult<Signature> {
    let mut ctors = impls.items.iter().filter_map(|item| match item {
        ImplItem::Fn(item_fn) if item_fn.attrs.iter().any(is_inject) => Some(item_fn),
        _ => None,
    });

    let Some(ctor) = ctors.next() else {
        return Err(SynError::new(
            impls.impl_token.span,
            "no associated function is annotated with `#[inject]`",
        ));
    };
    if let Some(other) = ctors.next() {
        return Err(SynError::new(
            other.sig.ident.span(),
            "only one associated function can be annotated with `#[inject]`",
        ));
    }

    let signature = &ctor.sig;
    if let Some(FnArg::Receiver(receiver)) = signature.inputs.first() {
        return Err(SynError::new(
            receiver.self_token.span,
            "method is not allowed to be annotated with `#[inject]`",
        ));
    }
    if let Some(asyncness) = &signature.asyncness {
        return Err(SynError::new(
            asyncness.span,
            "an `async` constructor can't be injected",
        ));
    }
    if let Some(lt_token) = signature.generics.lt_token {
        return Err(SynError::new(
            lt_token.spans[0],
            "a generic constructor can't be injected",
        ));
    }

    Ok(signature.clone())
}

fn parse_constructor(self_type: TypePath, signature: Signature) -> SynResult<ConstructorData> {
    let arguments = signature
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(arg) => Some(ArgumentData {
                span: arg.ty.span(),
                ty: arg.ty.as_ref().clone(),
            }),
            FnArg::Receiver(_) => None,
        })
        .collect();
    let return_type =
        parse_constructor_return_type(&signature.output, &signature.ident, &self_type)?;

    Ok(ConstructorData {
        self_type,
        identifier: signature.ident,
        arguments,
        return_type,
    })
}

fn is_self(ty: &TypePath, self_type: &TypePath) -> bool {
    ty == self_type || ty.qself.is_none() && ty.path.is_ident("Self")
}

fn parse_constructor_return_type(
    output: &ReturnType,
    constructor: &Ident,
    self_type: &TypePath,
) -> SynResult<ReturnTypeData> {
    let ReturnType::Type(_, return_type) = output else {
        return Err(SynError::new(constructor.span(), RETURN_TYPE_MESSAGE));
    };
    let Type::Path(return_type) = return_type.as_ref() else {
        return Err(SynError::new(return_type.span(), RETURN_TYPE_MESSAGE));
    };

    if is_self(return_type, self_type) {
        return Ok(ReturnTypeData::Infallible);
    }

    let segments: Vec<_> = return_type.path.segments.iter().collect();
    let idents: Vec<_> = segments.iter().map(|s| s.ident.to_string()).collect();
    let is_result = matches!(
        idents.iter().map(String::as_str).collect::<Vec<_>>().as_slice(),
        ["Result"] | ["std", "result", "Result"] | ["core", "result", "Result"]
    );

    match segments.last() {
        Some(last) if is_result => parse_result_arguments(&last.arguments, self_type),
        _ => Err(SynError::new(return_type.span(), RETURN_TYPE_MESSAGE)),
    }
}

fn parse_result_arguments(
    arguments: &PathArguments,
    self_type: &TypePath,
) -> SynResult<ReturnTypeData> {
    let PathArguments::AngleBracketed(AngleBracketedGenericArguments { args, .. }) = arguments
    else {
        return Err(SynError::new(arguments.span(), RETURN_TYPE_MESSAGE));
    };

    let mut args = args.iter();
    match (args.next(), args.next(), args.next()) {
        (
            Some(GenericArgument::Type(Type::Path(ok_type))),
            Some(GenericArgument::Type(error_type)),
            None,
        ) if is_self(ok_type, self_type) => Ok(ReturnTypeData::Result {
            error_type: error_type.clone(),
        }),
        _ => Err(SynError::new(arguments.span(), RETURN_TYPE_MESSAGE)),
    }
}

fn expand_component_implementation(ctor_data: &ConstructorData) -> TokenStream2 {
    let self_type = &ctor_data.self_type;
    let constructor = &ctor_data.identifier;

    let error_type = match &ctor_data.return_type {
        ReturnTypeData::Infallible => quote! { ::std::convert::Infallible },
        ReturnTypeData::Result { error_type } => quote! { #error_type },
    };

    let names: Vec<_> = (0..ctor_data.arguments.len())
        .map(|index| format_ident!("__lazyioc_dep_{}", index))
        .collect();

    let resolve_statements = ctor_data
        .arguments
        .iter()
        .zip(&names)
        .map(|(ArgumentData { span, ty }, name)| {
            quote_spanned! { *span =>
                let #name = <#ty as ::lazyioc::container::injector::Dependency>::resolve(injector)?;
            }
        });

    let call = quote! { <#self_type>::#constructor(#(#names),*) };
    let wrapped = match &ctor_data.return_type {
        ReturnTypeData::Infallible => quote! { ::std::result::Result::Ok(#call) },
        ReturnTypeData::Result { .. } => call,
    };

    quote! {
        impl ::lazyioc::provider::component::Component for #self_type {
            type Error = #error_type;

            fn construct<I>(injector: &I) -> ::std::result::Result<
                ::std::result::Result<Self, Self::Error>,
                ::lazyioc::container::injector::InjectorError
            >
            where
                I: ::lazyioc::container::injector::TypedInjector + ?Sized
            {
                #(#resolve_statements)*
                ::std::result::Result::Ok(#wrapped)
            }
        }
    }
}
