mod attrs;
mod impls;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::Result as SynResult;

/// Implements `lazyioc::provider::component::Component` for the type of an
/// `impl` block.
///
/// Exactly one associated function in the block must be marked with
/// `#[inject]`. Its arguments are `Arc<D>` dependencies resolved by type, and
/// it returns `Self` or `Result<Self, E>`.
#[proc_macro_attribute]
pub fn component(attr: TokenStream, item: TokenStream) -> TokenStream {
    match component_impl(attr, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn component_impl(attr: TokenStream, item: TokenStream) -> SynResult<TokenStream2> {
    attrs::check_attributes(attr)?;
    impls::expand_implementation(item)
}
