use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use syn::{Error as SynError, Result as SynResult};

/// Checks the arguments of `#[component(...)]`. The attribute takes none.
pub fn check_attributes(attr: TokenStream) -> SynResult<()> {
    if attr.is_empty() {
        return Ok(());
    }

    let attr = TokenStream2::from(attr);
    let span = attr
        .clone()
        .into_iter()
        .next()
        .map_or_else(Span::call_site, |token| token.span());
    Err(SynError::new(
        span,
        "`#[component]` doesn't accept any argument",
    ))
}
