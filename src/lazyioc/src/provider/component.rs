use crate::container::injector::{InjectorError, TypedInjector};
use crate::container::Managed;
use crate::provider::BoxError;

/// A type that knows how to build itself from its dependencies.
///
/// The [`component`] attribute writes this implementation from a plain
/// constructor. Written by hand it looks like this:
///
/// ```rust
/// # use std::convert::Infallible;
/// # use std::sync::Arc;
/// # use lazyioc::prelude::*;
/// struct Greeter {
///     name: Arc<String>,
/// }
///
/// impl Component for Greeter {
///     type Error = Infallible;
///
///     fn construct<I>(injector: &I) -> Result<Result<Self, Self::Error>, InjectorError>
///     where
///         I: TypedInjector + ?Sized,
///     {
///         let name = injector.get::<String>()?;
///         Ok(Ok(Self { name }))
///     }
/// }
///
/// let mut module = Module::new();
/// bind::<String>().to_instance("world".to_string()).set_on(&mut module);
/// bind::<Greeter>().set_on(&mut module);
///
/// let greeter = Container::init(module).get::<Greeter>().unwrap();
/// assert_eq!(greeter.name.as_str(), "world");
/// ```
///
/// [`component`]: crate::component
pub trait Component: Managed + Sized {
    type Error: Into<BoxError>;

    /// Fetches the dependencies from `injector` and builds `Self`.
    ///
    /// # Errors
    ///
    /// Returns an error if a dependency can't be resolved. The constructor's
    /// own error comes back inside the outer [`Ok`].
    fn construct<I>(injector: &I) -> Result<Result<Self, Self::Error>, InjectorError>
    where
        I: TypedInjector + ?Sized;
}
