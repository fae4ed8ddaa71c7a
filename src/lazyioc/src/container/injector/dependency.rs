use std::sync::Arc;

use crate::container::injector::{InjectorError, TypedInjector};
use crate::container::Managed;

/// A constructor argument that can be fetched from an injector.
///
/// Only `Arc<T>` is a [`Dependency`]: every managed object is a singleton,
/// so dependents always receive a shared handle to it.
pub trait Dependency: Sized + Send + Sync + 'static {
    /// Fetches the dependency from `injector`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dependency can't be resolved.
    fn resolve<I>(injector: &I) -> Result<Self, InjectorError>
    where
        I: TypedInjector + ?Sized;
}

impl<T> Dependency for Arc<T>
where
    T: Managed,
{
    fn resolve<I>(injector: &I) -> Result<Self, InjectorError>
    where
        I: TypedInjector + ?Sized,
    {
        injector.get::<T>()
    }
}
