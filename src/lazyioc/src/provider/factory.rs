use std::any;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::container::injector::{Injector, InjectorError};
use crate::container::{Managed, SharedObject};
use crate::key::Key;
use crate::provider::component::Component;
use crate::provider::inject::Inject;
use crate::provider::{BoxError, Provider};

type Recipe<T> =
    dyn Fn(&dyn Injector) -> Result<Result<T, BoxError>, InjectorError> + Send + Sync;

/// Builds objects of `T`.
///
/// A prebuilt value, a closure over `Arc` dependencies, a closure over the
/// injector itself and a [`Component`] all turn into the same kind of
/// factory, so the container stores exactly one recipe per type.
pub struct Factory<T>
where
    T: Managed,
{
    origin: &'static str,
    recipe: Box<Recipe<T>>,
}

impl<T> Factory<T>
where
    T: Managed,
{
    /// Hands out clones of `instance`.
    pub fn from_instance(instance: T) -> Self
    where
        T: Clone,
    {
        Self::new("instance", move |_| Ok(Ok(instance.clone())))
    }

    /// Calls `closure` with its `Arc` arguments resolved by type.
    pub fn from_closure<C, A>(closure: C) -> Self
    where
        C: Inject<A, Output = T>,
        A: 'static,
    {
        Self::new("closure", move |injector| {
            Ok(<C as Inject<A>>::inject(&closure, injector)?.map_err(Into::into))
        })
    }

    /// Calls `closure` with the injector, letting it fetch dependencies
    /// itself.
    pub fn from_raw<C, E>(closure: C) -> Self
    where
        C: Fn(&dyn Injector) -> Result<Result<T, E>, InjectorError> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        Self::new("raw closure", move |injector| {
            Ok(closure(injector)?.map_err(Into::into))
        })
    }

    /// Uses the constructor of a [`Component`].
    pub fn from_component() -> Self
    where
        T: Component,
    {
        Self::new("component", |injector| {
            Ok(T::construct(injector)?.map_err(Into::into))
        })
    }

    fn new<F>(origin: &'static str, recipe: F) -> Self
    where
        F: Fn(&dyn Injector) -> Result<Result<T, BoxError>, InjectorError> + Send + Sync + 'static,
    {
        Self {
            origin,
            recipe: Box::new(recipe),
        }
    }

    /// Runs the recipe for `key`.
    ///
    /// # Errors
    ///
    /// Dependency errors pass through unchanged. A failure of the recipe
    /// itself becomes [`InjectorError::ObjectConstruction`] naming `key`.
    pub fn build(&self, injector: &dyn Injector, key: &Key) -> Result<T, InjectorError> {
        (self.recipe)(injector)?.map_err(|source| InjectorError::ObjectConstruction {
            key: *key,
            source: Arc::from(source),
        })
    }
}

impl<T> Provider for Factory<T>
where
    T: Managed,
{
    fn provide(&self, injector: &dyn Injector, key: &Key) -> Result<SharedObject, InjectorError> {
        let object = self.build(injector, key)?;
        Ok(Arc::new(object))
    }

    fn origin(&self) -> &'static str {
        self.origin
    }
}

impl<T> Debug for Factory<T>
where
    T: Managed,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Factory")
            .field("output", &any::type_name::<T>())
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}
