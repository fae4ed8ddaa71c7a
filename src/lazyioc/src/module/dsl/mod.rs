//! A small builder DSL on top of [`Module::bind`].
//!
//! ```rust
//! # use std::convert::Infallible;
//! # use std::sync::Arc;
//! # use lazyioc::prelude::*;
//! let mut module = Module::new();
//! bind::<i32>().to_instance(42).set_on(&mut module);
//! bind::<i64>()
//!     .to_closure(|v: Arc<i32>| Ok::<_, Infallible>(i64::from(*v) * 2))
//!     .set_on(&mut module);
//! assert_eq!(module.len(), 2);
//! ```

use std::marker::PhantomData;

use crate::container::injector::{Injector, InjectorError};
use crate::container::Managed;
use crate::key;
use crate::module::Module;
use crate::provider::component::Component;
use crate::provider::{BoxError, Factory, Inject};

/// Starts a binding for `T`.
pub fn bind<T>() -> Binding<T>
where
    T: Managed,
{
    Binding {
        _marker: PhantomData,
    }
}

/// A binding of `T` still waiting for its recipe.
pub struct Binding<T>
where
    T: Managed,
{
    _marker: PhantomData<fn() -> T>,
}

impl<T> Binding<T>
where
    T: Managed,
{
    /// Builds `T` with a closure whose `Arc` arguments are resolved by type.
    pub fn to_closure<C, A>(self, closure: C) -> BoundFactory<T>
    where
        C: Inject<A, Output = T>,
        A: 'static,
    {
        self.to_factory(Factory::from_closure(closure))
    }

    /// Builds `T` with a closure which fetches its dependencies from the
    /// injector by itself.
    pub fn to_raw_closure<C, E>(self, closure: C) -> BoundFactory<T>
    where
        C: Fn(&dyn Injector) -> Result<Result<T, E>, InjectorError> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        self.to_factory(Factory::from_raw(closure))
    }

    /// Hands out clones of a prebuilt value.
    pub fn to_instance(self, instance: T) -> BoundFactory<T>
    where
        T: Clone,
    {
        self.to_factory(Factory::from_instance(instance))
    }

    pub fn to_factory(self, factory: Factory<T>) -> BoundFactory<T> {
        BoundFactory { factory }
    }
}

impl<T> Binding<T>
where
    T: Component,
{
    /// Binds `T` to its own constructor.
    pub fn set_on(self, module: &mut Module) {
        self.to_factory(Factory::from_component()).set_on(module);
    }
}

/// A binding of `T` with its recipe chosen.
pub struct BoundFactory<T>
where
    T: Managed,
{
    factory: Factory<T>,
}

impl<T> BoundFactory<T>
where
    T: Managed,
{
    pub fn set_on(self, module: &mut Module) {
        module.bind(key::of::<T>(), self.factory);
    }
}
