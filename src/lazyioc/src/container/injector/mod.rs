mod dependency;

use std::error::Error;
use std::sync::Arc;

use snafu::prelude::*;

use crate::container::{Managed, SharedObject};
use crate::key::{self, Key, TypedKey};

pub use dependency::Dependency;

/// Something that resolves objects by their [`Key`].
#[cfg_attr(test, mockall::automock)]
pub trait Injector: Send + Sync {
    /// Returns the object identified by `key`, constructing it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if no provider is bound to `key`, the object depends
    /// on itself, or its provider fails.
    fn dyn_get(&self, key: &Key) -> Result<SharedObject, InjectorError>;
}

pub trait TypedInjector: Injector {
    /// Returns the shared instance of `T`.
    ///
    /// # Errors
    ///
    /// See [`Injector::dyn_get`].
    fn get<T>(&self) -> Result<Arc<T>, InjectorError>
    where
        T: Managed,
    {
        self.get_by_key(key::of::<T>())
    }

    /// Returns the shared instance identified by a typed key.
    ///
    /// # Errors
    ///
    /// See [`Injector::dyn_get`].
    fn get_by_key<T>(&self, key: TypedKey<T>) -> Result<Arc<T>, InjectorError>
    where
        T: Managed,
    {
        let key = key.erase();
        self.dyn_get(&key)?
            .downcast::<T>()
            .map_err(|_| InjectorError::TypeMismatch { key })
    }

    fn upcast_dyn(&self) -> &dyn Injector;
}

impl<T> TypedInjector for T
where
    T: Injector,
{
    fn upcast_dyn(&self) -> &dyn Injector {
        self
    }
}

impl TypedInjector for dyn Injector + '_ {
    fn upcast_dyn(&self) -> &dyn Injector {
        self
    }
}

#[derive(Debug, Clone, Snafu)]
#[non_exhaustive]
pub enum InjectorError {
    #[snafu(display("could not find any binding for {key}"))]
    #[non_exhaustive]
    NotFound { key: Key },
    #[snafu(display("could not construct the object {key} which depends on itself somehow"))]
    #[non_exhaustive]
    CyclicDependency { key: Key },
    #[snafu(display("could not construct the object {key}"))]
    #[non_exhaustive]
    ObjectConstruction {
        key: Key,
        source: Arc<dyn Error + Send + Sync>,
    },
    #[snafu(display("construction of the object {key} was aborted by a panic"))]
    #[non_exhaustive]
    ConstructionAborted { key: Key },
    #[snafu(display("the object bound to {key} has an unexpected type"))]
    #[non_exhaustive]
    TypeMismatch { key: Key },
}

impl InjectorError {
    /// Returns the key of the object whose resolution failed.
    pub fn key(&self) -> &Key {
        match self {
            Self::NotFound { key }
            | Self::CyclicDependency { key }
            | Self::ObjectConstruction { key, .. }
            | Self::ConstructionAborted { key }
            | Self::TypeMismatch { key } => key,
        }
    }
}
