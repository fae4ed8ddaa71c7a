use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::container::core::ContainerCore;
use crate::container::injector::{Injector, InjectorError};
use crate::container::registry::ProviderMap;
use crate::container::{Managed, SharedObject};
use crate::key::{self, Key};
use crate::module::Module;

/// A registry of bindings which resolves objects lazily and caches each of
/// them as a singleton.
///
/// A [`Container`] is a cheap handle: clones share the same bindings and the
/// same cached objects, while containers created separately never share
/// anything.
///
/// # Examples
///
/// ```rust
/// # use std::convert::Infallible;
/// # use std::sync::Arc;
/// # use lazyioc::prelude::*;
/// let mut module = Module::new();
/// bind::<u16>().to_instance(8080).set_on(&mut module);
/// bind::<String>()
///     .to_closure(|port: Arc<u16>| Ok::<_, Infallible>(format!("127.0.0.1:{port}")))
///     .set_on(&mut module);
///
/// let container = Container::init(module);
/// let address = container.get::<String>().unwrap();
/// assert_eq!(address.as_str(), "127.0.0.1:8080");
/// assert!(Arc::ptr_eq(&address, &container.get::<String>().unwrap()));
/// ```
#[derive(Clone)]
pub struct Container {
    core: Arc<ContainerCore>,
}

impl Container {
    /// Creates a container without any binding.
    pub fn new() -> Self {
        Self {
            core: Arc::new(ContainerCore::new(ProviderMap::new())),
        }
    }

    /// Creates a container holding the bindings of `module`.
    pub fn init(module: Module) -> Self {
        let container = Self::new();
        container.load_module(module);
        container
    }

    /// Registers every binding of `module`, replacing earlier bindings of the
    /// same types.
    ///
    /// Objects that are already cached stay cached even if their binding gets
    /// replaced. Use [`Container::evict`] to have them rebuilt from the new
    /// binding.
    pub fn load_module(&self, module: Module) {
        tracing::debug!(bindings = module.len(), "loading module");
        self.core.register_all(module.into_providers());
    }

    /// Returns true if a binding for `T` exists.
    pub fn is_bound<T: Managed>(&self) -> bool {
        self.core.is_bound(&key::of::<T>().erase())
    }

    /// Returns true if the object of `T` is constructed and cached.
    pub fn is_resolved<T: Managed>(&self) -> bool {
        self.core.is_resolved(&key::of::<T>().erase())
    }

    /// Drops the cached object of `T`, if any, so that the next request
    /// constructs it again from the current binding. Objects already handed
    /// out, including those held by dependents, are not affected.
    ///
    /// Returns true if an object was cached.
    pub fn evict<T: Managed>(&self) -> bool {
        self.core.evict(&key::of::<T>().erase())
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Container").finish_non_exhaustive()
    }
}

impl Injector for Container {
    fn dyn_get(&self, key: &Key) -> Result<SharedObject, InjectorError> {
        self.core.dyn_get(key)
    }
}
