pub mod dsl;

use std::sync::Arc;

use crate::container::registry::ProviderMap;
use crate::container::Managed;
use crate::key::TypedKey;
use crate::provider::Factory;

pub use dsl::bind;

/// A set of bindings assembled before being handed to a [`Container`].
///
/// Building a module never runs any provider. A module has no shared state
/// with other modules or containers until it is loaded.
///
/// [`Container`]: crate::container::Container
#[derive(Debug, Default)]
pub struct Module {
    providers: ProviderMap,
}

impl Module {
    pub fn new() -> Self {
        Default::default()
    }

    /// Binds `factory` to `key`. A later binding of the same key replaces
    /// this one.
    pub fn bind<T>(&mut self, key: TypedKey<T>, factory: Factory<T>)
    where
        T: Managed,
    {
        if self.providers.insert(key.erase(), Arc::new(factory)).is_some() {
            tracing::trace!(%key, "replaced binding within module");
        }
    }

    /// Merges the bindings of `other` into `self`. Bindings of `other` win.
    pub fn compose(mut self, other: Module) -> Self {
        self.providers.merge(other.providers);
        self
    }

    /// Returns true if `T` is bound in this module.
    pub fn contains<T: Managed>(&self) -> bool {
        self.providers.contains(&crate::key::of::<T>().erase())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub(crate) fn into_providers(self) -> ProviderMap {
        self.providers
    }
}
