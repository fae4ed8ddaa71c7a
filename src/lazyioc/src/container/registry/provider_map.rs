use std::collections::hash_map::{self, HashMap};
use std::sync::Arc;

use crate::key::Key;
use crate::provider::Provider;

/// Bindings from keys to providers. At most one provider exists per key and
/// inserting another one replaces it.
#[derive(Debug, Default)]
pub struct ProviderMap {
    providers: HashMap<Key, Arc<dyn Provider>>,
}

impl ProviderMap {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: Key, provider: Arc<dyn Provider>) -> Option<Arc<dyn Provider>> {
        self.providers.insert(key, provider)
    }

    pub fn get(&self, key: &Key) -> Option<&Arc<dyn Provider>> {
        self.providers.get(key)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.providers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Moves every binding of `other` into `self`. Bindings of `other` win.
    pub fn merge(&mut self, other: ProviderMap) {
        self.providers.extend(other.providers);
    }
}

impl IntoIterator for ProviderMap {
    type Item = (Key, Arc<dyn Provider>);

    type IntoIter = hash_map::IntoIter<Key, Arc<dyn Provider>>;

    fn into_iter(self) -> Self::IntoIter {
        self.providers.into_iter()
    }
}
