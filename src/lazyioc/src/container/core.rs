use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use oneshot::{Receiver, Sender};
use parking_lot::{RwLock, RwLockWriteGuard};

use crate::container::injector::{Injector, InjectorError};
use crate::container::registry::ProviderMap;
use crate::container::SharedObject;
use crate::key::Key;
use crate::provider::Provider;

pub struct ContainerCore {
    providers: RwLock<ProviderMap>,
    state: RwLock<ResolutionState>,
}

impl ContainerCore {
    pub fn new(providers: ProviderMap) -> Self {
        Self {
            providers: RwLock::new(providers),
            state: RwLock::new(ResolutionState::default()),
        }
    }

    /// Inserts or replaces providers. Objects which are already constructed
    /// are left untouched, even if their provider gets replaced.
    pub fn register_all(&self, providers: ProviderMap) {
        let mut registered = self.providers.write();
        for (key, provider) in providers {
            let origin = provider.origin();
            let replaced = registered.insert(key, provider).is_some();
            tracing::debug!(%key, origin, replaced, "bound provider");
        }
    }

    pub fn is_bound(&self, key: &Key) -> bool {
        self.providers.read().contains(key)
    }

    pub fn is_resolved(&self, key: &Key) -> bool {
        self.state.read().objects.contains_key(key)
    }

    pub fn evict(&self, key: &Key) -> bool {
        let evicted = self.state.write().objects.remove(key).is_some();
        if evicted {
            tracing::debug!(%key, "evicted cached object");
        }
        evicted
    }

    fn resolve(&self, key: &Key) -> Result<SharedObject, InjectorError> {
        if let Some(object) = self.state.read().objects.get(key) {
            tracing::trace!(%key, "cache hit");
            return Ok(Arc::clone(object));
        }

        let provider = self.provider_of(key)?;
        let current = thread::current().id();
        let mut state = self.state.write();

        // The object may have been stored between the two locks.
        if let Some(object) = state.objects.get(key) {
            return Ok(Arc::clone(object));
        }

        if state.leads_back_to(key, current) {
            tracing::warn!(%key, "cyclic dependency detected");
            return Err(InjectorError::CyclicDependency { key: *key });
        }

        if let Some(pending) = state.pending.get_mut(key) {
            let (sender, receiver) = oneshot::channel();
            pending.waiters.push((current, sender));
            state.blocked.insert(current, *key);
            drop(state);
            return Self::wait(key, receiver);
        }

        self.construct(state, provider.as_ref(), key, current)
    }

    fn provider_of(&self, key: &Key) -> Result<Arc<dyn Provider>, InjectorError> {
        match self.providers.read().get(key) {
            Some(provider) => Ok(Arc::clone(provider)),
            None => Err(InjectorError::NotFound { key: *key }),
        }
    }

    fn wait(key: &Key, receiver: Receiver<Outcome>) -> Result<SharedObject, InjectorError> {
        tracing::trace!(%key, "waiting for construction on another thread");
        match receiver.recv() {
            Ok(Outcome::Ready(object)) => Ok(object),
            Ok(Outcome::Failed(err)) => Err(err),
            // The constructing thread unwound without settling.
            Err(_) => Err(InjectorError::ConstructionAborted { key: *key }),
        }
    }

    fn construct(
        &self,
        mut state: RwLockWriteGuard<'_, ResolutionState>,
        provider: &dyn Provider,
        key: &Key,
        current: ThreadId,
    ) -> Result<SharedObject, InjectorError> {
        state.pending.insert(*key, Pending::new(current));
        drop(state);

        tracing::debug!(%key, origin = provider.origin(), "constructing object");
        let mut settlement = Settlement {
            core: self,
            key,
            outcome: None,
        };
        let result = provider.provide(self, key);
        settlement.outcome = Some(match &result {
            Ok(object) => Outcome::Ready(Arc::clone(object)),
            Err(err) => {
                tracing::debug!(%key, error = %err, "failed to construct object");
                Outcome::Failed(err.clone())
            }
        });
        drop(settlement);
        result
    }
}

impl Injector for ContainerCore {
    fn dyn_get(&self, key: &Key) -> Result<SharedObject, InjectorError> {
        self.resolve(key)
    }
}

#[derive(Default)]
struct ResolutionState {
    objects: HashMap<Key, SharedObject>,
    pending: HashMap<Key, Pending>,
    /// The key each waiting thread is blocked on.
    blocked: HashMap<ThreadId, Key>,
}

impl ResolutionState {
    /// Returns true if `thread` is constructing `key`, or `key` is being
    /// constructed by a thread which is blocked, directly or through other
    /// threads, on something `thread` constructs. Waiting for `key` would
    /// then never end.
    fn leads_back_to(&self, key: &Key, thread: ThreadId) -> bool {
        let mut next = Some(*key);
        let mut hops = 0;
        while let Some(key) = next {
            let Some(pending) = self.pending.get(&key) else {
                return false;
            };
            if pending.owner == thread {
                return true;
            }
            if hops > self.blocked.len() {
                return false;
            }
            hops += 1;
            next = self.blocked.get(&pending.owner).copied();
        }
        false
    }

    /// Clears the construction of `key` and returns its waiters.
    fn release(&mut self, key: &Key) -> Vec<Sender<Outcome>> {
        let Some(pending) = self.pending.remove(key) else {
            return Vec::new();
        };
        pending
            .waiters
            .into_iter()
            .map(|(thread, sender)| {
                self.blocked.remove(&thread);
                sender
            })
            .collect()
    }
}

struct Pending {
    owner: ThreadId,
    waiters: Vec<(ThreadId, Sender<Outcome>)>,
}

impl Pending {
    fn new(owner: ThreadId) -> Self {
        Self {
            owner,
            waiters: Vec::new(),
        }
    }
}

#[derive(Clone)]
enum Outcome {
    Ready(SharedObject),
    Failed(InjectorError),
}

/// Finishes a construction when dropped: caches the object, wakes the
/// waiters and clears the pending entry. Without an outcome, which happens
/// when the provider panics, the waiters' senders are dropped unsent.
struct Settlement<'a> {
    core: &'a ContainerCore,
    key: &'a Key,
    outcome: Option<Outcome>,
}

impl Drop for Settlement<'_> {
    fn drop(&mut self) {
        let mut state = self.core.state.write();
        if let Some(Outcome::Ready(object)) = &self.outcome {
            state.objects.insert(*self.key, Arc::clone(object));
        }
        let waiters = state.release(self.key);
        drop(state);

        if let Some(outcome) = self.outcome.take() {
            for waiter in waiters {
                let _ = waiter.send(outcome.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::time::Duration;

    use crate::container::injector::TypedInjector;
    use crate::key;
    use crate::provider::Factory;

    use super::*;

    /// Fibonacci-shaped fixture: object `n` depends on `n - 1` and `n - 2`.
    struct Fib<const N: usize> {
        id: usize,
        prev: Option<SharedObject>,
        prev2: Option<SharedObject>,
    }

    fn fib_provider<const N: usize>() -> Arc<dyn Provider> {
        Arc::new(Factory::from_raw(|injector| {
            let dependency = |offset: usize| -> Result<Option<SharedObject>, InjectorError> {
                match N.checked_sub(offset) {
                    Some(0) | None => Ok(None),
                    Some(n) => injector.dyn_get(&fib_key(n)).map(Some),
                }
            };
            Ok(Ok::<_, Infallible>(Fib::<N> {
                id: N,
                prev: dependency(1)?,
                prev2: dependency(2)?,
            }))
        }))
    }

    fn fib_key(n: usize) -> Key {
        match n {
            1 => key::of::<Fib<1>>().erase(),
            2 => key::of::<Fib<2>>().erase(),
            3 => key::of::<Fib<3>>().erase(),
            4 => key::of::<Fib<4>>().erase(),
            _ => unreachable!("the fixture only goes up to 4"),
        }
    }

    fn fib_providers() -> ProviderMap {
        let mut providers = ProviderMap::new();
        providers.insert(fib_key(1), fib_provider::<1>());
        providers.insert(fib_key(2), fib_provider::<2>());
        providers.insert(fib_key(3), fib_provider::<3>());
        providers.insert(fib_key(4), fib_provider::<4>());
        providers
    }

    fn single<T, F>(factory: F) -> ProviderMap
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn Injector) -> Result<Result<T, &'static str>, InjectorError>,
        F: Send + Sync + 'static,
    {
        let mut providers = ProviderMap::new();
        providers.insert(key::of::<T>().erase(), Arc::new(Factory::from_raw(factory)));
        providers
    }

    fn assert_settled(core: &ContainerCore) {
        let state = core.state.read();
        assert!(state.pending.is_empty());
        assert!(state.blocked.is_empty());
    }

    struct SelfReferencing {
        _inner: Arc<SelfReferencing>,
    }

    struct Chicken(#[allow(dead_code)] Arc<Egg>);

    struct Egg(#[allow(dead_code)] Arc<Chicken>);

    #[test]
    fn container_core_get_succeeds_and_caches() {
        let core = ContainerCore::new(fib_providers());

        let fib4 = core.get::<Fib<4>>().unwrap();
        let fib3 = core.get::<Fib<3>>().unwrap();
        assert_eq!(fib4.id, 4);
        assert_eq!(fib3.id, 3);

        let fib3_of_fib4 = fib4.prev.clone().unwrap().downcast::<Fib<3>>().unwrap();
        assert!(Arc::ptr_eq(&fib3_of_fib4, &fib3));

        let fib2_of_fib4 = fib4.prev2.clone().unwrap().downcast::<Fib<2>>().unwrap();
        let fib2_of_fib3 = fib3.prev.clone().unwrap().downcast::<Fib<2>>().unwrap();
        assert!(Arc::ptr_eq(&fib2_of_fib4, &fib2_of_fib3));

        assert!(Arc::ptr_eq(&core.get::<Fib<4>>().unwrap(), &fib4));
        assert_settled(&core);
    }

    #[test]
    fn container_core_get_fails_when_key_not_found() {
        let core = ContainerCore::new(ProviderMap::new());
        let key = key::of::<i32>().erase();

        assert!(matches!(
            core.get::<i32>(),
            Err(InjectorError::NotFound { key: missing }) if missing == key
        ));
        assert!(!core.is_resolved(&key));
    }

    #[test]
    fn container_core_get_fails_when_there_exists_cyclic_dependency() {
        let core = ContainerCore::new(single(|injector| {
            Ok(Ok(SelfReferencing {
                _inner: injector.get()?,
            }))
        }));
        let key = key::of::<SelfReferencing>().erase();

        assert!(matches!(
            core.get::<SelfReferencing>(),
            Err(InjectorError::CyclicDependency { key: cyclic }) if cyclic == key
        ));
        assert!(!core.is_resolved(&key));
        assert_settled(&core);
    }

    #[test]
    fn container_core_get_fails_when_cycle_spans_two_threads() {
        let mut providers = single(|injector| {
            thread::sleep(Duration::from_millis(100));
            Ok(Ok(Chicken(injector.get()?)))
        });
        providers.merge(single(|injector| {
            thread::sleep(Duration::from_millis(100));
            Ok(Ok(Egg(injector.get()?)))
        }));
        let core = ContainerCore::new(providers);
        let barrier = Barrier::new(2);

        let (chicken, egg) = thread::scope(|scope| {
            let chicken = scope.spawn(|| {
                barrier.wait();
                core.get::<Chicken>().map(|_| ())
            });
            let egg = scope.spawn(|| {
                barrier.wait();
                core.get::<Egg>().map(|_| ())
            });
            (chicken.join().unwrap(), egg.join().unwrap())
        });

        assert!(matches!(chicken, Err(InjectorError::CyclicDependency { .. })));
        assert!(matches!(egg, Err(InjectorError::CyclicDependency { .. })));
        assert!(!core.is_resolved(&key::of::<Chicken>().erase()));
        assert!(!core.is_resolved(&key::of::<Egg>().erase()));
        assert_settled(&core);
    }

    #[test]
    fn container_core_get_constructs_once_under_contention() {
        const THREADS: usize = 16;
        let constructed = Arc::new(AtomicUsize::new(0));
        let core = Arc::new(ContainerCore::new(single({
            let constructed = Arc::clone(&constructed);
            move |_| {
                constructed.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(20));
                Ok(Ok(String::from("shared")))
            }
        })));

        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let core = Arc::clone(&core);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    core.get::<String>().unwrap()
                })
            })
            .collect();

        let objects: Vec<Arc<String>> = handles
            .into_iter()
            .map(|h| h.join().expect("Each thread should not `panic!()`"))
            .collect();

        assert_eq!(constructed.load(Ordering::SeqCst), 1);
        assert!(objects.iter().all(|object| Arc::ptr_eq(object, &objects[0])));
        assert_settled(&core);
    }

    #[test]
    fn container_core_waiters_receive_construction_errors() {
        const THREADS: usize = 8;
        let core = Arc::new(ContainerCore::new(single(|_| {
            thread::sleep(Duration::from_millis(20));
            Ok(Err::<String, _>("unavailable"))
        })));

        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let core = Arc::clone(&core);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    core.get::<String>()
                })
            })
            .collect();

        for handle in handles {
            let res = handle.join().expect("Each thread should not `panic!()`");
            assert!(matches!(res, Err(InjectorError::ObjectConstruction { .. })));
        }
        assert!(!core.is_resolved(&key::of::<String>().erase()));
        assert_settled(&core);
    }

    #[test]
    fn container_core_recovers_after_provider_panics() {
        let core = ContainerCore::new(single(|_| -> Result<Result<String, _>, _> {
            panic!("provider exploded")
        }));

        let res = panic::catch_unwind(AssertUnwindSafe(|| core.get::<String>()));
        assert!(res.is_err());
        assert_settled(&core);
    }

    #[test]
    fn container_core_waiter_is_released_when_provider_panics() {
        let entered = Arc::new(Barrier::new(2));
        let first_call = AtomicBool::new(true);
        let core = ContainerCore::new(single({
            let entered = Arc::clone(&entered);
            move |_| {
                if first_call.swap(false, Ordering::SeqCst) {
                    entered.wait();
                    thread::sleep(Duration::from_millis(100));
                    panic!("provider exploded");
                }
                Ok(Ok(String::from("recovered")))
            }
        }));
        let key = key::of::<String>().erase();

        let (constructor, waiter) = thread::scope(|scope| {
            let constructor = scope.spawn(|| core.get::<String>());
            let waiter = scope.spawn(|| {
                entered.wait();
                core.get::<String>()
            });
            (constructor.join(), waiter.join())
        });

        assert!(constructor.is_err());
        assert!(matches!(
            waiter.unwrap(),
            Err(InjectorError::ConstructionAborted { key: aborted }) if aborted == key
        ));
        assert_settled(&core);
        assert_eq!(core.get::<String>().unwrap().as_str(), "recovered");
    }

    #[test]
    fn container_core_register_all_keeps_cached_objects() {
        let key = key::of::<i32>().erase();
        let mut providers = ProviderMap::new();
        providers.insert(key, Arc::new(Factory::from_instance(1i32)));
        let core = ContainerCore::new(providers);
        assert_eq!(*core.get::<i32>().unwrap(), 1);

        let mut replacement = ProviderMap::new();
        replacement.insert(key, Arc::new(Factory::from_instance(2i32)));
        core.register_all(replacement);
        assert_eq!(*core.get::<i32>().unwrap(), 1);

        assert!(core.evict(&key));
        assert!(!core.evict(&key));
        assert_eq!(*core.get::<i32>().unwrap(), 2);
    }
}
