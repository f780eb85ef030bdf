// Copyright 2026 recache Project Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;

use recache_common::error::Result;

/// Observer consulted before the cache drops its least-recently-used entry to make room.
///
/// Listeners run synchronously, in registration order, while the victim is still fully present
/// in the cache. Returning an error vetoes the eviction: the insertion that triggered it fails
/// with that error and the cache is left untouched.
pub trait EvictionListener<K, V>: Send + Sync + 'static {
    /// Called with the victim's key and current value before it is evicted.
    fn on_evict(&self, key: &K, value: &V) -> Result<()>;
}

impl<K, V, F> EvictionListener<K, V> for F
where
    F: Fn(&K, &V) -> Result<()> + Send + Sync + 'static,
{
    fn on_evict(&self, key: &K, value: &V) -> Result<()> {
        self(key, value)
    }
}

/// Ordered set of eviction listeners.
///
/// Listeners are identified by the allocation behind their [`Arc`], so registering the same `Arc`
/// twice keeps a single entry at its original position.
pub struct ListenerRegistry<K, V> {
    listeners: Vec<Arc<dyn EvictionListener<K, V>>>,
}

impl<K, V> Default for ListenerRegistry<K, V> {
    fn default() -> Self {
        Self { listeners: vec![] }
    }
}

impl<K, V> std::fmt::Debug for ListenerRegistry<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<K, V> ListenerRegistry<K, V>
where
    K: 'static,
    V: 'static,
{
    /// Register a listener. Returns `false` if it was already registered.
    pub fn add(&mut self, listener: Arc<dyn EvictionListener<K, V>>) -> bool {
        if self.position(&listener).is_some() {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn remove(&mut self, listener: &Arc<dyn EvictionListener<K, V>>) -> bool {
        match self.position(listener) {
            Some(pos) => {
                self.listeners.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Notify every listener in registration order, stopping at the first rejection.
    pub fn notify(&self, key: &K, value: &V) -> Result<()> {
        self.listeners
            .iter()
            .try_for_each(|listener| listener.on_evict(key, value))
    }

    /// Count of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn position(&self, listener: &Arc<dyn EvictionListener<K, V>>) -> Option<usize> {
        let target = Arc::as_ptr(listener) as *const ();
        self.listeners
            .iter()
            .position(|l| Arc::as_ptr(l) as *const () == target)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use recache_common::error::Error;

    use super::*;

    #[test]
    fn test_set_semantics() {
        let mut registry = ListenerRegistry::<u64, u64>::default();
        let a: Arc<dyn EvictionListener<u64, u64>> = Arc::new(|_: &u64, _: &u64| -> Result<()> { Ok(()) });
        let b: Arc<dyn EvictionListener<u64, u64>> = Arc::new(|_: &u64, _: &u64| -> Result<()> { Ok(()) });

        assert!(registry.add(a.clone()));
        assert!(!registry.add(a.clone()));
        assert!(registry.add(b.clone()));
        assert_eq!(registry.len(), 2);

        assert!(registry.remove(&a));
        assert!(!registry.remove(&a));
        assert_eq!(registry.len(), 1);
        assert!(registry.remove(&b));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_notify_stops_at_first_rejection() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ListenerRegistry::<u64, u64>::default();

        let c = calls.clone();
        registry.add(Arc::new(move |_: &u64, _: &u64| -> Result<()> {
            c.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }));
        registry.add(Arc::new(|k: &u64, _: &u64| -> Result<()> {
            Err(Error::eviction_rejected(format!("key {k} is pinned")))
        }));
        let c = calls.clone();
        registry.add(Arc::new(move |_: &u64, _: &u64| -> Result<()> {
            c.fetch_add(100, Ordering::Relaxed);
            Ok(())
        }));

        let err = registry.notify(&7, &0).unwrap_err();
        assert!(err.is_eviction_rejected());
        assert_eq!(err.to_string(), "eviction rejected: key 7 is pinned");
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    fn rejecting_registry<K, V>(pinned: K) -> ListenerRegistry<K, V>
    where
        K: PartialEq + Send + Sync + 'static,
        V: 'static,
    {
        let mut registry = ListenerRegistry::default();
        registry.add(Arc::new(move |k: &K, _: &V| -> Result<()> {
            if *k == pinned {
                Err(Error::eviction_rejected("pinned"))
            } else {
                Ok(())
            }
        }));
        registry
    }

    #[test]
    fn test_notify_generic_owned_types() {
        let registry = rejecting_registry::<String, Vec<u8>>("a".to_string());
        assert_eq!(registry.len(), 1);
        assert!(registry.notify(&"b".to_string(), &vec![1, 2]).is_ok());
        assert!(registry.notify(&"a".to_string(), &vec![]).unwrap_err().is_eviction_rejected());
    }
}
