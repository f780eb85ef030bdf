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

use std::{hash::BuildHasher, sync::Arc};

use recache_common::{
    code::{Key, Value},
    error::Result,
};

use crate::{listener::EvictionListener, mru::Mru};

/// Object-safe interface of a cache policy, used by callers that pick the policy at wiring time.
///
/// See [`Mru`] for the semantics of each operation.
pub trait CachePolicy<K, V>: Send + Sync + 'static {
    /// Insert or overwrite a value, evicting if needed.
    fn put(&mut self, key: K, value: V) -> Result<()>;

    /// Get a value and mark it most-recently-used.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Get a value without changing its recency.
    fn peek(&self, key: &K) -> Option<&V>;

    /// Returns `true` if the key is cached.
    fn contains(&self, key: &K) -> bool {
        self.peek(key).is_some()
    }

    /// Remove a value. No-op if absent.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Remove every value.
    fn remove_all(&mut self);

    /// Iterate over the cached values in arbitrary order.
    fn elements(&self) -> Box<dyn Iterator<Item = &V> + '_>;

    /// Iterate mutably over the cached values in arbitrary order.
    fn values_mut(&mut self) -> Box<dyn Iterator<Item = &mut V> + '_>;

    /// Register an eviction listener.
    fn add_listener(&mut self, listener: Arc<dyn EvictionListener<K, V>>) -> bool;

    /// Unregister an eviction listener.
    fn remove_listener(&mut self, listener: &Arc<dyn EvictionListener<K, V>>) -> bool;

    /// Count of cached values.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is cached.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Max count of cached values.
    fn capacity(&self) -> usize;
}

impl<K, V, S> CachePolicy<K, V> for Mru<K, V, S>
where
    K: Key,
    V: Value,
    S: BuildHasher + Send + Sync + 'static,
{
    fn put(&mut self, key: K, value: V) -> Result<()> {
        Mru::put(self, key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        Mru::get(self, key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        Mru::peek(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        Mru::contains(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        Mru::remove(self, key)
    }

    fn remove_all(&mut self) {
        Mru::remove_all(self)
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &V> + '_> {
        Box::new(Mru::elements(self))
    }

    fn values_mut(&mut self) -> Box<dyn Iterator<Item = &mut V> + '_> {
        Box::new(Mru::values_mut(self))
    }

    fn add_listener(&mut self, listener: Arc<dyn EvictionListener<K, V>>) -> bool {
        Mru::add_listener(self, listener)
    }

    fn remove_listener(&mut self, listener: &Arc<dyn EvictionListener<K, V>>) -> bool {
        Mru::remove_listener(self, listener)
    }

    fn len(&self) -> usize {
        Mru::len(self)
    }

    fn capacity(&self) -> usize {
        Mru::capacity(self)
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::test_utils::RejectingListener;

    #[test]
    fn test_policy_object() {
        let mut policy: Box<dyn CachePolicy<u64, u64>> = Box::new(Mru::new(2).unwrap());
        let rejecting = Arc::new(RejectingListener::default());

        policy.put(1, 10).unwrap();
        policy.put(2, 20).unwrap();
        assert_eq!(policy.get(&1), Some(&10));
        policy.put(3, 30).unwrap();
        assert_eq!(policy.get(&2), None);
        assert!(policy.contains(&3));
        assert_eq!(policy.peek(&3), Some(&30));

        assert!(policy.add_listener(rejecting.clone()));
        assert!(policy.put(4, 40).is_err());
        assert_eq!(rejecting.attempts(), 1);
        assert_eq!(policy.len(), 2);
        assert_eq!(policy.capacity(), 2);

        policy.values_mut().for_each(|v| *v += 1);
        assert_eq!(policy.elements().copied().sorted().collect_vec(), vec![11, 31]);

        assert_eq!(policy.remove(&1), Some(11));
        policy.remove_all();
        assert!(policy.is_empty());
    }
}
