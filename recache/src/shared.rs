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

use std::{
    hash::{BuildHasher, Hash},
    sync::Arc,
};

use ahash::RandomState;
use equivalent::Equivalent;
use parking_lot::{Mutex, MutexGuard};
use recache_common::{
    code::{Key, Value},
    error::Result,
};
use recache_memory::Mru;

/// [`Mru`] shared across threads behind a single lock.
///
/// Every operation holds the lock for its whole duration, eviction listeners included. A listener
/// must therefore never call back into the same `SharedCache`.
pub struct SharedCache<K, V, S = RandomState> {
    inner: Arc<Mutex<Mru<K, V, S>>>,
}

impl<K, V, S> Clone for SharedCache<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V, S> std::fmt::Debug for SharedCache<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedCache").field(&*self.inner.lock()).finish()
    }
}

impl<K, V, S> From<Mru<K, V, S>> for SharedCache<K, V, S> {
    fn from(mru: Mru<K, V, S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(mru)),
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Key,
    V: Value,
{
    /// Create a shared cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self> {
        Mru::new(capacity).map(Self::from)
    }
}

impl<K, V, S> SharedCache<K, V, S>
where
    K: Key,
    V: Value,
    S: BuildHasher,
{
    /// Lock the cache for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, Mru<K, V, S>> {
        self.inner.lock()
    }

    /// See [`Mru::put`].
    pub fn put(&self, key: K, value: V) -> Result<()> {
        self.inner.lock().put(key, value)
    }

    /// Clone the value of `key` out of the cache and mark it most-recently-used.
    pub fn get_cloned<Q>(&self, key: &Q) -> Option<V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// See [`Mru::remove`].
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    /// See [`Mru::remove_all`].
    pub fn remove_all(&self) {
        self.inner.lock().remove_all()
    }

    /// Count of cached entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if no entry is cached.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test_log::test]
    fn test_shared_across_threads() {
        const THREADS: u64 = 4;
        const PUTS: u64 = 250;

        let cache = SharedCache::<u64, u64>::new(64).unwrap();
        let evicted = Arc::new(AtomicUsize::new(0));
        let e = evicted.clone();
        cache.lock().add_listener(Arc::new(move |_: &u64, _: &u64| -> Result<()> {
            e.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }));

        std::thread::scope(|s| {
            for t in 0..THREADS {
                let cache = cache.clone();
                s.spawn(move || {
                    for i in 0..PUTS {
                        let key = t * PUTS + i;
                        cache.put(key, key * 10).unwrap();
                        assert!(cache.len() <= 64);
                    }
                });
            }
        });

        assert_eq!(cache.len(), 64);
        assert_eq!(evicted.load(Ordering::Relaxed), (THREADS * PUTS) as usize - 64);
        cache.lock().check_invariants();
        let keys = cache.lock().keys_by_recency().copied().collect::<Vec<_>>();
        assert_eq!(keys.len(), 64);
        for key in keys {
            assert_eq!(cache.get_cloned(&key), Some(key * 10));
        }

        assert_eq!(cache.remove(&u64::MAX), None);
        cache.remove_all();
        assert!(cache.is_empty());
    }
}
