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

//! Fixed-capacity cache that evicts the least-recently-used entry.
//!
//! Entries live in the nodes of a [`RecencyList`], ordered from least-recently-used to
//! most-recently-used, and a [`KeyIndex`] maps each key to its node. Both are updated together
//! on every mutation.
//!
//! When an absent key is inserted into a full cache, the head of the list is the unique victim.
//! Every registered [`EvictionListener`] is consulted first with the victim untouched; only when
//! all of them accept is the victim unlinked and unindexed, and its node then recycled in place
//! for the new entry.
//!
//! [`Mru`] is not synchronized. Share it across threads through `recache::SharedCache`, or by
//! guarding every operation with one `parking_lot::Mutex`.

use std::{
    hash::{BuildHasher, Hash},
    sync::Arc,
};

use ahash::RandomState;
use equivalent::Equivalent;
use recache_common::{
    code::{Key, Value},
    error::{Error, Result},
    slab::Token,
    strict_assert, strict_assert_eq,
};

use crate::{
    index::KeyIndex,
    list::RecencyList,
    listener::{EvictionListener, ListenerRegistry},
};

/// Cached key/value pair. The recency links live in the [`RecencyList`] node that holds it.
#[derive(Debug)]
struct CacheEntry<K, V> {
    key: K,
    value: V,
    hash: u64,
}

/// Fixed-capacity least-recently-used cache with vetoable eviction.
pub struct Mru<K, V, S = RandomState> {
    list: RecencyList<CacheEntry<K, V>>,
    index: KeyIndex<S>,
    listeners: ListenerRegistry<K, V>,
    capacity: usize,
}

impl<K, V, S> std::fmt::Debug for Mru<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mru")
            .field("capacity", &self.capacity)
            .field("len", &self.list.len())
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl<K, V> Mru<K, V>
where
    K: Key,
    V: Value,
{
    /// Create a cache holding at most `capacity` entries.
    ///
    /// Returns a config error if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_hasher(capacity, RandomState::default())
    }
}

impl<K, V, S> Mru<K, V, S>
where
    K: Key,
    V: Value,
    S: BuildHasher,
{
    /// Create a cache holding at most `capacity` entries, hashing keys with `hash_builder`.
    ///
    /// Returns a config error if `capacity` is zero.
    pub fn with_hasher(capacity: usize, hash_builder: S) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::config("MRU cache must contain at least one entry"));
        }
        Ok(Self {
            list: RecencyList::with_capacity(capacity),
            index: KeyIndex::with_capacity_and_hasher(capacity, hash_builder),
            listeners: ListenerRegistry::default(),
            capacity,
        })
    }

    /// Insert or overwrite the value of `key` and mark it most-recently-used.
    ///
    /// Inserting an absent key into a full cache evicts the least-recently-used entry first. If
    /// a listener rejects that eviction, its error is returned and the cache is unchanged.
    pub fn put(&mut self, key: K, value: V) -> Result<()> {
        let hash = self.index.hash(&key);

        if let Some(token) = self.find(hash, &key) {
            if let Some(entry) = self.list.get_mut(token) {
                entry.value = value;
            }
            self.list.touch(token);
            return Ok(());
        }

        if self.list.len() < self.capacity {
            let token = self.list.push_back(CacheEntry { key, value, hash });
            self.index_insert(hash, token);
            return Ok(());
        }

        let token = self.evict()?;
        self.recycle(token, key, value, hash);
        Ok(())
    }

    /// Get the value of `key` and mark it most-recently-used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        let token = self.find(self.index.hash(key), key)?;
        self.list.touch(token);
        self.list.get(token).map(|entry| &entry.value)
    }

    /// Get the value of `key` without changing its recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        let token = self.find(self.index.hash(key), key)?;
        self.list.get(token).map(|entry| &entry.value)
    }

    /// Returns `true` if `key` is cached. Recency is unchanged.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.find(self.index.hash(key), key).is_some()
    }

    /// Remove `key` and return its value. Removing an absent key is a no-op.
    ///
    /// Listeners are not notified: removal is not an eviction.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        let hash = self.index.hash(key);
        let token = self.find(hash, key)?;
        self.index.remove(hash, token);
        self.list.remove(token).map(|entry| entry.value)
    }

    /// Remove every entry. Listeners are not notified.
    pub fn remove_all(&mut self) {
        self.index.clear();
        self.list.clear();
        tracing::debug!(capacity = self.capacity, "[mru]: cleared");
    }

    /// Iterate over the cached values.
    ///
    /// The order is the hash index's enumeration order. It is arbitrary, unrelated to recency,
    /// and must not be relied upon.
    pub fn elements(&self) -> impl Iterator<Item = &V> + '_ {
        self.index
            .tokens()
            .filter_map(|token| self.list.get(token))
            .map(|entry| &entry.value)
    }

    /// Iterate mutably over the cached values in arbitrary order. Recency is unchanged.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.list.values_mut().map(|entry| &mut entry.value)
    }

    /// Register an eviction listener. Returns `false` if it was already registered.
    pub fn add_listener(&mut self, listener: Arc<dyn EvictionListener<K, V>>) -> bool {
        let added = self.listeners.add(listener);
        tracing::trace!(added, listeners = self.listeners.len(), "[mru]: add listener");
        added
    }

    /// Unregister an eviction listener. Returns `false` if it was not registered.
    pub fn remove_listener(&mut self, listener: &Arc<dyn EvictionListener<K, V>>) -> bool {
        let removed = self.listeners.remove(listener);
        tracing::trace!(removed, listeners = self.listeners.len(), "[mru]: remove listener");
        removed
    }

    /// Count of registered eviction listeners.
    pub fn listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Count of cached entries.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if no entry is cached.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Max count of cached entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from least-recently-used to most-recently-used.
    pub fn keys_by_recency(&self) -> impl Iterator<Item = &K> + '_ {
        self.list.iter().map(|(_, entry)| &entry.key)
    }

    /// Assert the structural invariants of the list, the index and the capacity bound.
    #[cfg(any(test, feature = "test_utils"))]
    pub fn check_invariants(&self) {
        self.list.check();
        assert_eq!(self.index.len(), self.list.len());
        assert!(self.list.len() <= self.capacity);
        for (token, entry) in self.list.iter() {
            assert_eq!(entry.hash, self.index.hash(&entry.key));
            assert_eq!(self.find(entry.hash, &entry.key), Some(token));
        }
    }

    /// Run the eviction protocol against the least-recently-used entry.
    ///
    /// Listeners see the victim in place. Only after all of them accept is it unlinked and
    /// unindexed; its node stays allocated and detached for [`Self::recycle`].
    fn evict(&mut self) -> Result<Token> {
        let token = match self.list.front() {
            Some(token) => token,
            None => unreachable!("a full cache has a least-recently-used entry"),
        };
        let entry = match self.list.get(token) {
            Some(entry) => entry,
            None => unreachable!("head token {token:?} points at a vacant slot"),
        };

        self.listeners.notify(&entry.key, &entry.value)?;

        let hash = entry.hash;
        let unindexed = self.index.remove(hash, token);
        strict_assert!(unindexed);
        self.list.unlink(token);

        tracing::trace!(capacity = self.capacity, "[mru]: evicted least-recently-used entry");
        Ok(token)
    }

    /// Overwrite a detached node with a new entry and link it as most-recently-used.
    fn recycle(&mut self, token: Token, key: K, value: V, hash: u64) {
        if let Some(entry) = self.list.get_mut(token) {
            *entry = CacheEntry { key, value, hash };
        }
        self.list.link_back(token);
        self.index_insert(hash, token);
        strict_assert_eq!(self.index.len(), self.list.len());
    }

    fn find<Q>(&self, hash: u64, key: &Q) -> Option<Token>
    where
        Q: Equivalent<K> + ?Sized,
    {
        self.index
            .find(hash, key, |token| self.list.get(token).map(|entry| &entry.key))
    }

    fn index_insert(&mut self, hash: u64, token: Token) {
        let list = &self.list;
        self.index.insert(hash, token, |t| list.get(t).map_or(0, |entry| entry.hash));
    }
}
