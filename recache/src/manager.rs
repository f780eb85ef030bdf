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

use parking_lot::{Mutex, MutexGuard};
use recache_common::error::Result;
use recache_memory::{CachePolicy, EvictionListener};

use crate::{
    options::CacheOptions,
    store::{RecordId, RecordStore},
};

/// Record held by the cache of a [`RecordManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedRecord<R> {
    id: RecordId,
    record: R,
    dirty: bool,
}

impl<R> CachedRecord<R> {
    fn new(id: RecordId, record: R, dirty: bool) -> Self {
        Self { id, record, dirty }
    }

    /// Identifier of the record.
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// The cached record.
    pub fn record(&self) -> &R {
        &self.record
    }

    /// Returns `true` if the record was updated since it was last written to the store.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Boxed cache policy used by a [`RecordManager`].
pub type RecordCache<R> = Box<dyn CachePolicy<RecordId, CachedRecord<R>>>;

/// Writes a dirty victim back to the store before it leaves the cache.
///
/// A failed write rejects the eviction with the store's error.
struct WriteBack<S> {
    store: Arc<Mutex<S>>,
}

impl<S> EvictionListener<RecordId, CachedRecord<S::Record>> for WriteBack<S>
where
    S: RecordStore,
{
    fn on_evict(&self, id: &RecordId, cached: &CachedRecord<S::Record>) -> Result<()> {
        if cached.dirty {
            self.store.lock().update(*id, &cached.record)?;
            tracing::trace!(id, "[manager]: write back dirty record on eviction");
        }
        Ok(())
    }
}

/// Record store with an optional write-back cache in front of it.
///
/// Updates only touch the cache; dirty records reach the store when they are evicted or on
/// [`RecordManager::commit`].
pub struct RecordManager<S>
where
    S: RecordStore,
{
    store: Arc<Mutex<S>>,
    cache: Option<RecordCache<S::Record>>,
}

impl<S> std::fmt::Debug for RecordManager<S>
where
    S: RecordStore,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordManager")
            .field("cached", &self.cache.as_ref().map(|cache| cache.len()))
            .finish()
    }
}

impl<S> RecordManager<S>
where
    S: RecordStore,
{
    /// Open a record manager over `store`, wiring in the cache selected by `options`.
    ///
    /// Unsupported cache types and invalid sizes are rejected before the store is used.
    pub fn open(store: S, options: &CacheOptions) -> Result<Self> {
        let cache = options.build::<RecordId, CachedRecord<S::Record>>()?;
        Ok(Self::with_cache(store, cache.map(|cache| Box::new(cache) as RecordCache<S::Record>)))
    }

    /// Create a record manager over `store` with the given cache, or none.
    pub fn with_cache(store: S, mut cache: Option<RecordCache<S::Record>>) -> Self {
        let store = Arc::new(Mutex::new(store));
        if let Some(cache) = cache.as_mut() {
            cache.add_listener(Arc::new(WriteBack { store: store.clone() }));
        }
        Self { store, cache }
    }

    /// Insert a record into the store and cache it.
    pub fn insert(&mut self, record: S::Record) -> Result<RecordId> {
        let id = self.store.lock().insert(&record)?;
        if let Some(cache) = self.cache.as_mut() {
            cache.put(id, CachedRecord::new(id, record, false))?;
        }
        Ok(id)
    }

    /// Fetch a record, from the cache if possible.
    pub fn fetch(&mut self, id: RecordId) -> Result<Option<S::Record>> {
        if let Some(cached) = self.cache.as_mut().and_then(|cache| cache.get(&id)) {
            return Ok(Some(cached.record.clone()));
        }

        let record = self.store.lock().fetch(id)?;
        if let (Some(cache), Some(record)) = (self.cache.as_mut(), record.as_ref()) {
            cache.put(id, CachedRecord::new(id, record.clone(), false))?;
        }
        Ok(record)
    }

    /// Update a record.
    ///
    /// With a cache the record is only marked dirty; the store is updated later.
    pub fn update(&mut self, id: RecordId, record: S::Record) -> Result<()> {
        match self.cache.as_mut() {
            Some(cache) => cache.put(id, CachedRecord::new(id, record, true)),
            None => self.store.lock().update(id, &record),
        }
    }

    /// Delete a record from the store and drop it from the cache.
    pub fn delete(&mut self, id: RecordId) -> Result<()> {
        self.store.lock().delete(id)?;
        if let Some(cache) = self.cache.as_mut() {
            cache.remove(&id);
        }
        Ok(())
    }

    /// Write every dirty cached record to the store, then commit the store.
    pub fn commit(&mut self) -> Result<()> {
        let mut store = self.store.lock();
        if let Some(cache) = self.cache.as_mut() {
            let mut flushed = 0;
            for cached in cache.values_mut().filter(|cached| cached.dirty) {
                store.update(cached.id, &cached.record)?;
                cached.dirty = false;
                flushed += 1;
            }
            tracing::debug!(flushed, "[manager]: flush dirty records");
        }
        store.commit()
    }

    /// Roll the store back and drop every cached record, dirty or not.
    pub fn rollback(&mut self) -> Result<()> {
        self.store.lock().rollback()?;
        if let Some(cache) = self.cache.as_mut() {
            cache.remove_all();
        }
        Ok(())
    }

    /// Commit and hand the store back.
    pub fn close(mut self) -> Result<S> {
        self.commit()?;
        // Drops the write-back listener and its handle on the store.
        self.cache = None;
        match Arc::try_unwrap(self.store) {
            Ok(store) => Ok(store.into_inner()),
            Err(_) => unreachable!("the store is only shared with the write-back listener"),
        }
    }

    /// Cached state of a record, without changing its recency.
    pub fn cached(&self, id: RecordId) -> Option<&CachedRecord<S::Record>> {
        self.cache.as_ref().and_then(|cache| cache.peek(&id))
    }

    /// Count of cached records. Zero if caching is disabled.
    pub fn cached_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.len())
    }

    /// Returns `true` if a cache sits in front of the store.
    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Lock the underlying store.
    pub fn store(&self) -> MutexGuard<'_, S> {
        self.store.lock()
    }
}
