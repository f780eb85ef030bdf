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

//! Integration tests of the write-back record manager.

use std::collections::HashMap;

use itertools::Itertools;
use recache::prelude::*;

/// Transactional in-memory store with injectable write failures.
#[derive(Debug, Default)]
struct MemoryStore {
    committed: HashMap<RecordId, String>,
    working: HashMap<RecordId, String>,
    next_id: RecordId,
    updates: usize,
    fail_updates: bool,
}

impl MemoryStore {
    fn committed(&self, id: RecordId) -> Option<&str> {
        self.committed.get(&id).map(String::as_str)
    }

    fn working(&self, id: RecordId) -> Option<&str> {
        self.working.get(&id).map(String::as_str)
    }
}

impl RecordStore for MemoryStore {
    type Record = String;

    fn insert(&mut self, record: &String) -> Result<RecordId> {
        self.next_id += 1;
        self.working.insert(self.next_id, record.clone());
        Ok(self.next_id)
    }

    fn fetch(&mut self, id: RecordId) -> Result<Option<String>> {
        Ok(self.working.get(&id).cloned())
    }

    fn update(&mut self, id: RecordId, record: &String) -> Result<()> {
        if self.fail_updates {
            return Err(Error::store(std::io::Error::other(format!("record {id} is locked"))));
        }
        self.updates += 1;
        self.working.insert(id, record.clone());
        Ok(())
    }

    fn delete(&mut self, id: RecordId) -> Result<()> {
        self.working.remove(&id);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.committed = self.working.clone();
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.working = self.committed.clone();
        Ok(())
    }
}

fn open(size: usize) -> RecordManager<MemoryStore> {
    RecordManager::open(MemoryStore::default(), &CacheOptions::default().with_size(size)).unwrap()
}

#[test_log::test]
fn test_insert_fetch_update() {
    let mut manager = open(4);
    assert!(manager.is_cached());

    let id = manager.insert("alpha".to_string()).unwrap();
    assert_eq!(manager.fetch(id).unwrap().as_deref(), Some("alpha"));
    assert!(!manager.cached(id).unwrap().is_dirty());

    manager.update(id, "beta".to_string()).unwrap();
    assert_eq!(manager.fetch(id).unwrap().as_deref(), Some("beta"));
    assert!(manager.cached(id).unwrap().is_dirty());
    // Write-back: the store still holds the old record.
    assert_eq!(manager.store().working(id), Some("alpha"));

    manager.commit().unwrap();
    assert!(!manager.cached(id).unwrap().is_dirty());
    assert_eq!(manager.store().committed(id), Some("beta"));
    assert_eq!(manager.store().updates, 1);

    // Clean records are not written again.
    manager.commit().unwrap();
    assert_eq!(manager.store().updates, 1);
}

#[test_log::test]
fn test_dirty_victim_is_written_back() {
    let mut manager = open(2);
    let ids = (0..2).map(|i| manager.insert(format!("r{i}")).unwrap()).collect_vec();

    manager.update(ids[0], "r0'".to_string()).unwrap();
    manager.update(ids[1], "r1'".to_string()).unwrap();
    assert_eq!(manager.store().updates, 0);

    // Evicts ids[0], the least-recently-used record.
    let id = manager.insert("r2".to_string()).unwrap();
    assert_eq!(manager.cached_len(), 2);
    assert!(manager.cached(ids[0]).is_none());
    assert!(manager.cached(id).is_some());
    assert_eq!(manager.store().working(ids[0]), Some("r0'"));
    assert_eq!(manager.store().working(ids[1]), Some("r1"));
    assert_eq!(manager.store().updates, 1);

    // A miss is served by the store and cached again.
    assert_eq!(manager.fetch(ids[0]).unwrap().as_deref(), Some("r0'"));
    assert!(manager.cached(ids[0]).is_some());
    assert_eq!(manager.store().working(ids[1]), Some("r1'"));
}

#[test_log::test]
fn test_failed_write_back_rejects_eviction() {
    let mut manager = open(2);
    let a = manager.insert("a".to_string()).unwrap();
    let b = manager.insert("b".to_string()).unwrap();
    manager.update(a, "a'".to_string()).unwrap();
    manager.update(b, "b'".to_string()).unwrap();

    manager.store().fail_updates = true;
    let err = manager.insert("c".to_string()).unwrap_err();
    assert_eq!(err.to_string(), format!("store error: record {a} is locked"));

    // The cache is untouched.
    assert_eq!(manager.cached_len(), 2);
    assert_eq!(manager.cached(a).map(|c| c.record().as_str()), Some("a'"));
    assert_eq!(manager.cached(b).map(|c| c.record().as_str()), Some("b'"));
    assert!(manager.cached(a).unwrap().is_dirty());

    manager.store().fail_updates = false;
    let d = manager.insert("d".to_string()).unwrap();
    assert!(manager.cached(a).is_none());
    assert_eq!(manager.store().working(a), Some("a'"));
    assert_eq!(manager.fetch(d).unwrap().as_deref(), Some("d"));
}

#[test]
fn test_delete() {
    let mut manager = open(2);
    let id = manager.insert("gone".to_string()).unwrap();
    manager.delete(id).unwrap();
    assert!(manager.cached(id).is_none());
    assert_eq!(manager.fetch(id).unwrap(), None);
    // Deleting again is harmless.
    manager.delete(id).unwrap();
}

#[test]
fn test_rollback_drops_dirty_records() {
    let mut manager = open(4);
    let id = manager.insert("v1".to_string()).unwrap();
    manager.commit().unwrap();

    manager.update(id, "v2".to_string()).unwrap();
    manager.rollback().unwrap();
    assert_eq!(manager.cached_len(), 0);
    assert_eq!(manager.fetch(id).unwrap().as_deref(), Some("v1"));
}

#[test]
fn test_close_flushes() {
    let mut manager = open(4);
    let id = manager.insert("v1".to_string()).unwrap();
    manager.update(id, "v2".to_string()).unwrap();

    let store = manager.close().unwrap();
    assert_eq!(store.committed(id), Some("v2"));
}

#[test]
fn test_uncached() {
    let options = CacheOptions::from_properties([(CACHE_TYPE, "")]).unwrap();
    let mut manager = RecordManager::open(MemoryStore::default(), &options).unwrap();
    assert!(!manager.is_cached());

    let id = manager.insert("x".to_string()).unwrap();
    manager.update(id, "y".to_string()).unwrap();
    assert_eq!(manager.store().working(id), Some("y"));
    assert_eq!(manager.cached_len(), 0);
    assert!(manager.cached(id).is_none());
}

#[test]
fn test_unsupported_cache_types() {
    for cache_type in ["soft", "WEAK"] {
        let options = CacheOptions::from_properties([(CACHE_TYPE, cache_type)]).unwrap();
        let err = RecordManager::open(MemoryStore::default(), &options).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)), "{cache_type}: {err}");
    }

    let err = CacheOptions::from_properties([(CACHE_TYPE, "arc")]).unwrap_err();
    assert_eq!(err.to_string(), "config error: invalid cache type: arc");
}
