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

//! Eviction listeners for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use recache_common::error::{Error, Result};

use crate::listener::EvictionListener;

/// Accepts every eviction and records the victims in notification order.
#[derive(Debug)]
pub struct RecordingListener<K, V> {
    victims: Mutex<Vec<(K, V)>>,
}

impl<K, V> Default for RecordingListener<K, V> {
    fn default() -> Self {
        Self {
            victims: Mutex::new(vec![]),
        }
    }
}

impl<K, V> RecordingListener<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Victims seen so far.
    pub fn dump(&self) -> Vec<(K, V)> {
        self.victims.lock().clone()
    }
}

impl<K, V> EvictionListener<K, V> for RecordingListener<K, V>
where
    K: Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn on_evict(&self, key: &K, value: &V) -> Result<()> {
        self.victims.lock().push((key.clone(), value.clone()));
        Ok(())
    }
}

/// Rejects every eviction and counts the attempts.
#[derive(Debug, Default)]
pub struct RejectingListener {
    attempts: AtomicUsize,
}

impl RejectingListener {
    /// Count of rejected evictions.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }
}

impl<K, V> EvictionListener<K, V> for RejectingListener {
    fn on_evict(&self, _: &K, _: &V) -> Result<()> {
        let attempts = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
        Err(Error::eviction_rejected(format!("rejected eviction #{attempts}")))
    }
}
