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

//! recache: a record cache for embedded stores.
//!
//! A fixed-capacity least-recently-used cache ([`Mru`]) sits in front of a persistent
//! [`RecordStore`]. Updated records stay dirty in the cache and are written back when they are
//! evicted or committed; a failed write-back vetoes the eviction and leaves the cache unchanged.
//!
//! ```
//! use recache::prelude::*;
//!
//! let options = CacheOptions::from_properties([(CACHE_SIZE, "2"), (CACHE_TYPE, "normal")]).unwrap();
//! let mut cache = options.build::<u64, String>().unwrap().unwrap();
//! cache.put(1, "one".to_string()).unwrap();
//! assert_eq!(cache.get(&1).map(String::as_str), Some("one"));
//! ```

mod manager;
mod options;
mod shared;
mod store;

/// The prelude.
pub mod prelude;

/// Components shared by all recache crates.
pub mod common {
    pub use recache_common::*;
}

/// The in-memory eviction engine.
pub mod memory {
    pub use recache_memory::*;
}

pub use crate::{
    manager::{CachedRecord, RecordCache, RecordManager},
    options::{CacheOptions, CacheType, CACHE_SIZE, CACHE_TYPE},
    shared::SharedCache,
    store::{RecordId, RecordStore},
};
pub use recache_common::error::{Error, Result};
pub use recache_memory::{CachePolicy, EvictionListener, Mru};
