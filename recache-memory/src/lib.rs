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

//! In-memory eviction engine for recache.
//!
//! [`Mru`] is a fixed-capacity cache that evicts its least-recently-used entry when an absent key
//! is inserted while full. Registered [`EvictionListener`]s are consulted before anything is
//! changed and may veto the eviction, in which case the insertion fails and the cache stays as it
//! was.
//!
//! ```
//! use recache_memory::Mru;
//!
//! let mut cache = Mru::new(2).unwrap();
//! cache.put(1, "a").unwrap();
//! cache.put(2, "b").unwrap();
//! cache.get(&1);
//! cache.put(3, "c").unwrap();
//!
//! assert_eq!(cache.get(&2), None);
//! assert_eq!(cache.get(&1), Some(&"a"));
//! ```

mod index;
mod list;
mod listener;
mod mru;
mod policy;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

/// The prelude.
pub mod prelude;

pub use crate::{
    index::KeyIndex,
    list::{Iter, RecencyList},
    listener::{EvictionListener, ListenerRegistry},
    mru::Mru,
    policy::CachePolicy,
};
