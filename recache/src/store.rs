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

use recache_common::error::Result;

/// Identifier of a record in a [`RecordStore`].
pub type RecordId = u64;

/// Persistent record store the cache sits in front of.
///
/// The store owns durability and transactions. Implementations wrap their own failures in
/// [`Error::Store`](recache_common::error::Error::Store).
pub trait RecordStore: Send + 'static {
    /// Record type.
    type Record: Clone + Send + Sync + 'static;

    /// Insert a new record and return its identifier.
    fn insert(&mut self, record: &Self::Record) -> Result<RecordId>;

    /// Fetch a record. Returns `None` if no record has this identifier.
    fn fetch(&mut self, id: RecordId) -> Result<Option<Self::Record>>;

    /// Overwrite an existing record.
    fn update(&mut self, id: RecordId, record: &Self::Record) -> Result<()>;

    /// Delete a record.
    fn delete(&mut self, id: RecordId) -> Result<()>;

    /// Make all changes since the last commit durable.
    fn commit(&mut self) -> Result<()>;

    /// Discard all changes since the last commit.
    fn rollback(&mut self) -> Result<()>;
}
