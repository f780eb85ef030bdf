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

/// Boxed error raised by an external collaborator, e.g. a record store.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// recache error.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Config error.
    #[error("config error: {0}")]
    Config(String),
    /// The requested variant is recognised but not implemented.
    #[error("not implemented: {0}")]
    Unsupported(String),
    /// An eviction listener vetoed the eviction of the least-recently-used entry.
    #[error("eviction rejected: {0}")]
    EvictionRejected(String),
    /// Error raised by the record store behind the cache.
    #[error("store error: {0}")]
    Store(#[source] BoxedError),
}

impl Error {
    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unsupported error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create an eviction rejection, for listeners that veto an eviction.
    pub fn eviction_rejected(reason: impl Into<String>) -> Self {
        Self::EvictionRejected(reason.into())
    }

    /// Wrap an error raised by the record store.
    pub fn store(err: impl Into<BoxedError>) -> Self {
        Self::Store(err.into())
    }

    /// Returns `true` if the error is an eviction rejection.
    pub fn is_eviction_rejected(&self) -> bool {
        matches!(self, Self::EvictionRejected(_))
    }
}

/// recache result.
pub type Result<T> = std::result::Result<T, Error>;
