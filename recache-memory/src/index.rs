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

use std::hash::{BuildHasher, Hash};

use ahash::RandomState;
use equivalent::Equivalent;
use hashbrown::hash_table::HashTable;
use recache_common::slab::Token;

/// Hash index from key to the [`Token`] of the list node holding it.
///
/// The table stores only tokens. Keys and their hashes stay in the nodes, so lookups resolve a
/// token through `resolve` before comparing keys.
#[derive(Debug)]
pub struct KeyIndex<S = RandomState> {
    table: HashTable<Token>,
    hash_builder: S,
}

impl<S> KeyIndex<S>
where
    S: BuildHasher,
{
    /// Create an empty index with room for `capacity` keys.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Hash a key with the index's hasher.
    pub fn hash<Q>(&self, key: &Q) -> u64
    where
        Q: Hash + ?Sized,
    {
        self.hash_builder.hash_one(key)
    }

    /// Find the token of `key`.
    ///
    /// `resolve` maps a token to the key stored under it.
    pub fn find<'a, K, Q, F>(&self, hash: u64, key: &Q, resolve: F) -> Option<Token>
    where
        K: 'a,
        Q: Equivalent<K> + ?Sized,
        F: Fn(Token) -> Option<&'a K>,
    {
        self.table
            .find(hash, |&token| resolve(token).is_some_and(|k| key.equivalent(k)))
            .copied()
    }

    /// Insert a token for a key known to be absent.
    ///
    /// `rehash` maps a token to its stored hash when the table grows.
    pub fn insert<F>(&mut self, hash: u64, token: Token, rehash: F)
    where
        F: Fn(Token) -> u64,
    {
        self.table.insert_unique(hash, token, |&t| rehash(t));
    }

    /// Remove `token` from the bucket of `hash`. Returns `false` if it was not indexed.
    pub fn remove(&mut self, hash: u64, token: Token) -> bool {
        match self.table.find_entry(hash, |&t| t == token) {
            Ok(entry) => {
                entry.remove();
                true
            }
            Err(_) => false,
        }
    }

    /// Drop all keys.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Tokens in table order, which is arbitrary.
    pub fn tokens(&self) -> impl Iterator<Item = Token> + '_ {
        self.table.iter().copied()
    }

    /// Count of indexed keys.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if no key is indexed.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
