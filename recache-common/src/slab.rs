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

use std::num::NonZeroUsize;

/// Stable handle of a value stored in a [`Slab`].
///
/// A token stays valid until its value is removed. `Option<Token>` has the same size as `Token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token(NonZeroUsize);

impl Token {
    const MASK: usize = 1 << (usize::BITS - 1);

    fn new(index: usize) -> Self {
        match NonZeroUsize::new(index | Self::MASK) {
            Some(v) => Self(v),
            None => unreachable!("masked index is never zero"),
        }
    }

    /// Slot index of the token.
    pub fn index(&self) -> usize {
        self.0.get() & !Self::MASK
    }
}

/// Slot arena with free-list reuse.
///
/// Vacated slots are chained into a free list and handed out again by the next insertion, so a
/// slab that has reached its working size stops allocating.
#[derive(Debug)]
pub struct Slab<T> {
    entries: Vec<Entry<T>>,
    len: usize,
    next: usize,
}

impl<T> Default for Slab<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Slab<T> {
    /// Create an empty slab.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next: 0,
            len: 0,
        }
    }

    /// Create an empty slab with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            next: 0,
            len: 0,
        }
    }

    /// Store a value and return its token.
    pub fn insert(&mut self, val: T) -> Token {
        let index = self.next;
        self.insert_at(index, val);
        Token::new(index)
    }

    /// Remove a value by token. Returns `None` if the slot is vacant.
    pub fn remove(&mut self, token: Token) -> Option<T> {
        self.remove_at(token.index())
    }

    /// Get a value by token.
    pub fn get(&self, token: Token) -> Option<&T> {
        match self.entries.get(token.index()) {
            Some(Entry::Occupied(val)) => Some(val),
            _ => None,
        }
    }

    /// Get a mutable value by token.
    pub fn get_mut(&mut self, token: Token) -> Option<&mut T> {
        match self.entries.get_mut(token.index()) {
            Some(Entry::Occupied(val)) => Some(val),
            _ => None,
        }
    }

    /// Iterate over occupied values in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Token, &T)> {
        self.entries.iter().enumerate().filter_map(|(index, entry)| match entry {
            Entry::Occupied(val) => Some((Token::new(index), val)),
            Entry::Vacant(_) => None,
        })
    }

    /// Iterate mutably over occupied values in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Token, &mut T)> {
        self.entries.iter_mut().enumerate().filter_map(|(index, entry)| match entry {
            Entry::Occupied(val) => Some((Token::new(index), val)),
            Entry::Vacant(_) => None,
        })
    }

    /// Drop all values. Allocated slot storage is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.len = 0;
        self.next = 0;
    }

    /// Count of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert_at(&mut self, index: usize, val: T) {
        self.len += 1;

        if index == self.entries.len() {
            self.entries.push(Entry::Occupied(val));
            self.next = index + 1;
        } else {
            self.next = match self.entries.get(index) {
                Some(&Entry::Vacant(next)) => next,
                _ => unreachable!("free list points at an occupied slot"),
            };
            self.entries[index] = Entry::Occupied(val);
        }
    }

    fn remove_at(&mut self, index: usize) -> Option<T> {
        let entry = self.entries.get_mut(index)?;

        if matches!(entry, Entry::Vacant(_)) {
            return None;
        }

        match std::mem::replace(entry, Entry::Vacant(self.next)) {
            Entry::Vacant(_) => unreachable!(),
            Entry::Occupied(val) => {
                self.len -= 1;
                self.next = index;
                Some(val)
            }
        }
    }
}

#[derive(Debug, Clone)]
enum Entry<T> {
    Vacant(usize),
    Occupied(T),
}
