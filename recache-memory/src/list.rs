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

use recache_common::{
    slab::{Slab, Token},
    strict_assert, strict_assert_eq,
};

/// Doubly linked list ordered from least-recently-used (head) to most-recently-used (tail).
///
/// Nodes live in a [`Slab`] and link to each other by [`Token`], so a node can be unlinked, moved
/// or relinked in O(1) using only its own links. A node may be temporarily detached (occupying a
/// slot without being linked); [`RecencyList::link_back`] reattaches it.
#[derive(Debug)]
pub struct RecencyList<T> {
    slab: Slab<Node<T>>,
    head: Option<Token>,
    tail: Option<Token>,
    linked: usize,
}

#[derive(Debug)]
struct Node<T> {
    val: T,

    prev: Option<Token>,
    next: Option<Token>,
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecencyList<T> {
    /// Create an empty list.
    pub const fn new() -> Self {
        Self {
            slab: Slab::new(),
            head: None,
            tail: None,
            linked: 0,
        }
    }

    /// Create an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slab: Slab::with_capacity(capacity),
            head: None,
            tail: None,
            linked: 0,
        }
    }

    /// Token of the least-recently-used node.
    pub fn front(&self) -> Option<Token> {
        self.head
    }

    /// Token of the most-recently-used node.
    pub fn back(&self) -> Option<Token> {
        self.tail
    }

    /// Get a node value by token.
    pub fn get(&self, token: Token) -> Option<&T> {
        self.slab.get(token).map(|node| &node.val)
    }

    /// Get a mutable node value by token.
    pub fn get_mut(&mut self, token: Token) -> Option<&mut T> {
        self.slab.get_mut(token).map(|node| &mut node.val)
    }

    /// Allocate a node for `val` and append it at the tail.
    pub fn push_back(&mut self, val: T) -> Token {
        let token = self.slab.insert(Node {
            val,
            prev: None,
            next: None,
        });
        self.link_back(token);
        token
    }

    /// Unlink a node and free its slot.
    pub fn remove(&mut self, token: Token) -> Option<T> {
        self.slab.get(token)?;
        self.unlink(token);
        self.slab.remove(token).map(|node| node.val)
    }

    /// Move a node to the tail.
    ///
    /// Touching the current tail is a no-op.
    pub fn touch(&mut self, token: Token) {
        if self.tail == Some(token) {
            return;
        }
        self.unlink(token);
        self.link_back(token);
    }

    /// Detach a node from its neighbors, keeping its slot occupied.
    pub fn unlink(&mut self, token: Token) {
        let Some(node) = self.slab.get_mut(token) else {
            return;
        };
        let (prev, next) = (node.prev.take(), node.next.take());

        // A detached node has no links and is neither head nor tail.
        if prev.is_none() && next.is_none() && self.head != Some(token) {
            return;
        }

        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
        self.linked -= 1;
    }

    /// Append a detached node at the tail.
    pub fn link_back(&mut self, token: Token) {
        strict_assert!(self.is_detached(token));

        let prev = self.tail;
        match prev {
            Some(prev) => self.node_mut(prev).next = Some(token),
            None => self.head = Some(token),
        }
        let node = self.node_mut(token);
        node.prev = prev;
        node.next = None;
        self.tail = Some(token);
        self.linked += 1;
    }

    /// Drop all nodes.
    pub fn clear(&mut self) {
        self.slab.clear();
        self.head = None;
        self.tail = None;
        self.linked = 0;
    }

    /// Count of allocated nodes, linked or detached.
    pub fn len(&self) -> usize {
        self.slab.len()
    }

    /// Returns `true` if the list holds no node.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            token: self.head,
            list: self,
        }
    }

    /// Iterate mutably over all node values in slot order, not in recency order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slab.iter_mut().map(|(_, node)| &mut node.val)
    }

    /// Assert the structural invariants: both traversals agree and cover every node.
    #[cfg(any(test, feature = "test_utils"))]
    pub fn check(&self) {
        let forward = self.iter().map(|(token, _)| token).collect::<Vec<_>>();

        let mut backward = vec![];
        let mut cursor = self.tail;
        while let Some(token) = cursor {
            backward.push(token);
            cursor = self.node(token).prev;
        }
        backward.reverse();

        assert_eq!(forward, backward);
        assert_eq!(forward.len(), self.linked);
        assert_eq!(self.linked, self.slab.len());
        assert_eq!(self.head.is_none(), self.tail.is_none());
        if let Some(head) = self.head {
            assert!(self.node(head).prev.is_none());
        }
        if let Some(tail) = self.tail {
            assert!(self.node(tail).next.is_none());
        }
    }

    fn is_detached(&self, token: Token) -> bool {
        let node = self.node(token);
        node.prev.is_none() && node.next.is_none() && self.head != Some(token)
    }

    fn node(&self, token: Token) -> &Node<T> {
        match self.slab.get(token) {
            Some(node) => node,
            None => unreachable!("linked token {token:?} points at a vacant slot"),
        }
    }

    fn node_mut(&mut self, token: Token) -> &mut Node<T> {
        match self.slab.get_mut(token) {
            Some(node) => node,
            None => unreachable!("linked token {token:?} points at a vacant slot"),
        }
    }
}

/// Head-to-tail iterator over a [`RecencyList`].
pub struct Iter<'a, T> {
    token: Option<Token>,
    list: &'a RecencyList<T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Token, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.token?;
        let node = self.list.node(token);
        self.token = node.next;
        strict_assert_eq!(node.next.is_none(), self.list.tail == Some(token));
        Some((token, &node.val))
    }
}
