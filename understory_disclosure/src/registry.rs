// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered slot storage backing the listener and outside-interaction registries.

use alloc::vec::Vec;

use hashbrown::HashMap;

/// Insertion-ordered map from monotonically increasing keys to values.
///
/// Keys are never reused, so a stale key can never alias a newer entry.
#[derive(Debug)]
pub(crate) struct Slots<T> {
    next: u64,
    order: Vec<u64>,
    entries: HashMap<u64, T>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self {
            next: 0,
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }
}

impl<T> Slots<T> {
    pub(crate) fn insert(&mut self, value: T) -> u64 {
        let key = self.next;
        self.next += 1;
        self.order.push(key);
        self.entries.insert(key, value);
        key
    }

    pub(crate) fn get(&self, key: u64) -> Option<&T> {
        self.entries.get(&key)
    }

    pub(crate) fn get_mut(&mut self, key: u64) -> Option<&mut T> {
        self.entries.get_mut(&key)
    }

    pub(crate) fn contains(&self, key: u64) -> bool {
        self.entries.contains_key(&key)
    }

    pub(crate) fn remove(&mut self, key: u64) -> Option<T> {
        let value = self.entries.remove(&key)?;
        self.order.retain(|k| *k != key);
        Some(value)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Keys in insertion order.
    pub(crate) fn keys(&self) -> &[u64] {
        &self.order
    }

    /// Entries in insertion order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (u64, &T)> + '_ {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key).map(|value| (*key, value)))
    }
}
