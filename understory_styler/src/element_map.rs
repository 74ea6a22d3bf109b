// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`ElementMap`]: per-element data keyed by `Rc` identity.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

/// A map from shared elements to values, keyed by allocation identity.
///
/// The map holds only a [`Weak`] reference to each element, so it never keeps
/// an element alive. The weak reference does keep the allocation itself
/// reserved, which means an address in the map cannot be reused by a
/// different element while its entry exists.
///
/// Entries whose element has been dropped are invisible to lookups and are
/// reclaimed by [`purge`](Self::purge).
///
/// ```rust
/// use std::rc::Rc;
/// use understory_styler::ElementMap;
///
/// let mut map = ElementMap::new();
/// let a = Rc::new("a");
/// let b = Rc::new("a");
/// map.insert(&a, 1);
///
/// assert_eq!(map.get(&a), Some(&1));
/// assert_eq!(map.get(&b), None, "equal values are still different elements");
///
/// drop(a);
/// assert_eq!(map.purge().len(), 1);
/// assert!(map.is_empty());
/// ```
pub struct ElementMap<E: ?Sized, V> {
    entries: HashMap<usize, (Weak<E>, V)>,
}

fn key_of<E: ?Sized>(element: &Rc<E>) -> usize {
    Rc::as_ptr(element).cast::<()>().addr()
}

impl<E: ?Sized, V> Default for ElementMap<E, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<E: ?Sized, V> ElementMap<E, V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, including ones whose element was dropped.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The value for `element`.
    #[must_use]
    pub fn get(&self, element: &Rc<E>) -> Option<&V> {
        self.entries.get(&key_of(element)).map(|(_, v)| v)
    }

    /// The value for `element`, mutably.
    pub fn get_mut(&mut self, element: &Rc<E>) -> Option<&mut V> {
        self.entries.get_mut(&key_of(element)).map(|(_, v)| v)
    }

    /// Whether `element` has an entry.
    #[must_use]
    pub fn contains(&self, element: &Rc<E>) -> bool {
        self.entries.contains_key(&key_of(element))
    }

    /// The value for `element`, inserting `f()` if absent.
    pub fn get_or_insert_with(&mut self, element: &Rc<E>, f: impl FnOnce() -> V) -> &mut V {
        &mut self
            .entries
            .entry(key_of(element))
            .or_insert_with(|| (Rc::downgrade(element), f()))
            .1
    }

    /// Sets the value for `element`, returning the previous one.
    pub fn insert(&mut self, element: &Rc<E>, value: V) -> Option<V> {
        self.entries
            .insert(key_of(element), (Rc::downgrade(element), value))
            .map(|(_, v)| v)
    }

    /// Removes the entry for `element`.
    pub fn remove(&mut self, element: &Rc<E>) -> Option<V> {
        self.entries.remove(&key_of(element)).map(|(_, v)| v)
    }

    /// Removes every entry whose element was dropped and returns their values.
    pub fn purge(&mut self) -> Vec<V> {
        let dead: Vec<usize> = self
            .entries
            .iter()
            .filter(|(_, (weak, _))| weak.strong_count() == 0)
            .map(|(key, _)| *key)
            .collect();
        dead.into_iter()
            .filter_map(|key| self.entries.remove(&key).map(|(_, v)| v))
            .collect()
    }

    /// Live elements with their values, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Rc<E>, &V)> + '_ {
        self.entries
            .values()
            .filter_map(|(weak, v)| weak.upgrade().map(|el| (el, v)))
    }

    /// Live elements, in no particular order.
    #[must_use]
    pub fn elements(&self) -> Vec<Rc<E>> {
        self.iter().map(|(el, _)| el).collect()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<E: ?Sized, V: fmt::Debug> fmt::Debug for ElementMap<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementMap")
            .field("len", &self.entries.len())
            .field(
                "values",
                &self.entries.values().map(|(_, v)| v).collect::<Vec<_>>(),
            )
            .finish()
    }
}
