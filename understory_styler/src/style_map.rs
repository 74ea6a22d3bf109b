// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`StyleMap`]: a computed set of CSS declarations.

use alloc::collections::BTreeMap;
use alloc::collections::btree_map;
use alloc::string::String;
use smallvec::SmallVec;

/// The values written for one property, in write order once sorted.
///
/// Most properties carry a single value; fallbacks such as
/// `display: -webkit-flex; display: flex` carry several.
pub type StyleValues = SmallVec<[String; 1]>;

/// CSS property name → value(s), ordered by property name.
///
/// Ordering by name puts vendor-prefixed properties (`-webkit-…`) before the
/// standard property, so applying the map in iteration order lets the
/// standard declaration win. An empty value means "remove the property".
///
/// ```rust
/// use understory_styler::StyleMap;
///
/// let styles = StyleMap::new()
///     .with("flex-direction", "row")
///     .with("-webkit-flex-direction", "row")
///     .with("box-sizing", "border-box");
///
/// let keys: Vec<&str> = styles.keys().collect();
/// assert_eq!(keys, ["-webkit-flex-direction", "box-sizing", "flex-direction"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: BTreeMap<String, StyleValues>,
}

impl StyleMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a single value, replacing any previous values.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let mut values = StyleValues::new();
        values.push(value.into());
        self.entries.insert(name.into(), values);
    }

    /// Sets several values for one property, replacing any previous values.
    pub fn insert_values<I, S>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(name.into(), values.into_iter().map(Into::into).collect());
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder form of [`insert_values`](Self::insert_values).
    #[must_use]
    pub fn with_values<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert_values(name, values);
        self
    }

    /// Removes a property.
    pub fn remove(&mut self, name: &str) -> Option<StyleValues> {
        self.entries.remove(name)
    }

    /// The values for a property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(|values| values.as_slice())
    }

    /// The last value for a property, which is the one that takes effect.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.entries
            .get(name)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Whether the property is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Property names in write order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in write order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, StyleValues> {
        self.entries.iter()
    }

    /// Number of properties.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no properties.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A map with the same properties, every value emptied.
    ///
    /// Applying it removes whatever this map applied.
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self {
            entries: self
                .entries
                .keys()
                .map(|name| (name.clone(), StyleValues::from_elem(String::new(), 1)))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a StyleMap {
    type Item = (&'a String, &'a StyleValues);
    type IntoIter = btree_map::Iter<'a, String, StyleValues>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}
