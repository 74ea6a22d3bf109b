// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw responsive values and the per-key breakpoint table.

use alloc::string::String;

use smallvec::SmallVec;

/// Inline capacity of a [`BreakpointValues`] table.
///
/// Most keys carry a default value and one or two overrides.
const INLINE_CAPACITY: usize = 4;

/// A raw value stored for one breakpoint of one (element, key) pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResponsiveValue {
    /// An input value, passed to the key's update callback when it wins.
    Set(String),
    /// An explicit "no style here" marker; the key's clear callback runs
    /// when it wins.
    Cleared,
}

impl ResponsiveValue {
    /// The input value, or `None` for [`Cleared`](Self::Cleared).
    #[must_use]
    #[inline]
    pub fn as_set(&self) -> Option<&str> {
        match self {
            Self::Set(value) => Some(value),
            Self::Cleared => None,
        }
    }

    /// Whether this is a non-empty [`Set`](Self::Set) value.
    #[must_use]
    #[inline]
    pub fn is_meaningful(&self) -> bool {
        self.as_set().is_some_and(|value| !value.is_empty())
    }
}

impl From<&str> for ResponsiveValue {
    fn from(value: &str) -> Self {
        Self::Set(value.into())
    }
}

impl From<String> for ResponsiveValue {
    fn from(value: String) -> Self {
        Self::Set(value)
    }
}

/// Values of one key, by breakpoint alias (`""` is the default breakpoint).
///
/// Kept sorted by alias and searched with binary search.
#[derive(Clone, Debug, Default)]
pub(crate) struct BreakpointValues {
    entries: SmallVec<[(String, ResponsiveValue); INLINE_CAPACITY]>,
}

impl BreakpointValues {
    #[inline]
    fn find(&self, alias: &str) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|(key, _)| key.as_str().cmp(alias))
    }

    pub(crate) fn get(&self, alias: &str) -> Option<&ResponsiveValue> {
        self.find(alias).ok().map(|idx| &self.entries[idx].1)
    }

    pub(crate) fn set(&mut self, alias: &str, value: ResponsiveValue) {
        match self.find(alias) {
            Ok(idx) => self.entries[idx].1 = value,
            Err(idx) => self.entries.insert(idx, (alias.into(), value)),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
