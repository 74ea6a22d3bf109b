// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`MediaChange`] event record.

use alloc::string::String;

use understory_breakpoints::Breakpoint;

/// The universal media query.
pub const ALL: &str = "all";

/// One media query transition, optionally annotated with breakpoint metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaChange {
    /// Whether the query matches after this transition.
    pub matches: bool,
    /// The literal media query.
    pub media_query: String,
    /// Alias of the matching breakpoint, empty if unknown.
    pub alias: String,
    /// Suffix of the matching breakpoint, empty if unknown.
    pub suffix: String,
    /// Priority of the matching breakpoint.
    pub priority: i32,
    /// Free-form property name carried alongside the change.
    pub property: String,
}

impl Default for MediaChange {
    fn default() -> Self {
        Self::new(false, ALL)
    }
}

impl MediaChange {
    /// Creates an un-annotated change for `media_query`.
    #[must_use]
    pub fn new(matches: bool, media_query: impl Into<String>) -> Self {
        Self {
            matches,
            media_query: media_query.into(),
            alias: String::new(),
            suffix: String::new(),
            priority: 0,
            property: String::new(),
        }
    }

    /// Returns `true` for the universal query.
    #[must_use]
    pub fn is_universal(&self) -> bool {
        self.media_query.is_empty() || self.media_query == ALL
    }
}

/// Copies a breakpoint's alias, query, suffix and priority onto a clone of
/// `change`. Without a breakpoint the clone is returned unchanged.
#[must_use]
pub fn merge_alias(change: &MediaChange, breakpoint: Option<&Breakpoint>) -> MediaChange {
    let mut merged = change.clone();
    if let Some(bp) = breakpoint {
        merged.media_query.clone_from(&bp.media_query);
        merged.alias.clone_from(&bp.alias);
        merged.suffix.clone_from(&bp.suffix);
        merged.priority = bp.priority;
    }
    merged
}
