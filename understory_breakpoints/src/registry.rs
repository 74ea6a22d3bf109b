// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The priority-ordered [`BreakpointRegistry`].

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::breakpoint::{Breakpoint, DEFAULT_ALIAS, camel_case, sort_descending_priority};
use crate::builtin::{default_breakpoints, orientation_breakpoints};
use crate::config::LayoutConfig;

/// Merges `custom` into `defaults` by alias.
///
/// Entries of `defaults` keep their position. A custom entry whose alias is
/// already present replaces its query, priority and overlap flag (and its
/// suffix, when the custom suffix is non-empty); custom entries with new
/// aliases are appended in order. Suffixes are validated afterwards.
#[must_use]
pub fn merge_by_alias(defaults: Vec<Breakpoint>, custom: &[Breakpoint]) -> Vec<Breakpoint> {
    let mut merged = defaults;
    for bp in custom {
        match merged.iter_mut().find(|existing| existing.alias == bp.alias) {
            Some(existing) => {
                existing.media_query.clone_from(&bp.media_query);
                existing.priority = bp.priority;
                existing.overlapping = bp.overlapping;
                if !bp.suffix.is_empty() {
                    existing.suffix.clone_from(&bp.suffix);
                }
            }
            None => merged.push(bp.clone()),
        }
    }
    validate_suffixes(merged)
}

/// Fills every empty suffix with the camel-cased alias.
#[must_use]
pub fn validate_suffixes(mut list: Vec<Breakpoint>) -> Vec<Breakpoint> {
    for bp in &mut list {
        if bp.suffix.is_empty() {
            bp.suffix = camel_case(&bp.alias);
        }
    }
    list
}

/// The canonical, queryable set of breakpoints.
///
/// Items are kept in descending priority order (stable for equal priorities).
/// Lookups are by alias or by literal media query; when two entries share an
/// alias or a query, the higher-priority one is returned. Lookups never fail
/// loudly: unknown keys return `None`.
///
/// # Example
///
/// ```rust
/// use understory_breakpoints::{Breakpoint, BreakpointRegistry};
///
/// let registry = BreakpointRegistry::new([
///     Breakpoint::new("sm", "(max-width: 959px)", 10),
///     Breakpoint::new("xs", "(max-width: 599px)", 100),
/// ]);
///
/// assert_eq!(registry.items()[0].alias, "xs");
/// assert_eq!(registry.find_by_query("(max-width: 959px)").unwrap().alias, "sm");
/// assert!(registry.find_by_alias("").is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct BreakpointRegistry {
    items: Vec<Breakpoint>,
    by_alias: HashMap<String, usize>,
    by_query: HashMap<String, usize>,
}

impl BreakpointRegistry {
    /// Builds a registry from an arbitrary list of breakpoints.
    ///
    /// Suffixes are taken as given; use [`validate_suffixes`] first if some
    /// are empty.
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = Breakpoint>) -> Self {
        let mut items: Vec<Breakpoint> = items.into_iter().collect();
        items.sort_by(sort_descending_priority);

        let mut by_alias = HashMap::with_capacity(items.len());
        let mut by_query = HashMap::with_capacity(items.len());
        for (index, bp) in items.iter().enumerate() {
            by_alias.entry(bp.alias.clone()).or_insert(index);
            by_query.entry(bp.media_query.clone()).or_insert(index);
        }

        Self {
            items,
            by_alias,
            by_query,
        }
    }

    /// Builds the registry described by a [`LayoutConfig`].
    ///
    /// The built-in size breakpoints come first (unless disabled), followed
    /// by the orientation breakpoints (when enabled); the config's custom
    /// breakpoints are then merged in by alias.
    #[must_use]
    pub fn from_config(config: &LayoutConfig) -> Self {
        let mut defaults = Vec::new();
        if !config.disable_default_bps {
            defaults.extend(default_breakpoints());
        }
        if config.add_orientation_bps {
            defaults.extend(orientation_breakpoints());
        }
        Self::new(merge_by_alias(defaults, &config.breakpoints))
    }

    /// Returns all breakpoints in descending priority order.
    #[must_use]
    #[inline]
    pub fn items(&self) -> &[Breakpoint] {
        &self.items
    }

    /// Returns the number of registered breakpoints.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no breakpoints are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up a breakpoint by alias.
    ///
    /// The default alias (`""`) is never stored and always returns `None`.
    #[must_use]
    pub fn find_by_alias(&self, alias: &str) -> Option<&Breakpoint> {
        if alias == DEFAULT_ALIAS {
            return None;
        }
        self.by_alias.get(alias).map(|&i| &self.items[i])
    }

    /// Looks up a breakpoint by its literal media query.
    #[must_use]
    pub fn find_by_query(&self, media_query: &str) -> Option<&Breakpoint> {
        self.by_query.get(media_query).map(|&i| &self.items[i])
    }

    /// Returns the overlapping breakpoints, in priority order.
    pub fn overlappings(&self) -> impl Iterator<Item = &Breakpoint> + '_ {
        self.items.iter().filter(|bp| bp.overlapping)
    }

    /// Returns every alias, in priority order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|bp| bp.alias.as_str())
    }

    /// Returns every suffix, in priority order.
    pub fn suffixes(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|bp| bp.suffix.as_str())
    }

    /// Returns every media query, in priority order.
    pub fn media_queries(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|bp| bp.media_query.as_str())
    }
}
