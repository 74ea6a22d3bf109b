// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`StyleBuilder`] contract and its memoization cache.

use alloc::rc::Rc;
use alloc::string::String;
use core::any::Any;
use core::cell::RefCell;
use core::fmt;

use hashbrown::HashMap;

use crate::style_map::StyleMap;

/// Computes the styles for one responsive feature from its resolved value.
///
/// `parent` is an opaque, feature-specific context (for example the parent
/// container's flow direction). Closures of the shape
/// `Fn(&str, Option<&dyn Any>) -> StyleMap` implement this trait with the
/// default hooks.
///
/// ```rust
/// use core::any::Any;
/// use understory_styler::{StyleBuilder, StyleMap};
///
/// let order = |input: &str, _: Option<&dyn Any>| StyleMap::new().with("order", input);
/// assert_eq!(order.build_styles("2", None).value("order"), Some("2"));
/// assert!(order.should_cache());
/// ```
pub trait StyleBuilder {
    /// Computes the styles for `input`.
    fn build_styles(&self, input: &str, parent: Option<&dyn Any>) -> StyleMap;

    /// Runs after the styles for `input` were applied.
    ///
    /// For builders that must touch something other than the element itself.
    fn side_effect(&self, input: &str, styles: &StyleMap, parent: Option<&dyn Any>) {
        let _ = (input, styles, parent);
    }

    /// Whether results may be memoized by input string.
    ///
    /// The cache key ignores `parent`; builders whose output depends on it
    /// should return `false`.
    fn should_cache(&self) -> bool {
        true
    }
}

impl<F> StyleBuilder for F
where
    F: Fn(&str, Option<&dyn Any>) -> StyleMap,
{
    fn build_styles(&self, input: &str, parent: Option<&dyn Any>) -> StyleMap {
        self(input, parent)
    }
}

/// Memoized builder output, keyed by the literal input string.
///
/// Never evicts; its size is bounded by the number of distinct inputs.
#[derive(Clone, Default)]
pub struct StyleCache {
    entries: HashMap<String, StyleMap>,
}

/// A [`StyleCache`] shared between engines of the same feature.
pub type SharedStyleCache = Rc<RefCell<StyleCache>>;

impl StyleCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache ready for sharing.
    #[must_use]
    pub fn shared() -> SharedStyleCache {
        Rc::new(RefCell::new(Self::new()))
    }

    /// The cached styles for `input`.
    #[must_use]
    pub fn get(&self, input: &str) -> Option<&StyleMap> {
        self.entries.get(input)
    }

    /// Caches `styles` for `input`.
    pub fn insert(&mut self, input: &str, styles: StyleMap) {
        self.entries.insert(input.into(), styles);
    }

    /// Number of cached inputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for StyleCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Returns the styles for `input`, consulting `cache` when the builder
/// allows it.
///
/// The cache borrow is released before the builder runs.
pub fn build_cached(
    builder: &dyn StyleBuilder,
    cache: &RefCell<StyleCache>,
    input: &str,
    parent: Option<&dyn Any>,
) -> StyleMap {
    if !builder.should_cache() {
        return builder.build_styles(input, parent);
    }
    let hit = cache.borrow().get(input).cloned();
    if let Some(styles) = hit {
        return styles;
    }
    let styles = builder.build_styles(input, parent);
    cache.borrow_mut().insert(input, styles.clone());
    styles
}
