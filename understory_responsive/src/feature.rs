// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Responsive features: a style key paired with the builder for it.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use hashbrown::HashMap;
use understory_styler::{SharedStyleCache, StyleBuilder, StyleCache, StyleMap, build_cached};

/// Everything the engine needs to know about one responsive feature.
///
/// Clones share the builder and the style cache, so every element using the
/// same feature reuses computed styles.
#[derive(Clone)]
pub struct StyleFeature {
    key: String,
    builder: Rc<dyn StyleBuilder>,
    cache: SharedStyleCache,
}

impl StyleFeature {
    /// Creates a feature with a fresh style cache.
    #[must_use]
    pub fn new(key: impl Into<String>, builder: impl StyleBuilder + 'static) -> Self {
        Self {
            key: key.into(),
            builder: Rc::new(builder),
            cache: StyleCache::shared(),
        }
    }

    /// The style key, for example `layout`.
    #[must_use]
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether computed styles are memoized by input.
    #[must_use]
    #[inline]
    pub fn cacheable(&self) -> bool {
        self.builder.should_cache()
    }

    /// The builder.
    #[must_use]
    pub fn builder(&self) -> &dyn StyleBuilder {
        &*self.builder
    }

    /// The shared cache of computed styles.
    #[must_use]
    pub fn cache(&self) -> &SharedStyleCache {
        &self.cache
    }

    /// Computes the styles for `input`, through the cache when allowed.
    #[must_use]
    pub fn build(&self, input: &str, parent: Option<&dyn Any>) -> StyleMap {
        build_cached(&*self.builder, &self.cache, input, parent)
    }
}

impl fmt::Debug for StyleFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleFeature")
            .field("key", &self.key)
            .field("cacheable", &self.cacheable())
            .field("cached", &self.cache.borrow().len())
            .finish_non_exhaustive()
    }
}

/// Features by style key.
///
/// ```rust
/// use core::any::Any;
/// use understory_responsive::{FeatureRegistry, StyleFeature};
/// use understory_styler::StyleMap;
///
/// let mut features = FeatureRegistry::new();
/// features.register(StyleFeature::new("order", |input: &str, _: Option<&dyn Any>| {
///     StyleMap::new().with("order", input)
/// }));
///
/// let order = features.get("order").unwrap();
/// assert_eq!(order.build("3", None).value("order"), Some("3"));
/// assert!(features.get("flex").is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct FeatureRegistry {
    features: HashMap<String, StyleFeature>,
}

impl FeatureRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `feature`, replacing any feature with the same key.
    pub fn register(&mut self, feature: StyleFeature) -> Option<StyleFeature> {
        self.features.insert(feature.key.clone(), feature)
    }

    /// The feature for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StyleFeature> {
        self.features.get(key)
    }

    /// Registered keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.features.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Number of registered features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct ParentSensitive {
        calls: Rc<Cell<usize>>,
    }

    impl StyleBuilder for ParentSensitive {
        fn build_styles(&self, input: &str, parent: Option<&dyn Any>) -> StyleMap {
            self.calls.set(self.calls.get() + 1);
            let dir = parent.and_then(|p| p.downcast_ref::<String>());
            StyleMap::new()
                .with("flex", input)
                .with("flex-direction", dir.map_or("row", String::as_str))
        }

        fn should_cache(&self) -> bool {
            false
        }
    }

    #[test]
    fn clones_share_the_cache() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let feature = StyleFeature::new("flex", move |input: &str, _: Option<&dyn Any>| {
            counter.set(counter.get() + 1);
            StyleMap::new().with("flex", input)
        });
        let other = feature.clone();
        let _ = feature.build("1", None);
        let _ = other.build("1", None);
        assert_eq!(calls.get(), 1);
        assert_eq!(other.cache().borrow().len(), 1);
        assert!(feature.cacheable());
    }

    #[test]
    fn uncacheable_builders_see_every_parent() {
        let calls = Rc::new(Cell::new(0));
        let feature = StyleFeature::new(
            "flex",
            ParentSensitive {
                calls: calls.clone(),
            },
        );
        let column = String::from("column");
        assert_eq!(feature.build("1", None).value("flex-direction"), Some("row"));
        assert_eq!(
            feature.build("1", Some(&column)).value("flex-direction"),
            Some("column")
        );
        assert_eq!(calls.get(), 2);
        assert!(!feature.cacheable());
        assert!(feature.cache().borrow().is_empty());
    }

    #[test]
    fn register_replaces_by_key() {
        let mut features = FeatureRegistry::new();
        let build = |_: &str, _: Option<&dyn Any>| StyleMap::new();
        assert!(features.register(StyleFeature::new("b", build)).is_none());
        assert!(features.register(StyleFeature::new("a", build)).is_none());
        assert!(features.register(StyleFeature::new("a", build)).is_some());
        assert_eq!(features.keys(), ["a", "b"]);
        assert_eq!(features.len(), 2);
    }
}
