// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A controllable [`MediaEnvironment`] for tests and headless hosts.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use hashbrown::HashMap;
use understory_breakpoints::BreakpointRegistry;

use crate::environment::{MediaEnvironment, MediaListener, MediaQueryList, StyleInjectionError};

/// Exclusive size aliases in ascending width order, used for overlap
/// simulation.
const SIZES: [&str; 5] = ["xs", "sm", "md", "lg", "xl"];

struct MockQueryList {
    media: String,
    matches: Cell<bool>,
    listeners: RefCell<Vec<MediaListener>>,
}

impl MockQueryList {
    fn new(media: &str) -> Self {
        Self {
            media: media.into(),
            matches: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl MediaQueryList for MockQueryList {
    fn media(&self) -> &str {
        &self.media
    }

    fn matches(&self) -> bool {
        self.matches.get()
    }

    fn add_listener(&self, listener: MediaListener) {
        let mut listeners = self.listeners.borrow_mut();
        if !listeners.iter().any(|l| Rc::ptr_eq(l, &listener)) {
            listeners.push(listener);
        }
    }

    fn remove_listener(&self, listener: &MediaListener) {
        self.listeners
            .borrow_mut()
            .retain(|l| !Rc::ptr_eq(l, listener));
    }
}

#[derive(Default)]
struct MockInner {
    lists: RefCell<HashMap<String, Rc<MockQueryList>>>,
    injected: RefCell<Vec<String>>,
    registry: Option<Rc<BreakpointRegistry>>,
    use_overlaps: Cell<bool>,
    fail_injection: Cell<bool>,
    server: bool,
}

/// A media environment whose query states are set by hand.
///
/// Every query starts out not matching. [`activate`](Self::activate) mimics a
/// viewport resize: it deactivates every other query and activates the given
/// one (an alias is resolved through the optional registry first). With
/// overlap simulation enabled, activating an exclusive size alias also
/// activates the `lt-*`/`gt-*` aliases that contain it.
///
/// Cloning yields another handle to the same environment.
#[derive(Clone, Default)]
pub struct MockMediaEnvironment {
    inner: Rc<MockInner>,
}

impl MockMediaEnvironment {
    /// Creates an interactive mock with no alias resolution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an interactive mock that resolves aliases through `registry`.
    #[must_use]
    pub fn with_registry(registry: Rc<BreakpointRegistry>) -> Self {
        Self {
            inner: Rc::new(MockInner {
                registry: Some(registry),
                ..MockInner::default()
            }),
        }
    }

    /// Creates a mock that reports itself as non-interactive.
    #[must_use]
    pub fn server() -> Self {
        Self {
            inner: Rc::new(MockInner {
                server: true,
                ..MockInner::default()
            }),
        }
    }

    /// Enables or disables overlap simulation in [`activate`](Self::activate).
    pub fn set_use_overlaps(&self, enabled: bool) {
        self.inner.use_overlaps.set(enabled);
    }

    /// Makes [`MediaEnvironment::inject_query_styles`] fail from now on.
    pub fn set_injection_failure(&self, fail: bool) {
        self.inner.fail_injection.set(fail);
    }

    fn resolve(&self, alias_or_query: &str) -> String {
        self.inner
            .registry
            .as_ref()
            .and_then(|registry| registry.find_by_alias(alias_or_query))
            .map_or_else(|| alias_or_query.into(), |bp| bp.media_query.clone())
    }

    fn list(&self, query: &str) -> Rc<MockQueryList> {
        self.inner
            .lists
            .borrow_mut()
            .entry(query.into())
            .or_insert_with(|| Rc::new(MockQueryList::new(query)))
            .clone()
    }

    /// Sets one query's state, notifying its listeners if it changed.
    pub fn set_matches(&self, alias_or_query: &str, matches: bool) {
        let list = self.list(&self.resolve(alias_or_query));
        if list.matches.replace(matches) == matches {
            return;
        }
        let listeners = list.listeners.borrow().clone();
        for listener in listeners {
            listener(matches);
        }
    }

    /// Activates one query (plus simulated overlaps) and deactivates the rest.
    pub fn activate(&self, alias_or_query: &str) {
        let query = self.resolve(alias_or_query);
        let mut targets = Vec::from([query.clone()]);
        if self.inner.use_overlaps.get() {
            targets.extend(self.overlaps_for(&query));
        }

        let active: Vec<String> = self
            .inner
            .lists
            .borrow()
            .values()
            .filter(|list| list.matches.get() && !targets.contains(&list.media))
            .map(|list| list.media.clone())
            .collect();
        for other in active {
            self.set_matches(&other, false);
        }
        for target in targets {
            self.set_matches(&target, true);
        }
    }

    fn overlaps_for(&self, query: &str) -> Vec<String> {
        let Some(registry) = self.inner.registry.as_ref() else {
            return Vec::new();
        };
        let Some(index) = registry
            .find_by_query(query)
            .and_then(|bp| SIZES.iter().position(|size| *size == bp.alias))
        else {
            return Vec::new();
        };
        let larger = SIZES[index + 1..].iter().map(|size| ["lt-", *size].concat());
        let smaller = SIZES[..index].iter().map(|size| ["gt-", *size].concat());
        larger
            .chain(smaller)
            .filter_map(|alias| registry.find_by_alias(&alias))
            .map(|bp| bp.media_query.clone())
            .collect()
    }

    /// Deactivates one query.
    pub fn deactivate(&self, alias_or_query: &str) {
        self.set_matches(alias_or_query, false);
    }

    /// Deactivates every query.
    pub fn deactivate_all(&self) {
        let active: Vec<String> = self
            .inner
            .lists
            .borrow()
            .values()
            .filter(|list| list.matches.get())
            .map(|list| list.media.clone())
            .collect();
        for query in active {
            self.set_matches(&query, false);
        }
    }

    /// Whether a query is currently set to match.
    #[must_use]
    pub fn is_active(&self, alias_or_query: &str) -> bool {
        let query = self.resolve(alias_or_query);
        self.inner
            .lists
            .borrow()
            .get(&query)
            .is_some_and(|list| list.matches.get())
    }

    /// Number of listeners attached to a query.
    #[must_use]
    pub fn listener_count(&self, alias_or_query: &str) -> usize {
        let query = self.resolve(alias_or_query);
        self.inner
            .lists
            .borrow()
            .get(&query)
            .map_or(0, |list| list.listeners.borrow().len())
    }

    /// Every stylesheet rule injected so far, in order.
    #[must_use]
    pub fn injected_styles(&self) -> Vec<String> {
        self.inner.injected.borrow().clone()
    }
}

impl MediaEnvironment for MockMediaEnvironment {
    fn supports_listeners(&self) -> bool {
        !self.inner.server
    }

    fn match_media(&self, query: &str) -> Rc<dyn MediaQueryList> {
        self.list(query)
    }

    fn inject_query_styles(&self, css: &str) -> Result<(), StyleInjectionError> {
        if self.inner.fail_injection.get() {
            return Err(StyleInjectionError::Rejected(css.into()));
        }
        self.inner.injected.borrow_mut().push(css.into());
        Ok(())
    }
}

impl fmt::Debug for MockMediaEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockMediaEnvironment")
            .field("queries", &self.inner.lists.borrow().len())
            .field("use_overlaps", &self.inner.use_overlaps.get())
            .field("server", &self.inner.server)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_breakpoints::LayoutConfig;

    fn registry() -> Rc<BreakpointRegistry> {
        Rc::new(BreakpointRegistry::from_config(&LayoutConfig::default()))
    }

    #[test]
    fn activate_is_exclusive() {
        let env = MockMediaEnvironment::with_registry(registry());
        env.activate("xs");
        env.activate("md");
        assert!(env.is_active("md"));
        assert!(!env.is_active("xs"));
    }

    #[test]
    fn overlaps_follow_size_order() {
        let env = MockMediaEnvironment::with_registry(registry());
        env.set_use_overlaps(true);
        env.activate("sm");
        for alias in ["sm", "lt-md", "lt-lg", "lt-xl", "gt-xs"] {
            assert!(env.is_active(alias), "{alias} should be active");
        }
        for alias in ["xs", "lt-sm", "gt-sm", "md"] {
            assert!(!env.is_active(alias), "{alias} should be inactive");
        }
    }

    #[test]
    fn listeners_fire_only_on_change() {
        let env = MockMediaEnvironment::new();
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let listener: MediaListener = Rc::new(move |_: bool| counter.set(counter.get() + 1));
        let list = env.match_media("q");
        list.add_listener(listener.clone());
        list.add_listener(listener.clone());
        env.set_matches("q", true);
        env.set_matches("q", true);
        env.deactivate("q");
        assert_eq!(count.get(), 2);
        assert_eq!(env.listener_count("q"), 1);
        list.remove_listener(&listener);
        assert_eq!(env.listener_count("q"), 0);
    }
}
