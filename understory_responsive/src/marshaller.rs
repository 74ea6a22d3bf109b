// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`MediaMarshaller`]: the per-element, per-breakpoint value store.
//!
//! ## Resolution
//!
//! A key resolves by walking the activated breakpoints from highest to lowest
//! priority, then the default breakpoint (`""`, unless fallbacks are off), and
//! taking the first value stored for that exact (element, key, breakpoint).
//!
//! A key whose value has never been set to something non-empty is inert: no
//! callback runs for it. Once it has been, every resolution pass runs exactly
//! one callback: clear when nothing resolves or the winner is
//! [`ResponsiveValue::Cleared`], update otherwise.
//!
//! ## Re-entrancy
//!
//! No internal borrow is held while a callback runs, so callbacks may call
//! back into the marshaller (set another key, release the element, ...).

use alloc::collections::BTreeMap;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use understory_breakpoints::{
    Breakpoint, BreakpointRegistry, DEFAULT_ALIAS, sort_descending_priority,
};
use understory_media::{
    HookTarget, MatchMedia, MediaChange, Observable, PrintHook, Subject, Subscription,
};
use understory_styler::ElementMap;

use crate::value::{BreakpointValues, ResponsiveValue};

/// Applies a resolved value for one key.
pub type UpdateFn = Rc<dyn Fn(&str)>;

/// Removes whatever a key's update callback applied.
pub type ClearFn = Rc<dyn Fn()>;

/// A callback invocation, as published by [`MediaMarshaller::track_value`].
///
/// Clears are published with an empty value.
pub struct ValueChange<E: ?Sized> {
    /// The element whose key changed.
    pub element: Rc<E>,
    /// The style key.
    pub key: String,
    /// The value passed to the update callback.
    pub value: String,
}

impl<E: ?Sized> Clone for ValueChange<E> {
    fn clone(&self) -> Self {
        Self {
            element: self.element.clone(),
            key: self.key.clone(),
            value: self.value.clone(),
        }
    }
}

impl<E: ?Sized> fmt::Debug for ValueChange<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueChange")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct KeyEntry {
    values: BreakpointValues,
    update: Option<UpdateFn>,
    clear: Option<ClearFn>,
    has_updated: bool,
    triggers_bound: bool,
    triggers: Subscription,
}

#[derive(Default)]
struct ElementState {
    keys: BTreeMap<String, KeyEntry>,
}

struct Inner<E: ?Sized> {
    registry: Rc<BreakpointRegistry>,
    hook: Rc<PrintHook>,
    match_media: MatchMedia,
    elements: RefCell<ElementMap<E, ElementState>>,
    activated: RefCell<Vec<Breakpoint>>,
    use_fallbacks: Cell<bool>,
    changes: Subject<ValueChange<E>>,
    subscription: RefCell<Subscription>,
}

enum Pass {
    Update(String),
    Clear,
}

/// The authoritative (element, key, breakpoint) → value store.
///
/// Elements are held weakly and keyed by `Rc` identity; call
/// [`release_element`](Self::release_element) when an element goes away to
/// drop its callbacks and trigger subscriptions immediately.
///
/// Cloning yields another handle to the same store.
pub struct MediaMarshaller<E: ?Sized + 'static> {
    inner: Rc<Inner<E>>,
}

impl<E: ?Sized + 'static> Clone for MediaMarshaller<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E: ?Sized + 'static> MediaMarshaller<E> {
    /// Creates a store and starts following activations of every registry
    /// query plus `print`, through `hook`.
    ///
    /// Queries that already match are applied before this returns.
    #[must_use]
    pub fn new(
        match_media: MatchMedia,
        registry: Rc<BreakpointRegistry>,
        hook: Rc<PrintHook>,
    ) -> Self {
        let marshaller = Self {
            inner: Rc::new(Inner {
                registry,
                hook,
                match_media,
                elements: RefCell::new(ElementMap::new()),
                activated: RefCell::new(Vec::new()),
                use_fallbacks: Cell::new(true),
                changes: Subject::new(),
                subscription: RefCell::new(Subscription::empty()),
            }),
        };
        marshaller.observe_activations();
        marshaller
    }

    fn observe_activations(&self) {
        let queries: Vec<String> = self
            .inner
            .registry
            .media_queries()
            .map(String::from)
            .collect();
        let queries = self.inner.hook.with_print_query(&queries);
        let target = WeakTarget(Rc::downgrade(&self.inner));
        let weak = Rc::downgrade(&self.inner);
        let subscription = self
            .inner
            .match_media
            .observe(&queries, false)
            .filter(self.inner.hook.intercept_events(target))
            .subscribe(move |change| {
                if let Some(inner) = weak.upgrade() {
                    Self { inner }.on_media_change(change);
                }
            });
        *self.inner.subscription.borrow_mut() = subscription;
    }

    fn on_media_change(&self, change: &MediaChange) {
        let Some(bp) = self.inner.registry.find_by_query(&change.media_query).cloned() else {
            tracing::trace!(query = %change.media_query, "ignoring unregistered query");
            return;
        };
        {
            let mut activated = self.inner.activated.borrow_mut();
            let position = activated
                .iter()
                .position(|active| active.media_query == bp.media_query);
            match (position, change.matches) {
                (None, true) => {
                    activated.push(bp.clone());
                    activated.sort_by(sort_descending_priority);
                }
                (Some(index), false) => {
                    activated.remove(index);
                }
                // Already in this state: a republished match or a stray
                // deactivation.
                _ => return,
            }
        }
        tracing::debug!(alias = %bp.alias, matches = change.matches, "breakpoint changed");
        self.update_styles();
    }

    /// The registry this store resolves against.
    #[must_use]
    pub fn registry(&self) -> &Rc<BreakpointRegistry> {
        &self.inner.registry
    }

    /// Registers the callbacks for an (element, key) pair.
    ///
    /// Repeated calls replace the callbacks and keep every stored value. Each
    /// of `extra_triggers` re-resolves this key whenever it emits; triggers
    /// are subscribed only on the first call that provides any.
    pub fn init(
        &self,
        element: &Rc<E>,
        key: &str,
        update: impl Fn(&str) + 'static,
        clear: impl Fn() + 'static,
        extra_triggers: &[Observable<()>],
    ) {
        let bind = {
            let mut elements = self.inner.elements.borrow_mut();
            let entry = elements
                .get_or_insert_with(element, ElementState::default)
                .keys
                .entry(key.into())
                .or_default();
            entry.update = Some(Rc::new(update));
            entry.clear = Some(Rc::new(clear));
            let bind = !entry.triggers_bound && !extra_triggers.is_empty();
            entry.triggers_bound |= bind;
            bind
        };
        tracing::debug!(key, "registered responsive key");
        if bind {
            self.watch_extra_triggers(element, key, extra_triggers);
        }
    }

    fn watch_extra_triggers(&self, element: &Rc<E>, key: &str, triggers: &[Observable<()>]) {
        let mut subscription = Subscription::empty();
        for trigger in triggers {
            let inner = Rc::downgrade(&self.inner);
            let target = Rc::downgrade(element);
            let key = String::from(key);
            subscription.add_subscription(trigger.subscribe(move |_: &()| {
                if let (Some(inner), Some(element)) = (inner.upgrade(), target.upgrade()) {
                    Self { inner }.trigger_update(&element, Some(key.as_str()));
                }
            }));
        }
        // Released while subscribing: drop the subscription outside the borrow.
        let orphan = {
            let mut elements = self.inner.elements.borrow_mut();
            match elements
                .get_mut(element)
                .and_then(|state| state.keys.get_mut(key))
            {
                Some(entry) => {
                    entry.triggers = subscription;
                    None
                }
                None => Some(subscription),
            }
        };
        drop(orphan);
    }

    /// Stores `value` for `alias` (`""` for the default breakpoint) and
    /// resolves this key right away.
    pub fn set_value(
        &self,
        element: &Rc<E>,
        key: &str,
        value: impl Into<ResponsiveValue>,
        alias: &str,
    ) {
        let value = value.into();
        tracing::trace!(key, alias, ?value, "set responsive value");
        {
            let mut elements = self.inner.elements.borrow_mut();
            let entry = elements
                .get_or_insert_with(element, ElementState::default)
                .keys
                .entry(key.into())
                .or_default();
            entry.has_updated |= value.is_meaningful();
            entry.values.set(alias, value);
        }
        self.resolve_key(element, key);
    }

    /// The value stored for `alias`, or the currently winning value when
    /// `alias` is `None`.
    #[must_use]
    pub fn get_value(
        &self,
        element: &Rc<E>,
        key: &str,
        alias: Option<&str>,
    ) -> Option<ResponsiveValue> {
        let elements = self.inner.elements.borrow();
        let values = &elements.get(element)?.keys.get(key)?.values;
        let value = match alias {
            Some(alias) => values.get(alias),
            None => self.winner(values),
        };
        value.cloned()
    }

    /// Whether any breakpoint, the default included, has a value for `key`.
    #[must_use]
    pub fn has_value(&self, element: &Rc<E>, key: &str) -> bool {
        self.inner
            .elements
            .borrow()
            .get(element)
            .and_then(|state| state.keys.get(key))
            .is_some_and(|entry| !entry.values.is_empty())
    }

    /// A hot stream of the callback invocations for (element, key).
    #[must_use]
    pub fn track_value(&self, element: &Rc<E>, key: &str) -> Observable<ValueChange<E>> {
        let target = Rc::downgrade(element);
        let key = String::from(key);
        self.inner.changes.as_observable().filter(move |change| {
            core::ptr::addr_eq(target.as_ptr(), Rc::as_ptr(&change.element)) && change.key == key
        })
    }

    /// Re-resolves every key of every live element.
    pub fn update_styles(&self) {
        let targets: Vec<(Rc<E>, Vec<String>)> = self
            .inner
            .elements
            .borrow()
            .iter()
            .map(|(element, state)| (element, state.keys.keys().cloned().collect()))
            .collect();
        for (element, keys) in targets {
            for key in keys {
                self.resolve_key(&element, &key);
            }
        }
    }

    /// Re-resolves one key of `element`, or all of its keys.
    pub fn trigger_update(&self, element: &Rc<E>, key: Option<&str>) {
        let keys: Vec<String> = match key {
            Some(key) => Vec::from([String::from(key)]),
            None => self
                .inner
                .elements
                .borrow()
                .get(element)
                .map(|state| state.keys.keys().cloned().collect())
                .unwrap_or_default(),
        };
        for key in keys {
            self.resolve_key(element, &key);
        }
    }

    fn winner<'a>(&self, values: &'a BreakpointValues) -> Option<&'a ResponsiveValue> {
        let activated = self.inner.activated.borrow();
        let fallback = self.inner.use_fallbacks.get().then_some(DEFAULT_ALIAS);
        let found = activated
            .iter()
            .map(|bp| bp.alias.as_str())
            .chain(fallback)
            .find_map(|alias| values.get(alias));
        found
    }

    fn resolve_key(&self, element: &Rc<E>, key: &str) {
        let pass = {
            let elements = self.inner.elements.borrow();
            let Some(entry) = elements.get(element).and_then(|state| state.keys.get(key)) else {
                return;
            };
            if !entry.has_updated {
                return;
            }
            match self.winner(&entry.values) {
                Some(ResponsiveValue::Set(value)) => Pass::Update(value.clone()),
                Some(ResponsiveValue::Cleared) | None => Pass::Clear,
            }
        };
        match pass {
            Pass::Update(value) => self.update_element(element, key, &value),
            Pass::Clear => self.clear_element(element, key),
        }
    }

    fn entry_with<R>(
        &self,
        element: &Rc<E>,
        key: &str,
        f: impl FnOnce(&KeyEntry) -> Option<R>,
    ) -> Option<R> {
        let elements = self.inner.elements.borrow();
        elements
            .get(element)
            .and_then(|state| state.keys.get(key))
            .and_then(f)
    }

    /// Runs the update callback of (element, key) with `value`, skipping
    /// resolution, and publishes the invocation.
    pub fn update_element(&self, element: &Rc<E>, key: &str, value: &str) {
        let Some(update) = self.entry_with(element, key, |entry| entry.update.clone()) else {
            return;
        };
        tracing::trace!(key, value, "update");
        update(value);
        self.publish(element, key, value);
    }

    /// Runs the clear callback of (element, key) and publishes an empty
    /// value.
    pub fn clear_element(&self, element: &Rc<E>, key: &str) {
        let Some(clear) = self.entry_with(element, key, |entry| entry.clear.clone()) else {
            return;
        };
        tracing::trace!(key, "clear");
        clear();
        self.publish(element, key, "");
    }

    fn publish(&self, element: &Rc<E>, key: &str, value: &str) {
        self.inner.changes.next(&ValueChange {
            element: element.clone(),
            key: key.into(),
            value: value.into(),
        });
    }

    /// Forgets everything about `element`: values, callbacks and trigger
    /// subscriptions. Releasing an unknown element does nothing.
    pub fn release_element(&self, element: &Rc<E>) {
        let released = self.inner.elements.borrow_mut().remove(element);
        if released.is_some() {
            tracing::debug!("released element");
        }
        drop(released);
    }

    /// Drops the entries of elements that no longer exist and returns how
    /// many there were.
    pub fn purge_detached(&self) -> usize {
        let purged = self.inner.elements.borrow_mut().purge();
        let count = purged.len();
        drop(purged);
        count
    }

    /// Live elements with at least one key.
    #[must_use]
    pub fn tracked_elements(&self) -> Vec<Rc<E>> {
        self.inner.elements.borrow().elements()
    }

    /// The alias of the highest-priority activated breakpoint, or `""`.
    #[must_use]
    pub fn activated_alias(&self) -> String {
        self.activated_breakpoint()
            .map(|bp| bp.alias)
            .unwrap_or_default()
    }

    /// The highest-priority activated breakpoint.
    #[must_use]
    pub fn activated_breakpoint(&self) -> Option<Breakpoint> {
        self.inner.activated.borrow().first().cloned()
    }

    /// The activated breakpoints, highest priority first.
    #[must_use]
    pub fn activated_breakpoints(&self) -> Vec<Breakpoint> {
        self.inner.activated.borrow().clone()
    }

    /// Replaces the activated breakpoints without re-resolving anything.
    pub fn set_activated_breakpoints(&self, breakpoints: Vec<Breakpoint>) {
        *self.inner.activated.borrow_mut() = breakpoints;
    }

    /// Whether resolution falls back to the default breakpoint.
    #[must_use]
    pub fn use_fallbacks(&self) -> bool {
        self.inner.use_fallbacks.get()
    }

    /// Enables or disables falling back to the default breakpoint.
    pub fn set_use_fallbacks(&self, enabled: bool) {
        self.inner.use_fallbacks.set(enabled);
    }
}

impl<E: ?Sized + 'static> fmt::Debug for MediaMarshaller<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let activated: Vec<String> = self
            .inner
            .activated
            .borrow()
            .iter()
            .map(|bp| bp.alias.clone())
            .collect();
        f.debug_struct("MediaMarshaller")
            .field("elements", &self.inner.elements.borrow().len())
            .field("activated", &activated)
            .field("use_fallbacks", &self.inner.use_fallbacks.get())
            .finish_non_exhaustive()
    }
}

/// The marshaller as seen by the print hook, without keeping it alive.
struct WeakTarget<E: ?Sized>(Weak<Inner<E>>);

impl<E: ?Sized + 'static> WeakTarget<E> {
    fn marshaller(&self) -> Option<MediaMarshaller<E>> {
        self.0.upgrade().map(|inner| MediaMarshaller { inner })
    }
}

impl<E: ?Sized + 'static> HookTarget for WeakTarget<E> {
    fn activated_breakpoints(&self) -> Vec<Breakpoint> {
        self.marshaller()
            .map(|m| m.activated_breakpoints())
            .unwrap_or_default()
    }

    fn set_activated_breakpoints(&self, breakpoints: Vec<Breakpoint>) {
        if let Some(m) = self.marshaller() {
            m.set_activated_breakpoints(breakpoints);
        }
    }

    fn update_styles(&self) {
        if let Some(m) = self.marshaller() {
            m.update_styles();
        }
    }
}
