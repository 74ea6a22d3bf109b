// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`ResponsiveStyle`]: one feature bound to one element.

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use core::any::Any;
use core::cell::RefCell;
use core::fmt;

use understory_media::Observable;
use understory_styler::{StyleElement, StyleError, StyleMap, StyleUtils};

use crate::feature::StyleFeature;
use crate::marshaller::MediaMarshaller;
use crate::value::ResponsiveValue;

struct StyleInner<E: ?Sized> {
    element: Rc<E>,
    feature: StyleFeature,
    utils: StyleUtils<E>,
    /// Styles most recently written, so they can be cleared again.
    mru: RefCell<StyleMap>,
    current: RefCell<Option<String>>,
    parent: RefCell<Option<Rc<dyn Any>>>,
}

impl<E: StyleElement + ?Sized + 'static> StyleInner<E> {
    fn update_with_value(&self, input: &str) -> Result<(), StyleError> {
        if self.current.borrow().as_deref() == Some(input) {
            return Ok(());
        }
        self.add_styles(input)?;
        *self.current.borrow_mut() = Some(input.into());
        Ok(())
    }

    fn add_styles(&self, input: &str) -> Result<(), StyleError> {
        let parent = self.parent.borrow().clone();
        let parent = parent.as_deref();
        let styles = self.feature.build(input, parent);
        *self.mru.borrow_mut() = styles.clone();
        self.utils.apply_style_to_element(&self.element, &styles)?;
        self.feature.builder().side_effect(input, &styles, parent);
        Ok(())
    }

    fn clear_styles(&self) -> Result<(), StyleError> {
        let cleared = core::mem::take(&mut *self.mru.borrow_mut()).cleared();
        *self.current.borrow_mut() = None;
        self.utils.apply_style_to_element(&self.element, &cleared)
    }
}

/// The responsive engine for one feature on one element.
///
/// Values come in per breakpoint through [`set_input`](Self::set_input) or
/// [`set_value`](Self::set_value); the [`MediaMarshaller`] decides which one
/// wins and calls back here, where the feature's builder computes the styles
/// and [`StyleUtils`] writes them. Clearing writes empty values for every
/// property the last update set.
///
/// Style errors on the callback path (a malformed `style` attribute on the
/// server) are logged; [`apply`](Self::apply) reports them to the caller.
///
/// ```rust
/// use core::any::Any;
/// use std::rc::Rc;
/// use understory_breakpoints::{BreakpointRegistry, LayoutConfig};
/// use understory_media::{MatchMedia, MockMediaEnvironment, PrintHook};
/// use understory_responsive::{MediaMarshaller, ResponsiveStyle, StyleFeature};
/// use understory_styler::{StyleElement, StyleMap, StyleUtils, VirtualElement};
///
/// let config = LayoutConfig::default();
/// let registry = Rc::new(BreakpointRegistry::from_config(&config));
/// let env = MockMediaEnvironment::with_registry(registry.clone());
/// let engine = MatchMedia::new(Rc::new(env.clone()), &config);
/// let hook = Rc::new(PrintHook::new(registry.clone(), &config));
/// let marshal = MediaMarshaller::new(engine, registry, hook);
///
/// let order = StyleFeature::new("order", |input: &str, _: Option<&dyn Any>| {
///     StyleMap::new().with("order", input)
/// });
/// let el = Rc::new(VirtualElement::new());
/// let style = ResponsiveStyle::new(el.clone(), &order, marshal, StyleUtils::browser());
/// style.init(&[]);
///
/// style.set_input("order", "1");
/// style.set_input("order.gt-sm", "2");
/// assert_eq!(el.inline_style("order").as_deref(), Some("1"));
///
/// env.activate("gt-sm");
/// assert_eq!(el.inline_style("order").as_deref(), Some("2"));
/// ```
pub struct ResponsiveStyle<E: StyleElement + ?Sized + 'static> {
    inner: Rc<StyleInner<E>>,
    marshal: MediaMarshaller<E>,
}

impl<E: StyleElement + ?Sized + 'static> ResponsiveStyle<E> {
    /// Binds `feature` to `element`.
    ///
    /// Nothing is registered with `marshal` until [`init`](Self::init).
    #[must_use]
    pub fn new(
        element: Rc<E>,
        feature: &StyleFeature,
        marshal: MediaMarshaller<E>,
        utils: StyleUtils<E>,
    ) -> Self {
        Self {
            inner: Rc::new(StyleInner {
                element,
                feature: feature.clone(),
                utils,
                mru: RefCell::new(StyleMap::new()),
                current: RefCell::new(None),
                parent: RefCell::new(None),
            }),
            marshal,
        }
    }

    /// The element.
    #[must_use]
    pub fn element(&self) -> &Rc<E> {
        &self.inner.element
    }

    /// The style key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.inner.feature.key()
    }

    /// Registers this feature's callbacks with the marshaller.
    ///
    /// Each of `extra_triggers` re-resolves the value when it emits, for
    /// styles that depend on something besides the breakpoint (for example
    /// the parent's flow direction).
    pub fn init(&self, extra_triggers: &[Observable<()>]) {
        let on_update = Rc::downgrade(&self.inner);
        let on_clear = Rc::downgrade(&self.inner);
        self.marshal.init(
            &self.inner.element,
            self.key(),
            move |value| with_live(&on_update, |inner| inner.update_with_value(value)),
            move || with_live(&on_clear, StyleInner::clear_styles),
            extra_triggers,
        );
    }

    /// Routes an input named `key` or `key.alias` to the breakpoint it
    /// names.
    pub fn set_input(&self, name: &str, value: impl Into<ResponsiveValue>) {
        let alias = name.split_once('.').map_or("", |(_, alias)| alias);
        self.set_value(value, alias);
    }

    /// Stores `value` for `alias` (`""` for the default breakpoint).
    pub fn set_value(&self, value: impl Into<ResponsiveValue>, alias: &str) {
        self.marshal
            .set_value(&self.inner.element, self.key(), value, alias);
    }

    /// The currently winning value.
    #[must_use]
    pub fn activated_value(&self) -> Option<ResponsiveValue> {
        self.marshal.get_value(&self.inner.element, self.key(), None)
    }

    /// Stores `value` for the highest-priority activated breakpoint.
    pub fn set_activated_value(&self, value: impl Into<ResponsiveValue>) {
        let alias = self.marshal.activated_alias();
        self.set_value(value, &alias);
    }

    /// The input last applied, if its styles are still in place.
    #[must_use]
    pub fn current_value(&self) -> Option<String> {
        self.inner.current.borrow().clone()
    }

    /// The styles last applied.
    #[must_use]
    pub fn applied_styles(&self) -> StyleMap {
        self.inner.mru.borrow().clone()
    }

    /// Builds and applies the styles for `input` directly, skipping
    /// resolution.
    ///
    /// Applying the input already in place does nothing.
    pub fn apply(&self, input: &str) -> Result<(), StyleError> {
        self.inner.update_with_value(input)
    }

    /// Writes empty values for every property last applied.
    pub fn clear_styles(&self) -> Result<(), StyleError> {
        self.inner.clear_styles()
    }

    /// Sets the context passed to the builder as `parent`.
    ///
    /// Takes effect on the next update; call
    /// [`trigger_update`](Self::trigger_update) to rebuild now.
    pub fn set_parent_context(&self, parent: Option<Rc<dyn Any>>) {
        *self.inner.parent.borrow_mut() = parent;
    }

    /// Re-resolves and re-applies this feature.
    ///
    /// The cached input is forgotten first, so the styles are rebuilt even
    /// when the winning value did not change.
    pub fn trigger_update(&self) {
        *self.inner.current.borrow_mut() = None;
        self.marshal
            .trigger_update(&self.inner.element, Some(self.key()));
    }

    /// Releases the element from the marshaller.
    ///
    /// This drops the values and callbacks of every feature on the element.
    pub fn detach(&self) {
        self.marshal.release_element(&self.inner.element);
    }
}

fn with_live<E: StyleElement + ?Sized + 'static>(
    weak: &Weak<StyleInner<E>>,
    f: impl FnOnce(&StyleInner<E>) -> Result<(), StyleError>,
) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    if let Err(err) = f(&inner) {
        tracing::error!(key = inner.feature.key(), %err, "failed to apply responsive styles");
    }
}

impl<E: StyleElement + ?Sized + 'static> fmt::Debug for ResponsiveStyle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponsiveStyle")
            .field("key", &self.key())
            .field("current", &self.inner.current.borrow())
            .field("applied", &self.inner.mru.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use core::cell::Cell;
    use understory_breakpoints::{BreakpointRegistry, LayoutConfig};
    use understory_media::{MatchMedia, MockMediaEnvironment, PrintHook};
    use understory_styler::VirtualElement;

    fn marshal() -> (MockMediaEnvironment, MediaMarshaller<VirtualElement>) {
        let config = LayoutConfig::default();
        let registry = Rc::new(BreakpointRegistry::from_config(&config));
        let env = MockMediaEnvironment::with_registry(registry.clone());
        let engine = MatchMedia::new(Rc::new(env.clone()), &config);
        let hook = Rc::new(PrintHook::new(registry.clone(), &config));
        (env, MediaMarshaller::new(engine, registry, hook))
    }

    fn layout(calls: Rc<Cell<usize>>) -> StyleFeature {
        StyleFeature::new("layout", move |input: &str, _: Option<&dyn Any>| {
            calls.set(calls.get() + 1);
            StyleMap::new()
                .with("display", "flex")
                .with("flex-direction", input)
                .with("-webkit-flex-direction", input)
        })
    }

    #[test]
    fn clear_removes_every_applied_property() {
        let (env, marshal) = marshal();
        let el = Rc::new(VirtualElement::new());
        let style = ResponsiveStyle::new(
            el.clone(),
            &layout(Rc::default()),
            marshal,
            StyleUtils::browser(),
        );
        style.init(&[]);
        style.set_input("layout.md", "column");
        assert!(el.inline_styles().is_empty());

        env.activate("md");
        assert_eq!(el.inline_style("flex-direction").as_deref(), Some("column"));
        assert_eq!(style.current_value().as_deref(), Some("column"));

        env.deactivate("md");
        assert!(el.inline_styles().is_empty());
        assert_eq!(style.current_value(), None);
        assert!(style.applied_styles().is_empty());
    }

    #[test]
    fn unchanged_winner_is_not_rebuilt() {
        let calls = Rc::new(Cell::new(0));
        let (env, marshal) = marshal();
        let feature = layout(calls.clone());
        let el = Rc::new(VirtualElement::new());
        let style = ResponsiveStyle::new(el, &feature, marshal, StyleUtils::browser());
        style.init(&[]);
        style.set_input("layout", "row");
        env.activate("xs");
        env.activate("sm");
        assert_eq!(calls.get(), 1);
        assert_eq!(style.activated_value(), Some("row".into()));
    }

    #[test]
    fn trigger_update_rebuilds_with_new_parent() {
        let (_env, marshal) = marshal();
        let flow = StyleFeature::new("flex", |input: &str, parent: Option<&dyn Any>| {
            let dir = parent
                .and_then(|p| p.downcast_ref::<&str>())
                .copied()
                .unwrap_or("row");
            let basis = if dir == "column" { "max-height" } else { "max-width" };
            StyleMap::new().with(basis, input)
        });
        let el = Rc::new(VirtualElement::new());
        let style = ResponsiveStyle::new(el.clone(), &flow, marshal, StyleUtils::browser());
        style.init(&[]);
        style.set_input("flex", "50%");
        assert_eq!(el.inline_style("max-width").as_deref(), Some("50%"));

        style.set_parent_context(Some(Rc::new("column")));
        style.trigger_update();
        // The feature is cacheable, so the cached styles come back.
        assert_eq!(el.inline_style("max-height"), None);
        let keys: Vec<String> = style.applied_styles().keys().map(String::from).collect();
        assert_eq!(keys, ["max-width"]);
    }

    #[test]
    fn set_activated_value_targets_top_breakpoint() {
        let (env, marshal) = marshal();
        let el = Rc::new(VirtualElement::new());
        let style = ResponsiveStyle::new(
            el.clone(),
            &layout(Rc::default()),
            marshal.clone(),
            StyleUtils::browser(),
        );
        style.init(&[]);
        env.activate("lg");
        style.set_activated_value("row-reverse");
        assert_eq!(
            marshal.get_value(&el, "layout", Some("lg")),
            Some("row-reverse".into())
        );
        style.detach();
        assert!(!marshal.has_value(&el, "layout"));
    }
}
