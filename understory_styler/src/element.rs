// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The element seam and an in-memory element.

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::cell::RefCell;

use hashbrown::HashMap;

/// A styled element as seen by the style applier.
///
/// All methods take `&self`; elements are shared (`Rc`) and mutate through
/// interior mutability, like live DOM nodes.
pub trait StyleElement {
    /// The inline value of a property, if set.
    fn inline_style(&self, name: &str) -> Option<String>;

    /// Sets an inline property. An empty value removes it.
    fn set_inline_style(&self, name: &str, value: &str);

    /// The computed (cascaded and inherited) value of a property.
    ///
    /// Non-interactive targets have no computed style.
    fn computed_style(&self, name: &str) -> Option<String> {
        let _ = name;
        None
    }

    /// The value of an attribute, if present.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Sets an attribute.
    fn set_attribute(&self, name: &str, value: &str);
}

/// An element held entirely in memory.
///
/// Useful as a server-side stand-in and in tests. Computed style falls back to
/// explicitly provided values and then to the inline value.
///
/// ```rust
/// use understory_styler::{StyleElement, VirtualElement};
///
/// let el = VirtualElement::new();
/// el.set_inline_style("order", "2");
/// assert_eq!(el.inline_style("order").as_deref(), Some("2"));
/// el.set_inline_style("order", "");
/// assert_eq!(el.inline_style("order"), None);
/// ```
#[derive(Debug, Default)]
pub struct VirtualElement {
    inline: RefCell<BTreeMap<String, String>>,
    computed: RefCell<HashMap<String, String>>,
    attributes: RefCell<HashMap<String, String>>,
}

impl VirtualElement {
    /// Creates an element with no styles or attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a computed value, as if inherited from a stylesheet.
    pub fn set_computed_style(&self, name: &str, value: &str) {
        self.computed.borrow_mut().insert(name.into(), value.into());
    }

    /// A snapshot of all inline properties, ordered by name.
    #[must_use]
    pub fn inline_styles(&self) -> BTreeMap<String, String> {
        self.inline.borrow().clone()
    }
}

impl StyleElement for VirtualElement {
    fn inline_style(&self, name: &str) -> Option<String> {
        self.inline.borrow().get(name).cloned()
    }

    fn set_inline_style(&self, name: &str, value: &str) {
        let mut inline = self.inline.borrow_mut();
        if value.is_empty() {
            inline.remove(name);
        } else {
            inline.insert(name.into(), value.into());
        }
    }

    fn computed_style(&self, name: &str) -> Option<String> {
        self.computed
            .borrow()
            .get(name)
            .cloned()
            .or_else(|| self.inline_style(name))
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.into(), value.into());
    }
}
