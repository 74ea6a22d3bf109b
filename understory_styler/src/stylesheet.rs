// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtual stylesheets for non-interactive render targets.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;
use core::fmt;

use crate::element_map::ElementMap;

/// Captures styles per element where no live style surface exists.
pub trait VirtualStylesheet<E: ?Sized> {
    /// Records a property for an element.
    fn add_style_to_element(&self, element: &Rc<E>, name: &str, value: &str);

    /// The recorded value of a property, or an empty string.
    fn get_style_for_element(&self, element: &Rc<E>, name: &str) -> String;
}

/// The default [`VirtualStylesheet`]: element → property → value.
///
/// ```rust
/// use std::rc::Rc;
/// use understory_styler::{StylesheetMap, VirtualElement, VirtualStylesheet};
///
/// let sheet = StylesheetMap::new();
/// let el = Rc::new(VirtualElement::new());
/// sheet.add_style_to_element(&el, "order", "1");
/// assert_eq!(sheet.get_style_for_element(&el, "order"), "1");
/// assert_eq!(sheet.get_style_for_element(&el, "flex"), "");
/// ```
pub struct StylesheetMap<E: ?Sized> {
    styles: RefCell<ElementMap<E, BTreeMap<String, String>>>,
}

impl<E: ?Sized> Default for StylesheetMap<E> {
    fn default() -> Self {
        Self {
            styles: RefCell::new(ElementMap::new()),
        }
    }
}

impl<E: ?Sized> StylesheetMap<E> {
    /// Creates an empty stylesheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets every recorded style.
    pub fn clear_styles(&self) {
        self.styles.borrow_mut().clear();
    }

    /// All properties recorded for an element, ordered by name.
    #[must_use]
    pub fn styles_for(&self, element: &Rc<E>) -> BTreeMap<String, String> {
        self.styles
            .borrow()
            .get(element)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of elements with recorded styles, including dropped ones not
    /// yet purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.borrow().len()
    }

    /// Whether nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.borrow().is_empty()
    }

    /// Drops entries for elements that no longer exist.
    pub fn purge(&self) {
        self.styles.borrow_mut().purge();
    }
}

impl<E: ?Sized> VirtualStylesheet<E> for StylesheetMap<E> {
    fn add_style_to_element(&self, element: &Rc<E>, name: &str, value: &str) {
        self.styles
            .borrow_mut()
            .get_or_insert_with(element, BTreeMap::new)
            .insert(name.into(), value.into());
    }

    fn get_style_for_element(&self, element: &Rc<E>, name: &str) -> String {
        self.styles
            .borrow()
            .get(element)
            .and_then(|styles| styles.get(name))
            .cloned()
            .unwrap_or_default()
    }
}

impl<E: ?Sized> fmt::Debug for StylesheetMap<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StylesheetMap")
            .field("styles", &self.styles.borrow())
            .finish()
    }
}
