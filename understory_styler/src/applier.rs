// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`StyleUtils`]: applies computed styles to elements and reads them back.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::element::StyleElement;
use crate::error::StyleError;
use crate::inline::{InlineStyle, to_kebab_case};
use crate::style_map::StyleMap;
use crate::stylesheet::VirtualStylesheet;

const STYLE_ATTRIBUTE: &str = "style";
const FLEX_DIRECTION: &str = "flex-direction";
const FLEX_WRAP: &str = "flex-wrap";

/// Where styles end up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderTarget {
    /// A live, interactive surface with inline and computed styles.
    Browser,
    /// A non-interactive surface (server rendering).
    Server,
}

/// Applies [`StyleMap`]s to elements and looks styles up again.
///
/// Three modes:
///
/// - [`RenderTarget::Browser`]: inline styles are written directly; lookups
///   fall back to computed style.
/// - Server with a [`VirtualStylesheet`]: styles are recorded in the
///   stylesheet; lookups fall back to it.
/// - Server without one: styles are written into the element's `style`
///   attribute (property names converted to kebab-case). Reading a malformed
///   attribute fails with [`StyleError::InvalidDeclaration`].
///
/// Within a map, properties are written in name order and the values of a
/// multi-valued property in sorted order, so vendor-prefixed declarations are
/// always overwritten by the standard one.
///
/// ```rust
/// use std::rc::Rc;
/// use understory_styler::{StyleElement, StyleMap, StyleUtils, VirtualElement};
///
/// let utils = StyleUtils::browser();
/// let el = Rc::new(VirtualElement::new());
/// let styles = StyleMap::new()
///     .with("flex-direction", "column")
///     .with_values("display", ["flex", "-webkit-flex"]);
/// utils.apply_style_to_element(&el, &styles).unwrap();
///
/// assert_eq!(el.inline_style("display").as_deref(), Some("flex"));
/// assert_eq!(utils.get_flow_direction(&el).unwrap(), ("column".into(), true));
/// ```
pub struct StyleUtils<E: ?Sized> {
    target: RenderTarget,
    stylesheet: Option<Rc<dyn VirtualStylesheet<E>>>,
}

impl<E: ?Sized> Clone for StyleUtils<E> {
    fn clone(&self) -> Self {
        Self {
            target: self.target,
            stylesheet: self.stylesheet.clone(),
        }
    }
}

impl<E: StyleElement + ?Sized> StyleUtils<E> {
    /// An applier for a live, interactive surface.
    #[must_use]
    pub fn browser() -> Self {
        Self {
            target: RenderTarget::Browser,
            stylesheet: None,
        }
    }

    /// An applier for server rendering without a virtual stylesheet.
    #[must_use]
    pub fn server() -> Self {
        Self {
            target: RenderTarget::Server,
            stylesheet: None,
        }
    }

    /// An applier for server rendering that records styles in `stylesheet`.
    #[must_use]
    pub fn server_with_stylesheet(stylesheet: Rc<dyn VirtualStylesheet<E>>) -> Self {
        Self {
            target: RenderTarget::Server,
            stylesheet: Some(stylesheet),
        }
    }

    /// The render target.
    #[must_use]
    #[inline]
    pub fn target(&self) -> RenderTarget {
        self.target
    }

    fn server_stylesheet(&self) -> Option<&Rc<dyn VirtualStylesheet<E>>> {
        match self.target {
            RenderTarget::Browser => None,
            RenderTarget::Server => self.stylesheet.as_ref(),
        }
    }

    /// Whether server rendering is backed by a virtual stylesheet.
    #[must_use]
    pub fn server_module_loaded(&self) -> bool {
        self.server_stylesheet().is_some()
    }

    /// Writes every declaration of `styles` to `element`.
    pub fn apply_style_to_element(
        &self,
        element: &Rc<E>,
        styles: &StyleMap,
    ) -> Result<(), StyleError> {
        for (name, values) in styles {
            let mut sorted: Vec<&str> = values.iter().map(String::as_str).collect();
            sorted.sort_unstable();
            for value in sorted {
                self.write(element, name, value)?;
            }
        }
        Ok(())
    }

    /// Writes one declaration to `element`.
    pub fn apply_style_property(
        &self,
        element: &Rc<E>,
        name: &str,
        value: &str,
    ) -> Result<(), StyleError> {
        self.write(element, name, value)
    }

    /// Writes `styles` to every element.
    pub fn apply_style_to_elements(
        &self,
        styles: &StyleMap,
        elements: &[Rc<E>],
    ) -> Result<(), StyleError> {
        for element in elements {
            self.apply_style_to_element(element, styles)?;
        }
        Ok(())
    }

    fn write(&self, element: &Rc<E>, name: &str, value: &str) -> Result<(), StyleError> {
        tracing::trace!(name, value, "apply style");
        if let Some(sheet) = self.server_stylesheet() {
            sheet.add_style_to_element(element, name, value);
            return Ok(());
        }
        match self.target {
            RenderTarget::Browser => {
                element.set_inline_style(name, value);
                Ok(())
            }
            RenderTarget::Server => {
                let mut style = read_style_attribute(&**element)?;
                style.set(&to_kebab_case(name), value);
                element.set_attribute(STYLE_ATTRIBUTE, &style.to_attribute());
                Ok(())
            }
        }
    }

    /// The inline value of a property, or an empty string.
    ///
    /// On the server this reads the `style` attribute.
    pub fn lookup_inline_style(&self, element: &Rc<E>, name: &str) -> Result<String, StyleError> {
        match self.target {
            RenderTarget::Browser => Ok(element.inline_style(name).unwrap_or_default()),
            RenderTarget::Server => Ok(read_style_attribute(&**element)?
                .get(name)
                .map(String::from)
                .unwrap_or_default()),
        }
    }

    /// The effective value of a property, trimmed, or an empty string.
    ///
    /// The inline value wins. Otherwise the browser falls back to computed
    /// style (unless `inline_only`), and the server to its virtual stylesheet
    /// when one is present.
    pub fn lookup_style(
        &self,
        element: &Rc<E>,
        name: &str,
        inline_only: bool,
    ) -> Result<String, StyleError> {
        let mut value = self.lookup_inline_style(element, name)?;
        if value.is_empty() {
            value = match (self.target, self.server_stylesheet()) {
                (RenderTarget::Browser, _) if !inline_only => {
                    element.computed_style(name).unwrap_or_default()
                }
                (RenderTarget::Server, Some(sheet)) => sheet.get_style_for_element(element, name),
                _ => String::new(),
            };
        }
        Ok(String::from(value.trim()))
    }

    /// The value of an attribute, or an empty string.
    #[must_use]
    pub fn lookup_attribute_value(&self, element: &Rc<E>, name: &str) -> String {
        element.attribute(name).unwrap_or_default()
    }

    /// The element's `flex-direction` (defaulting to `row`) and whether it
    /// is set inline.
    ///
    /// On a server with a virtual stylesheet every found value counts as
    /// inline.
    pub fn get_flow_direction(&self, element: &Rc<E>) -> Result<(String, bool), StyleError> {
        let value = self.lookup_style(element, FLEX_DIRECTION, false)?;
        let inline = !self.lookup_inline_style(element, FLEX_DIRECTION)?.is_empty()
            || self.server_module_loaded();
        let has_inline = inline && !value.is_empty();
        let value = if value.is_empty() {
            String::from("row")
        } else {
            value
        };
        Ok((value, has_inline))
    }

    /// Whether the element's `flex-wrap` is `wrap`.
    pub fn has_wrap(&self, element: &Rc<E>) -> Result<bool, StyleError> {
        Ok(self.lookup_style(element, FLEX_WRAP, false)? == "wrap")
    }
}

fn read_style_attribute<E: StyleElement + ?Sized>(element: &E) -> Result<InlineStyle, StyleError> {
    match element.attribute(STYLE_ATTRIBUTE) {
        Some(text) => InlineStyle::parse(&text),
        None => Ok(InlineStyle::default()),
    }
}

impl<E: ?Sized> fmt::Debug for StyleUtils<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleUtils")
            .field("target", &self.target)
            .field("stylesheet", &self.stylesheet.is_some())
            .finish()
    }
}
