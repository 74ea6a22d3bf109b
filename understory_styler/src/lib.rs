// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Styler: computed styles and how they reach elements.
//!
//! This crate is the output half of responsive styling:
//!
//! - [`StyleMap`]: the declarations a feature computes, ordered so
//!   vendor-prefixed properties are written before standard ones.
//! - [`StyleBuilder`]: the per-feature contract,
//!   `(value, parent context) -> StyleMap`, with an optional side effect and
//!   an opt-out from memoization. [`StyleCache`] holds memoized results.
//! - [`StyleUtils`]: writes style maps to elements (inline styles, a
//!   [`VirtualStylesheet`], or the `style` attribute) and reads styles back.
//! - [`ElementMap`]: per-element data keyed by `Rc` identity through weak
//!   references, shared by the stylesheet and the responsive store.
//!
//! Elements are anything implementing [`StyleElement`]; [`VirtualElement`]
//! is an in-memory implementation.
//!
//! ## Example
//!
//! ```rust
//! use core::any::Any;
//! use core::cell::RefCell;
//! use std::rc::Rc;
//! use understory_styler::{
//!     StyleCache, StyleElement, StyleMap, StyleUtils, VirtualElement, build_cached,
//! };
//!
//! let layout = |input: &str, _: Option<&dyn Any>| {
//!     StyleMap::new()
//!         .with("flex-direction", input)
//!         .with("-webkit-flex-direction", input)
//!         .with_values("display", ["flex", "-webkit-flex"])
//! };
//!
//! let cache = RefCell::new(StyleCache::new());
//! let utils = StyleUtils::browser();
//! let el = Rc::new(VirtualElement::new());
//!
//! let styles = build_cached(&layout, &cache, "column", None);
//! utils.apply_style_to_element(&el, &styles).unwrap();
//!
//! assert_eq!(el.inline_style("flex-direction").as_deref(), Some("column"));
//! assert_eq!(el.inline_style("display").as_deref(), Some("flex"));
//! assert_eq!(cache.borrow().len(), 1);
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod applier;
mod builder;
mod element;
mod element_map;
mod error;
mod inline;
mod style_map;
mod stylesheet;

pub use applier::{RenderTarget, StyleUtils};
pub use builder::{SharedStyleCache, StyleBuilder, StyleCache, build_cached};
pub use element::{StyleElement, VirtualElement};
pub use element_map::ElementMap;
pub use error::StyleError;
pub use inline::{InlineStyle, to_kebab_case};
pub use style_map::{StyleMap, StyleValues};
pub use stylesheet::{StylesheetMap, VirtualStylesheet};
