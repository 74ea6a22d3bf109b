// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Responsive: breakpoint-scoped values resolved into styles.
//!
//! Markup declares a value per breakpoint (`layout="row"`,
//! `layout.lt-md="column"`). This crate keeps every such value and, as
//! breakpoints activate and deactivate, decides which one wins and hands it to
//! the feature's style builder.
//!
//! - [`MediaMarshaller`]: the (element, key, breakpoint) → value store. It
//!   follows the activated breakpoints (through the print hook) and runs
//!   exactly one update or clear callback per key and resolution pass.
//! - [`StyleFeature`] and [`FeatureRegistry`]: a style key paired with its
//!   builder and a shared cache of computed styles.
//! - [`ResponsiveStyle`]: one feature bound to one element; turns winning
//!   values into applied styles and clears them again.
//!
//! ## Resolution
//!
//! ```rust
//! use core::cell::RefCell;
//! use std::rc::Rc;
//! use understory_breakpoints::{Breakpoint, BreakpointRegistry, LayoutConfig};
//! use understory_media::{MatchMedia, MockMediaEnvironment, PrintHook};
//! use understory_responsive::MediaMarshaller;
//!
//! let config = LayoutConfig::default()
//!     .with_default_breakpoints_disabled(true)
//!     .with_breakpoint(Breakpoint::new("xs", "(max-width:599px)", 100));
//! let registry = Rc::new(BreakpointRegistry::from_config(&config));
//! let env = MockMediaEnvironment::with_registry(registry.clone());
//! let engine = MatchMedia::new(Rc::new(env.clone()), &config);
//! let hook = Rc::new(PrintHook::new(registry.clone(), &config));
//! let marshal = MediaMarshaller::new(engine, registry, hook);
//!
//! let el: Rc<str> = Rc::from("element");
//! let applied = Rc::new(RefCell::new(String::new()));
//! let sink = applied.clone();
//! marshal.init(&el, "layout", move |v| *sink.borrow_mut() = v.into(), || {}, &[]);
//!
//! marshal.set_value(&el, "layout", "column", "xs");
//! marshal.set_value(&el, "layout", "row", "");
//! assert_eq!(*applied.borrow(), "row");
//!
//! env.activate("xs");
//! assert_eq!(*applied.borrow(), "column");
//!
//! env.deactivate("xs");
//! assert_eq!(*applied.borrow(), "row");
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod feature;
mod marshaller;
mod style;
mod value;

pub use feature::{FeatureRegistry, StyleFeature};
pub use marshaller::{ClearFn, MediaMarshaller, UpdateFn, ValueChange};
pub use style::ResponsiveStyle;
pub use value::ResponsiveValue;
