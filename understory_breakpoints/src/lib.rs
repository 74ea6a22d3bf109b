// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Breakpoints: named viewport conditions for responsive styling.
//!
//! A [`Breakpoint`] pairs a short alias (`xs`, `gt-md`, `handset.portrait`)
//! with a media query and a resolution priority. The [`BreakpointRegistry`]
//! holds the process-wide set, ordered by descending priority, and answers
//! lookups by alias or by media query.
//!
//! ## Building a registry
//!
//! Most hosts start from the built-in tables and layer their own breakpoints
//! on top through a [`LayoutConfig`]:
//!
//! ```rust
//! use understory_breakpoints::{Breakpoint, BreakpointRegistry, LayoutConfig};
//!
//! let config = LayoutConfig::default()
//!     .with_breakpoint(Breakpoint::new("xxl", "screen and (min-width: 5000px)", 500));
//! let registry = BreakpointRegistry::from_config(&config);
//!
//! let xs = registry.find_by_alias("xs").unwrap();
//! assert_eq!(xs.suffix, "Xs");
//! assert_eq!(
//!     registry.find_by_query("screen and (min-width: 5000px)").map(|bp| bp.alias.as_str()),
//!     Some("xxl"),
//! );
//!
//! // Items are ordered by descending priority.
//! let priorities: Vec<i32> = registry.items().iter().map(|bp| bp.priority).collect();
//! assert!(priorities.windows(2).all(|w| w[0] >= w[1]));
//! ```
//!
//! ## The default breakpoint
//!
//! Resolution always has an implicit, always-active, lowest-priority
//! breakpoint with an empty alias. It is never stored in the registry; values
//! registered for it use [`DEFAULT_ALIAS`].
//!
//! ## Features
//!
//! - `serde`: derives `Serialize`/`Deserialize` for [`Breakpoint`] and
//!   [`LayoutConfig`] (camelCase field names, missing fields defaulted).
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod breakpoint;
mod builtin;
mod config;
mod registry;

pub use breakpoint::{
    Breakpoint, DEFAULT_ALIAS, PRINT, camel_case, sort_ascending_priority,
    sort_descending_priority,
};
pub use builtin::{default_breakpoints, orientation_breakpoints, print_breakpoint};
pub use config::LayoutConfig;
pub use registry::{BreakpointRegistry, merge_by_alias, validate_suffixes};
