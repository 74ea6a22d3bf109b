// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Breakpoint`] record and priority ordering helpers.

use alloc::string::String;
use core::cmp::Ordering;

/// Alias of the implicit, always-active default breakpoint.
pub const DEFAULT_ALIAS: &str = "";

/// The literal `print` media query.
pub const PRINT: &str = "print";

/// A named viewport condition with a resolution priority.
///
/// Higher priorities win during resolution. Overlapping breakpoints (`lt-*`,
/// `gt-*`) may be active at the same time as the exclusive ones (`xs`, `md`,
/// ...), and are typically given priorities that put them just above or below
/// the exclusive breakpoint they overlap.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Breakpoint {
    /// Short human-facing name, e.g. `xs` or `gt-md`.
    pub alias: String,
    /// The media query string watched for this breakpoint.
    pub media_query: String,
    /// Resolution priority; higher wins.
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: i32,
    /// Whether this breakpoint overlaps other breakpoints.
    #[cfg_attr(feature = "serde", serde(default))]
    pub overlapping: bool,
    /// Input-name suffix for this breakpoint (`LtMd` for `lt-md`).
    ///
    /// Left empty on construction; [`validate_suffixes`](crate::validate_suffixes)
    /// derives it from the alias.
    #[cfg_attr(feature = "serde", serde(default))]
    pub suffix: String,
}

impl Breakpoint {
    /// Creates a non-overlapping breakpoint with an empty suffix.
    #[must_use]
    pub fn new(alias: impl Into<String>, media_query: impl Into<String>, priority: i32) -> Self {
        Self {
            alias: alias.into(),
            media_query: media_query.into(),
            priority,
            overlapping: false,
            suffix: String::new(),
        }
    }

    /// Sets whether this breakpoint overlaps others.
    #[must_use]
    pub fn with_overlapping(mut self, overlapping: bool) -> Self {
        self.overlapping = overlapping;
        self
    }

    /// Sets an explicit suffix.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Returns `true` if this is the `print` breakpoint.
    #[must_use]
    #[inline]
    pub fn is_print(&self) -> bool {
        self.media_query == PRINT
    }
}

/// Orders breakpoints from highest to lowest priority.
#[must_use]
pub fn sort_descending_priority(a: &Breakpoint, b: &Breakpoint) -> Ordering {
    b.priority.cmp(&a.priority)
}

/// Orders breakpoints from lowest to highest priority.
#[must_use]
pub fn sort_ascending_priority(a: &Breakpoint, b: &Breakpoint) -> Ordering {
    a.priority.cmp(&b.priority)
}

/// Converts an alias into its suffix form.
///
/// Parts separated by `.`, `-` or `_` are capitalized and joined:
/// `lt-md` becomes `LtMd`, `handset.landscape` becomes `HandsetLandscape`.
#[must_use]
pub fn camel_case(alias: &str) -> String {
    let mut out = String::with_capacity(alias.len());
    for part in alias.split(['.', '-', '_']) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn camel_case_splits_on_delimiters() {
        assert_eq!(camel_case("xs"), "Xs");
        assert_eq!(camel_case("lt-md"), "LtMd");
        assert_eq!(camel_case("handset.landscape"), "HandsetLandscape");
        assert_eq!(camel_case("my_custom-bp"), "MyCustomBp");
        assert_eq!(camel_case(""), "");
    }

    #[test]
    fn priority_sorts() {
        let mut list = vec![
            Breakpoint::new("a", "a", 1),
            Breakpoint::new("b", "b", 3),
            Breakpoint::new("c", "c", -2),
        ];
        list.sort_by(sort_descending_priority);
        let aliases: Vec<_> = list.iter().map(|bp| bp.alias.as_str()).collect();
        assert_eq!(aliases, ["b", "a", "c"]);

        list.sort_by(sort_ascending_priority);
        let aliases: Vec<_> = list.iter().map(|bp| bp.alias.as_str()).collect();
        assert_eq!(aliases, ["c", "a", "b"]);
    }

    #[test]
    fn builder_methods() {
        let bp = Breakpoint::new("gt-xs", "screen and (min-width: 600px)", -950)
            .with_overlapping(true)
            .with_suffix("GtXs");
        assert!(bp.overlapping);
        assert_eq!(bp.suffix, "GtXs");
        assert!(!bp.is_print());
        assert!(Breakpoint::new("print", PRINT, 1000).is_print());
    }
}
