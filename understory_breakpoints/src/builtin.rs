// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in breakpoint tables.

use alloc::vec::Vec;

use crate::breakpoint::{Breakpoint, PRINT};

/// `(alias, media query, priority, overlapping)`.
type Row = (&'static str, &'static str, i32, bool);

const DEFAULT_TABLE: &[Row] = &[
    ("xs", "screen and (min-width: 0px) and (max-width: 599.98px)", 1000, false),
    ("sm", "screen and (min-width: 600px) and (max-width: 959.98px)", 900, false),
    ("md", "screen and (min-width: 960px) and (max-width: 1279.98px)", 800, false),
    ("lg", "screen and (min-width: 1280px) and (max-width: 1919.98px)", 700, false),
    ("xl", "screen and (min-width: 1920px) and (max-width: 4999.98px)", 600, false),
    ("lt-sm", "screen and (max-width: 599.98px)", 950, true),
    ("lt-md", "screen and (max-width: 959.98px)", 850, true),
    ("lt-lg", "screen and (max-width: 1279.98px)", 750, true),
    ("lt-xl", "screen and (max-width: 1919.98px)", 650, true),
    ("gt-xs", "screen and (min-width: 600px)", -950, true),
    ("gt-sm", "screen and (min-width: 960px)", -850, true),
    ("gt-md", "screen and (min-width: 1280px)", -750, true),
    ("gt-lg", "screen and (min-width: 1920px)", -650, true),
];

const HANDSET_PORTRAIT: &str = "(orientation: portrait) and (max-width: 599.98px)";
const HANDSET_LANDSCAPE: &str = "(orientation: landscape) and (max-width: 959.98px)";
const TABLET_PORTRAIT: &str =
    "(orientation: portrait) and (min-width: 600px) and (max-width: 839.98px)";
const TABLET_LANDSCAPE: &str =
    "(orientation: landscape) and (min-width: 960px) and (max-width: 1279.98px)";
const WEB_PORTRAIT: &str = "(orientation: portrait) and (min-width: 840px)";
const WEB_LANDSCAPE: &str = "(orientation: landscape) and (min-width: 1280px)";

const ORIENTATION_TABLE: &[Row] = &[
    (
        "handset",
        "(orientation: portrait) and (max-width: 599.98px), (orientation: landscape) and (max-width: 959.98px)",
        2000,
        false,
    ),
    ("handset.landscape", HANDSET_LANDSCAPE, 2000, false),
    ("handset.portrait", HANDSET_PORTRAIT, 2000, false),
    (
        "tablet",
        "(orientation: portrait) and (min-width: 600px) and (max-width: 839.98px), (orientation: landscape) and (min-width: 960px) and (max-width: 1279.98px)",
        2100,
        false,
    ),
    ("tablet.landscape", TABLET_LANDSCAPE, 2100, false),
    ("tablet.portrait", TABLET_PORTRAIT, 2100, false),
    (
        "web",
        "(orientation: portrait) and (min-width: 840px), (orientation: landscape) and (min-width: 1280px)",
        2200,
        true,
    ),
    ("web.landscape", WEB_LANDSCAPE, 2200, true),
    ("web.portrait", WEB_PORTRAIT, 2200, true),
];

fn build(table: &[Row]) -> Vec<Breakpoint> {
    table
        .iter()
        .map(|&(alias, query, priority, overlapping)| {
            Breakpoint::new(alias, query, priority).with_overlapping(overlapping)
        })
        .collect()
}

/// The standard size breakpoints: `xs`..`xl`, `lt-*` and `gt-*`.
///
/// Suffixes are left empty; the registry derives them.
#[must_use]
pub fn default_breakpoints() -> Vec<Breakpoint> {
    build(DEFAULT_TABLE)
}

/// Device/orientation breakpoints: `handset`, `tablet`, `web` and their
/// `.landscape`/`.portrait` variants.
#[must_use]
pub fn orientation_breakpoints() -> Vec<Breakpoint> {
    build(ORIENTATION_TABLE)
}

/// The breakpoint activated while printing.
#[must_use]
pub fn print_breakpoint() -> Breakpoint {
    Breakpoint::new(PRINT, PRINT, 1000).with_suffix("Print")
}
