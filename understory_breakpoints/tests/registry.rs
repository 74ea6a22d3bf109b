// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for building a `BreakpointRegistry` from a `LayoutConfig`.
//!
//! These cover how the built-in tables, orientation breakpoints and custom
//! breakpoints combine, and the resulting priority order.

use understory_breakpoints::{
    Breakpoint, BreakpointRegistry, LayoutConfig, print_breakpoint, sort_descending_priority,
};

#[test]
fn default_config_has_size_breakpoints_only() {
    let registry = BreakpointRegistry::from_config(&LayoutConfig::default());
    assert_eq!(registry.len(), 13);
    assert!(registry.find_by_alias("handset").is_none());

    let aliases: Vec<_> = registry.aliases().collect();
    assert_eq!(
        &aliases[..5],
        ["xs", "lt-sm", "sm", "lt-md", "md"],
        "descending priority interleaves lt-* with exclusive breakpoints"
    );
    assert_eq!(aliases.last(), Some(&"gt-xs"));
}

#[test]
fn suffixes_are_derived_from_aliases() {
    let registry =
        BreakpointRegistry::from_config(&LayoutConfig::new().with_orientation_breakpoints(true));
    assert_eq!(registry.find_by_alias("lt-sm").unwrap().suffix, "LtSm");
    assert_eq!(
        registry.find_by_alias("handset.landscape").unwrap().suffix,
        "HandsetLandscape"
    );
    assert!(registry.suffixes().all(|suffix| !suffix.is_empty()));
}

#[test]
fn orientation_breakpoints_lead_by_priority() {
    let registry =
        BreakpointRegistry::from_config(&LayoutConfig::new().with_orientation_breakpoints(true));
    assert_eq!(registry.len(), 22);
    assert!(registry.items()[0].alias.starts_with("web"));
    assert_eq!(registry.items()[0].priority, 2200);
    assert_eq!(registry.overlappings().count(), 11);
}

#[test]
fn disabling_defaults_leaves_custom_only() {
    let config = LayoutConfig::new()
        .with_default_breakpoints_disabled(true)
        .with_breakpoint(Breakpoint::new("xs", "(max-width: 599px)", 100));
    let registry = BreakpointRegistry::from_config(&config);
    assert_eq!(registry.len(), 1);
    let xs = registry.find_by_query("(max-width: 599px)").unwrap();
    assert_eq!(xs.alias, "xs");
    assert_eq!(xs.suffix, "Xs");
}

#[test]
fn custom_breakpoint_overrides_builtin() {
    let config =
        LayoutConfig::new().with_breakpoint(Breakpoint::new("md", "(min-width: 1000px)", 5000));
    let registry = BreakpointRegistry::from_config(&config);
    assert_eq!(registry.len(), 13);
    assert_eq!(registry.items()[0].alias, "md");
    assert!(
        registry
            .find_by_query("screen and (min-width: 960px) and (max-width: 1279.98px)")
            .is_none()
    );
}

#[test]
fn items_are_sorted_and_print_is_not_registered() {
    let registry = BreakpointRegistry::from_config(&LayoutConfig::default());
    let mut sorted = registry.items().to_vec();
    sorted.sort_by(sort_descending_priority);
    assert_eq!(sorted, registry.items());
    assert!(registry.find_by_query(&print_breakpoint().media_query).is_none());
}
