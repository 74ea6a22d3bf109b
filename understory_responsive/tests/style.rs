// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests: breakpoint changes flowing through `ResponsiveStyle`
//! into element styles on browser and server targets.

use core::any::Any;
use std::rc::Rc;

use understory_breakpoints::{BreakpointRegistry, LayoutConfig};
use understory_media::{MatchMedia, MockMediaEnvironment, PrintHook, ServerEnvironment};
use understory_responsive::{FeatureRegistry, MediaMarshaller, ResponsiveStyle, StyleFeature};
use understory_styler::{
    StyleElement, StyleMap, StyleUtils, StylesheetMap, VirtualElement, VirtualStylesheet,
};

fn features() -> FeatureRegistry {
    let mut features = FeatureRegistry::new();
    features.register(StyleFeature::new(
        "layout",
        |input: &str, _: Option<&dyn Any>| {
            let direction = input.split_whitespace().next().unwrap_or("row");
            StyleMap::new()
                .with("-webkit-flex-direction", direction)
                .with("flex-direction", direction)
                .with_values("display", ["flex", "-webkit-flex"])
                .with("box-sizing", "border-box")
        },
    ));
    features.register(StyleFeature::new(
        "hide",
        |input: &str, _: Option<&dyn Any>| {
            let hidden = input.is_empty() || input == "true";
            StyleMap::new().with("display", if hidden { "none" } else { "" })
        },
    ));
    features
}

fn marshal_with(
    config: &LayoutConfig,
) -> (MockMediaEnvironment, MediaMarshaller<VirtualElement>) {
    let registry = Rc::new(BreakpointRegistry::from_config(config));
    let env = MockMediaEnvironment::with_registry(registry.clone());
    let engine = MatchMedia::new(Rc::new(env.clone()), config);
    let hook = Rc::new(PrintHook::new(registry.clone(), config));
    (env, MediaMarshaller::new(engine, registry, hook))
}

#[test]
fn layout_follows_breakpoints_and_ends_on_standard_values() {
    let (env, marshal) = marshal_with(&LayoutConfig::default());
    let features = features();
    let el = Rc::new(VirtualElement::new());
    let layout = ResponsiveStyle::new(
        el.clone(),
        features.get("layout").unwrap(),
        marshal,
        StyleUtils::browser(),
    );
    layout.init(&[]);
    layout.set_input("layout", "row");
    layout.set_input("layout.lt-md", "column");

    assert_eq!(el.inline_style("flex-direction").as_deref(), Some("row"));
    assert_eq!(el.inline_style("display").as_deref(), Some("flex"));

    env.activate("lt-md");
    assert_eq!(el.inline_style("flex-direction").as_deref(), Some("column"));
    assert_eq!(
        el.inline_style("-webkit-flex-direction").as_deref(),
        Some("column")
    );

    env.deactivate_all();
    assert_eq!(el.inline_style("flex-direction").as_deref(), Some("row"));
}

#[test]
fn two_features_share_one_element() {
    let (env, marshal) = marshal_with(&LayoutConfig::default());
    let features = features();
    let el = Rc::new(VirtualElement::new());
    let utils = StyleUtils::browser();
    let hide = ResponsiveStyle::new(
        el.clone(),
        features.get("hide").unwrap(),
        marshal.clone(),
        utils.clone(),
    );
    let layout = ResponsiveStyle::new(el.clone(), features.get("layout").unwrap(), marshal, utils);
    hide.init(&[]);
    layout.init(&[]);

    layout.set_input("layout", "row");
    hide.set_input("hide.xs", "true");
    assert_eq!(el.inline_style("display").as_deref(), Some("flex"));

    env.activate("xs");
    assert_eq!(el.inline_style("display").as_deref(), Some("none"));

    env.activate("md");
    assert_eq!(el.inline_style("display"), None, "hide cleared its own property");
    assert_eq!(el.inline_style("flex-direction").as_deref(), Some("row"));

    hide.detach();
    layout.detach();
    assert!(layout.activated_value().is_none());
}

#[test]
fn server_rendering_records_styles_in_the_stylesheet() {
    let config = LayoutConfig::default().with_server_loaded(true);
    let registry = Rc::new(BreakpointRegistry::from_config(&config));
    let engine = MatchMedia::new(Rc::new(ServerEnvironment), &config);
    let hook = Rc::new(PrintHook::new(registry.clone(), &config));
    let marshal = MediaMarshaller::new(engine, registry, hook);

    let sheet: Rc<StylesheetMap<VirtualElement>> = Rc::new(StylesheetMap::new());
    let utils = StyleUtils::server_with_stylesheet(sheet.clone());
    let features = features();
    let el = Rc::new(VirtualElement::new());
    let layout = ResponsiveStyle::new(el.clone(), features.get("layout").unwrap(), marshal, utils);
    layout.init(&[]);
    layout.set_input("layout", "column wrap");
    layout.set_input("layout.md", "row");

    assert!(el.inline_styles().is_empty());
    assert_eq!(sheet.get_style_for_element(&el, "flex-direction"), "column");
    assert_eq!(sheet.get_style_for_element(&el, "display"), "flex");
}

#[test]
fn server_without_stylesheet_reports_malformed_attributes() {
    let (_env, marshal) = marshal_with(&LayoutConfig::default());
    let features = features();
    let el = Rc::new(VirtualElement::new());
    el.set_attribute("style", "color red");
    let hide = ResponsiveStyle::new(
        el.clone(),
        features.get("hide").unwrap(),
        marshal,
        StyleUtils::server(),
    );
    assert!(hide.apply("true").is_err());
    assert_eq!(hide.current_value(), None);

    el.set_attribute("style", "color: red");
    hide.apply("true").unwrap();
    assert_eq!(
        el.attribute("style").as_deref(),
        Some("color:red;display:none;")
    );
}

#[test]
fn printing_applies_the_print_breakpoint_values() {
    let config = LayoutConfig::default().with_print_breakpoint("lg");
    let (env, marshal) = marshal_with(&config);
    let features = features();
    let el = Rc::new(VirtualElement::new());
    let layout = ResponsiveStyle::new(
        el.clone(),
        features.get("layout").unwrap(),
        marshal,
        StyleUtils::browser(),
    );
    layout.init(&[]);
    layout.set_input("layout", "row");
    layout.set_input("layout.lg", "column");

    env.activate("sm");
    env.set_matches("print", true);
    assert_eq!(el.inline_style("flex-direction").as_deref(), Some("column"));
    env.set_matches("print", false);
    assert_eq!(el.inline_style("flex-direction").as_deref(), Some("row"));
}
