// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Startup configuration for breakpoints and print handling.

use alloc::string::String;
use alloc::vec::Vec;

use crate::breakpoint::Breakpoint;

/// Process-wide layout options, supplied once at startup.
///
/// The registry, the media engine and the print hook all read from the same
/// config; it is treated as immutable input after construction.
///
/// With the `serde` feature the struct deserializes from camelCase keys and
/// every field is optional:
///
/// ```json
/// { "addOrientationBps": true, "printWithBreakpoints": ["md"] }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct LayoutConfig {
    /// Include the `handset`/`tablet`/`web` orientation breakpoints.
    pub add_orientation_bps: bool,
    /// Leave out the built-in size breakpoints (`xs`, `lt-md`, ...).
    pub disable_default_bps: bool,
    /// Whether the server-rendering support module has been loaded.
    pub server_loaded: bool,
    /// Aliases whose styling should be used while printing.
    pub print_with_breakpoints: Vec<String>,
    /// Custom breakpoints, merged into the built-in tables by alias.
    pub breakpoints: Vec<Breakpoint>,
}

impl LayoutConfig {
    /// Creates a config with every option at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the orientation breakpoints.
    #[must_use]
    pub fn with_orientation_breakpoints(mut self, enabled: bool) -> Self {
        self.add_orientation_bps = enabled;
        self
    }

    /// Enables or disables the built-in size breakpoints.
    #[must_use]
    pub fn with_default_breakpoints_disabled(mut self, disabled: bool) -> Self {
        self.disable_default_bps = disabled;
        self
    }

    /// Marks the server-rendering support module as loaded.
    #[must_use]
    pub fn with_server_loaded(mut self, loaded: bool) -> Self {
        self.server_loaded = loaded;
        self
    }

    /// Adds an alias to use while printing.
    #[must_use]
    pub fn with_print_breakpoint(mut self, alias: impl Into<String>) -> Self {
        self.print_with_breakpoints.push(alias.into());
        self
    }

    /// Adds a custom breakpoint.
    #[must_use]
    pub fn with_breakpoint(mut self, breakpoint: Breakpoint) -> Self {
        self.breakpoints.push(breakpoint);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_accumulate() {
        let config = LayoutConfig::new()
            .with_orientation_breakpoints(true)
            .with_print_breakpoint("md")
            .with_print_breakpoint("lt-lg")
            .with_breakpoint(Breakpoint::new("xxl", "(min-width: 5000px)", 10));
        assert!(config.add_orientation_bps);
        assert!(!config.disable_default_bps);
        assert_eq!(config.print_with_breakpoints, ["md", "lt-lg"]);
        assert_eq!(config.breakpoints.len(), 1);
    }
}
