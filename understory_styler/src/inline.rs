// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reading and writing the `style` attribute as a declaration list.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::StyleError;

/// Declarations of a `style` attribute, in source order.
///
/// Setting an existing property keeps its position; empty values are left out
/// when formatting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Parses `name: value; …` text.
    ///
    /// Runs of `;` and surrounding whitespace are ignored. A declaration
    /// without `:` is rejected.
    ///
    /// ```rust
    /// use understory_styler::{InlineStyle, StyleError};
    ///
    /// let style = InlineStyle::parse("display: flex;; order:2").unwrap();
    /// assert_eq!(style.get("order"), Some("2"));
    /// assert_eq!(
    ///     InlineStyle::parse("display flex"),
    ///     Err(StyleError::InvalidDeclaration("display flex".into())),
    /// );
    /// ```
    pub fn parse(text: &str) -> Result<Self, StyleError> {
        let mut style = Self::default();
        for declaration in text.split(';').map(str::trim).filter(|d| !d.is_empty()) {
            let Some((name, value)) = declaration.split_once(':') else {
                return Err(StyleError::InvalidDeclaration(declaration.into()));
            };
            style.set(name.trim(), value.trim());
        }
        Ok(style)
    }

    /// The value of a property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets a property, keeping its position if already present.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.declarations.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value.into(),
            None => self.declarations.push((name.into(), value.into())),
        }
    }

    /// Formats as `name:value;` pairs, skipping empty values.
    #[must_use]
    pub fn to_attribute(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.declarations {
            if value.is_empty() {
                continue;
            }
            out.push_str(name);
            out.push(':');
            out.push_str(value);
            out.push(';');
        }
        out
    }
}

/// Converts a camelCase property name to kebab-case (`flexDirection` →
/// `flex-direction`). Names already in kebab-case are unchanged.
#[must_use]
pub fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            out.push('-');
        }
        prev_lower = c.is_ascii_lowercase();
        out.push(c.to_ascii_lowercase());
    }
    out
}
