// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

/// Errors from reading an element's `style` attribute.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    /// A declaration in the `style` attribute has no `:`.
    #[error("invalid CSS declaration `{0}`: expected `name: value`")]
    InvalidDeclaration(String),
}
