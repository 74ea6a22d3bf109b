// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The platform seam: media query lists and style injection.

use alloc::rc::Rc;
use alloc::string::String;

use crate::change::ALL;

/// A native change listener; receives the new `matches` state.
pub type MediaListener = Rc<dyn Fn(bool)>;

/// Failure to inject the media query test rule.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StyleInjectionError {
    /// The platform has no stylesheet to inject into.
    #[error("style injection is not available on this platform")]
    Unavailable,
    /// The platform refused the generated rule.
    #[error("platform rejected media query rule `{0}`")]
    Rejected(String),
}

/// A platform handle for one media query.
pub trait MediaQueryList {
    /// The query this list evaluates.
    fn media(&self) -> &str;

    /// Whether the query matches right now.
    fn matches(&self) -> bool;

    /// Attaches a change listener.
    fn add_listener(&self, listener: MediaListener);

    /// Detaches a listener previously passed to
    /// [`add_listener`](Self::add_listener), compared by pointer.
    fn remove_listener(&self, listener: &MediaListener);
}

/// The host platform's media query primitive.
pub trait MediaEnvironment {
    /// Whether native listeners fire on this platform.
    ///
    /// Platforms that return `false` are treated as non-interactive (server)
    /// targets and every query is backed by a [`StubMediaQueryList`].
    fn supports_listeners(&self) -> bool;

    /// Evaluates `query`.
    fn match_media(&self, query: &str) -> Rc<dyn MediaQueryList>;

    /// Injects a throwaway stylesheet rule referencing media queries.
    ///
    /// Some engines only fire query listeners when a selector references the
    /// exact query.
    fn inject_query_styles(&self, css: &str) -> Result<(), StyleInjectionError> {
        let _ = css;
        Ok(())
    }
}

/// A deterministic query list for non-interactive platforms.
///
/// Matches only the universal query (`all` or empty); listeners are ignored.
#[derive(Clone, Debug)]
pub struct StubMediaQueryList {
    media: String,
    matches: bool,
}

impl StubMediaQueryList {
    /// Creates a stub for `query`.
    #[must_use]
    pub fn new(query: &str) -> Self {
        Self {
            media: query.into(),
            matches: query.is_empty() || query == ALL,
        }
    }
}

impl MediaQueryList for StubMediaQueryList {
    fn media(&self) -> &str {
        &self.media
    }

    fn matches(&self) -> bool {
        self.matches
    }

    fn add_listener(&self, _listener: MediaListener) {}

    fn remove_listener(&self, _listener: &MediaListener) {}
}

/// The built-in non-interactive platform.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServerEnvironment;

impl MediaEnvironment for ServerEnvironment {
    fn supports_listeners(&self) -> bool {
        false
    }

    fn match_media(&self, query: &str) -> Rc<dyn MediaQueryList> {
        Rc::new(StubMediaQueryList::new(query))
    }

    fn inject_query_styles(&self, _css: &str) -> Result<(), StyleInjectionError> {
        Err(StyleInjectionError::Unavailable)
    }
}
