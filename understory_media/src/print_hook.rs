// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`PrintHook`]: makes the `print` media query behave like a breakpoint.
//!
//! While printing, the consumer's activated breakpoints are replaced by the
//! configured substitutes (for example `md`), highest priority first, so print
//! output is laid out with that breakpoint's values. When printing
//! ends, the previous activation set is restored.
//!
//! ```rust
//! use std::rc::Rc;
//! use understory_breakpoints::{BreakpointRegistry, LayoutConfig};
//! use understory_media::{MediaChange, PrintHook};
//!
//! let config = LayoutConfig::default().with_print_breakpoint("md");
//! let registry = Rc::new(BreakpointRegistry::from_config(&config));
//! let hook = PrintHook::new(registry, &config);
//!
//! let event = hook.update_event(&MediaChange::new(true, "print"));
//! assert_eq!(event.alias, "md");
//! assert!(hook.is_print_event(&MediaChange::new(true, "print")));
//! ```

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use understory_breakpoints::{
    Breakpoint, BreakpointRegistry, LayoutConfig, PRINT, print_breakpoint,
    sort_descending_priority,
};

use crate::change::{MediaChange, merge_alias};

/// The consumer whose activation set a [`PrintHook`] swaps while printing.
pub trait HookTarget {
    /// The currently activated breakpoints, highest priority first.
    fn activated_breakpoints(&self) -> Vec<Breakpoint>;

    /// Replaces the activated breakpoints.
    fn set_activated_breakpoints(&self, breakpoints: Vec<Breakpoint>);

    /// Re-resolves every tracked value.
    fn update_styles(&self);
}

#[derive(Debug, Default)]
struct PrintState {
    printing: bool,
    snapshot: Vec<Breakpoint>,
}

/// Print-mode interception over a [`MediaChange`] stream.
pub struct PrintHook {
    registry: Rc<BreakpointRegistry>,
    configured: Vec<Breakpoint>,
    substitutes: Vec<Breakpoint>,
    state: RefCell<PrintState>,
}

impl PrintHook {
    /// Creates a hook for `config.print_with_breakpoints`.
    ///
    /// Without configured aliases the registry's `print` breakpoint (or the
    /// built-in one) is used. Configured aliases that all fail to resolve turn
    /// the hook into a pass-through; this is logged once, here.
    #[must_use]
    pub fn new(registry: Rc<BreakpointRegistry>, config: &LayoutConfig) -> Self {
        let mut configured: Vec<Breakpoint> = config
            .print_with_breakpoints
            .iter()
            .filter_map(|alias| registry.find_by_alias(alias))
            .cloned()
            .collect();
        configured.sort_by(sort_descending_priority);

        let substitutes = if config.print_with_breakpoints.is_empty() {
            Vec::from([registry
                .find_by_alias(PRINT)
                .cloned()
                .unwrap_or_else(print_breakpoint)])
        } else {
            if configured.is_empty() {
                tracing::warn!(
                    aliases = ?config.print_with_breakpoints,
                    "no print breakpoint could be resolved; print events pass through unchanged"
                );
            }
            configured.clone()
        };

        Self {
            registry,
            configured,
            substitutes,
            state: RefCell::new(PrintState::default()),
        }
    }

    /// Appends the `print` query to `queries` unless already present.
    #[must_use]
    pub fn with_print_query(&self, queries: &[String]) -> Vec<String> {
        let mut out = queries.to_vec();
        if !out.iter().any(|q| q == PRINT) {
            out.push(PRINT.into());
        }
        out
    }

    /// Whether `change` concerns the `print` query.
    #[must_use]
    #[inline]
    pub fn is_print_event(&self, change: &MediaChange) -> bool {
        change.media_query == PRINT
    }

    /// Whether print mode is currently active.
    #[must_use]
    pub fn is_printing(&self) -> bool {
        self.state.borrow().printing
    }

    /// The configured print aliases that resolved, highest priority first.
    #[must_use]
    pub fn print_breakpoints(&self) -> &[Breakpoint] {
        &self.configured
    }

    /// Whether the hook lets every event through.
    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        self.substitutes.is_empty()
    }

    /// Annotates `change` with breakpoint metadata.
    ///
    /// Print events take the highest-priority substitute's alias, query,
    /// suffix and priority; other events take their own breakpoint's.
    #[must_use]
    pub fn update_event(&self, change: &MediaChange) -> MediaChange {
        let bp = if self.is_print_event(change) {
            self.substitutes.first()
        } else {
            self.registry.find_by_query(&change.media_query)
        };
        merge_alias(change, bp)
    }

    /// The activation set used while printing: the substitutes plus the
    /// registry's own `print` breakpoint, if it has one, highest priority
    /// first.
    #[must_use]
    pub fn print_activation(&self) -> Vec<Breakpoint> {
        let mut list = self.substitutes.clone();
        if let Some(bp) = self.registry.find_by_query(PRINT) {
            if !list.iter().any(|b| b.media_query == bp.media_query) {
                list.push(bp.clone());
            }
        }
        list.sort_by(sort_descending_priority);
        list
    }

    /// Builds a stream predicate that swaps `target`'s activation set on
    /// print entry/exit.
    ///
    /// Print transitions update the target and call
    /// [`HookTarget::update_styles`] themselves, so the predicate returns
    /// `false` for them. While printing, other events are held back and
    /// folded into the saved activation set instead. Every other event
    /// returns `true`.
    pub fn intercept_events<T: HookTarget + 'static>(
        self: &Rc<Self>,
        target: T,
    ) -> impl Fn(&MediaChange) -> bool + 'static {
        let hook = self.clone();
        move |change: &MediaChange| hook.intercept(change, &target)
    }

    fn intercept(&self, change: &MediaChange, target: &dyn HookTarget) -> bool {
        if self.is_pass_through() {
            return true;
        }
        if self.is_print_event(change) {
            if change.matches {
                self.start_printing(target);
            } else {
                self.stop_printing(target);
            }
            return false;
        }
        let mut state = self.state.borrow_mut();
        if !state.printing {
            return true;
        }
        let snapshot = &mut state.snapshot;
        snapshot.retain(|bp| bp.media_query != change.media_query);
        if change.matches {
            if let Some(bp) = self.registry.find_by_query(&change.media_query) {
                snapshot.push(bp.clone());
                snapshot.sort_by(sort_descending_priority);
            }
        }
        false
    }

    fn start_printing(&self, target: &dyn HookTarget) {
        {
            let mut state = self.state.borrow_mut();
            if state.printing {
                return;
            }
            state.printing = true;
            state.snapshot = target.activated_breakpoints();
        }
        tracing::debug!("entering print mode");
        target.set_activated_breakpoints(self.print_activation());
        target.update_styles();
    }

    fn stop_printing(&self, target: &dyn HookTarget) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            if !state.printing {
                return;
            }
            state.printing = false;
            core::mem::take(&mut state.snapshot)
        };
        tracing::debug!("leaving print mode");
        target.set_activated_breakpoints(snapshot);
        target.update_styles();
    }
}

impl fmt::Debug for PrintHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintHook")
            .field("configured", &self.configured)
            .field("substitutes", &self.substitutes)
            .field("state", &self.state.borrow())
            .finish_non_exhaustive()
    }
}
