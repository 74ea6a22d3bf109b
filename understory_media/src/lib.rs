// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Media: media query matching and breakpoint activation streams.
//!
//! This crate turns a host platform's media query primitive into ordered
//! change streams that responsive styling can react to.
//!
//! - [`MatchMedia`]: one engine per process. Registers each unique query with
//!   the platform once, caches its state and republishes changes on a shared
//!   stream that replays the latest change.
//! - [`PrintHook`]: makes the `print` query behave like a configured
//!   breakpoint while printing and restores the previous activations after.
//! - [`MediaObserver`]: a debounced, de-duplicated feed of complete
//!   active-breakpoint snapshots for outside consumers.
//! - [`Observable`], [`Subject`], [`Subscription`]: the small lazy stream
//!   toolkit the above are built on.
//!
//! The platform is abstracted behind [`MediaEnvironment`] and
//! [`MediaQueryList`]. [`ServerEnvironment`] is the non-interactive platform
//! (nothing but `all` ever matches) and [`MockMediaEnvironment`] lets tests
//! and headless hosts drive query states by hand.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::cell::RefCell;
//! use std::rc::Rc;
//! use understory_breakpoints::{BreakpointRegistry, LayoutConfig};
//! use understory_media::{MatchMedia, MockMediaEnvironment};
//!
//! let config = LayoutConfig::default();
//! let registry = Rc::new(BreakpointRegistry::from_config(&config));
//! let env = MockMediaEnvironment::with_registry(registry.clone());
//! let engine = MatchMedia::new(Rc::new(env.clone()), &config);
//!
//! let xs = registry.find_by_alias("xs").unwrap().media_query.clone();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//! let _sub = engine
//!     .observe(&[xs.clone()], true)
//!     .subscribe(move |change| sink.borrow_mut().push(change.matches));
//!
//! env.activate("xs");
//! env.activate("md");
//! assert_eq!(*seen.borrow(), [true, false]);
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through `tracing`: query registration and print transitions
//! at `debug`, a missing server module at `warn`, and style injection failures
//! at `error`. No subscriber is installed.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod change;
mod environment;
mod match_media;
mod mock;
mod observer;
mod print_hook;
mod scheduler;
mod stream;

pub use change::{ALL, MediaChange, merge_alias};
pub use environment::{
    MediaEnvironment, MediaListener, MediaQueryList, ServerEnvironment, StubMediaQueryList,
    StyleInjectionError,
};
pub use match_media::{MatchMedia, query_test_rule};
pub use mock::MockMediaEnvironment;
pub use observer::MediaObserver;
pub use print_hook::{HookTarget, PrintHook};
pub use scheduler::{Scheduler, Task, TaskQueue};
pub use stream::{Observable, Observer, Subject, Subscription};
