// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`MediaObserver`]: a debounced feed of the active breakpoint set.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use understory_breakpoints::BreakpointRegistry;

use crate::change::{MediaChange, merge_alias};
use crate::match_media::MatchMedia;
use crate::print_hook::PrintHook;
use crate::scheduler::Scheduler;
use crate::stream::{Observable, Observer, Subscription};

struct Inner {
    match_media: MatchMedia,
    registry: Rc<BreakpointRegistry>,
    hook: Rc<PrintHook>,
    scheduler: Rc<dyn Scheduler>,
    filter_overlaps: Cell<bool>,
    destroyed: Cell<bool>,
}

impl Inner {
    fn watched_queries(&self) -> Vec<String> {
        let queries: Vec<String> = self.registry.media_queries().map(String::from).collect();
        self.hook.with_print_query(&queries)
    }

    fn find_all_activations(&self) -> Vec<MediaChange> {
        let mut changes: Vec<MediaChange> = self
            .watched_queries()
            .into_iter()
            .filter(|query| self.match_media.is_active(query))
            .map(|query| {
                let change = MediaChange::new(true, query);
                if self.hook.is_print_event(&change) {
                    self.hook.update_event(&change)
                } else {
                    merge_alias(&change, self.registry.find_by_query(&change.media_query))
                }
            })
            .collect();
        changes.sort_by(|a, b| b.priority.cmp(&a.priority));
        if self.filter_overlaps.get() {
            changes.retain(|change| {
                !self
                    .registry
                    .find_by_query(&change.media_query)
                    .is_some_and(|bp| bp.overlapping)
            });
        }
        changes
    }
}

struct Pipeline {
    pending: Cell<bool>,
    closed: Cell<bool>,
    last: RefCell<Option<Vec<String>>>,
}

/// The public, read-only view of which breakpoints are active.
///
/// Subscribers to [`as_observable`](Self::as_observable) receive complete
/// snapshots (every active breakpoint, highest priority first, annotated with
/// alias and suffix) rather than individual transitions. Snapshots are
/// produced only after activations, debounced through the [`Scheduler`] so a
/// burst of transitions yields one snapshot, and a snapshot whose media query
/// set equals the previous one is not re-sent.
///
/// # Example
///
/// ```rust
/// use core::cell::RefCell;
/// use std::rc::Rc;
/// use understory_breakpoints::{BreakpointRegistry, LayoutConfig};
/// use understory_media::{
///     MatchMedia, MediaObserver, MockMediaEnvironment, PrintHook, TaskQueue,
/// };
///
/// let config = LayoutConfig::default();
/// let registry = Rc::new(BreakpointRegistry::from_config(&config));
/// let env = MockMediaEnvironment::with_registry(registry.clone());
/// let engine = MatchMedia::new(Rc::new(env.clone()), &config);
/// let hook = Rc::new(PrintHook::new(registry.clone(), &config));
/// let queue = TaskQueue::new();
/// let observer = MediaObserver::new(engine, registry, hook, Rc::new(queue.clone()));
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = seen.clone();
/// let _sub = observer.as_observable().subscribe(move |changes| {
///     sink.borrow_mut().push(changes.iter().map(|c| c.alias.clone()).collect::<Vec<_>>());
/// });
///
/// env.activate("md");
/// queue.run_pending();
/// assert_eq!(*seen.borrow(), [vec![String::from("md")]]);
/// ```
#[derive(Clone)]
pub struct MediaObserver {
    inner: Rc<Inner>,
}

impl MediaObserver {
    /// Creates an observer over `match_media`.
    #[must_use]
    pub fn new(
        match_media: MatchMedia,
        registry: Rc<BreakpointRegistry>,
        hook: Rc<PrintHook>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                match_media,
                registry,
                hook,
                scheduler,
                filter_overlaps: Cell::new(false),
                destroyed: Cell::new(false),
            }),
        }
    }

    /// Whether overlapping breakpoints are left out of snapshots.
    #[must_use]
    pub fn filter_overlaps(&self) -> bool {
        self.inner.filter_overlaps.get()
    }

    /// Leaves overlapping breakpoints (`lt-*`, `gt-*`) out of snapshots.
    pub fn set_filter_overlaps(&self, filter: bool) {
        self.inner.filter_overlaps.set(filter);
    }

    /// A lazy stream of active-breakpoint snapshots.
    ///
    /// Each subscriber gets an independent pipeline with its own debounce and
    /// de-duplication state.
    #[must_use]
    pub fn as_observable(&self) -> Observable<Vec<MediaChange>> {
        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        Observable::new(move |observer: Observer<Vec<MediaChange>>| {
            let Some(inner) = weak.upgrade() else {
                return Subscription::empty();
            };
            let pipeline = Rc::new(Pipeline {
                pending: Cell::new(false),
                closed: Cell::new(false),
                last: RefCell::new(None),
            });
            let engine = weak.clone();
            let state = pipeline.clone();
            let mut sub = inner
                .match_media
                .observe(&inner.watched_queries(), false)
                .filter(|change| change.matches)
                .subscribe(move |_| {
                    if state.pending.replace(true) {
                        return;
                    }
                    let Some(inner) = engine.upgrade() else {
                        return;
                    };
                    let engine = engine.clone();
                    let state = state.clone();
                    let observer = observer.clone();
                    inner.scheduler.schedule(Box::new(move || {
                        state.pending.set(false);
                        if state.closed.get() {
                            return;
                        }
                        let Some(inner) = engine.upgrade() else {
                            return;
                        };
                        if inner.destroyed.get() {
                            return;
                        }
                        emit_snapshot(&inner, &state, &observer);
                    }));
                });
            sub.add(move || pipeline.closed.set(true));
            sub
        })
    }

    /// The current active-breakpoint snapshot, computed synchronously.
    #[must_use]
    pub fn activations(&self) -> Vec<MediaChange> {
        self.inner.find_all_activations()
    }

    /// Whether any of the comma-separated aliases or media queries in
    /// `value` is active.
    #[must_use]
    pub fn is_active(&self, value: &str) -> bool {
        value
            .split(',')
            .map(str::trim)
            .filter(|alias| !alias.is_empty())
            .any(|alias| {
                let query = self
                    .inner
                    .registry
                    .find_by_alias(alias)
                    .map_or(alias, |bp| bp.media_query.as_str());
                self.inner.match_media.is_active(query)
            })
    }

    /// Stops every pipeline from emitting further snapshots.
    pub fn destroy(&self) {
        self.inner.destroyed.set(true);
    }
}

fn emit_snapshot(inner: &Inner, state: &Pipeline, observer: &Observer<Vec<MediaChange>>) {
    let changes = inner.find_all_activations();
    let queries: Vec<String> = changes
        .iter()
        .filter(|change| !change.media_query.is_empty())
        .map(|change| change.media_query.clone())
        .collect();
    if queries.is_empty() {
        return;
    }
    {
        let mut last = state.last.borrow_mut();
        if last.as_ref() == Some(&queries) {
            return;
        }
        *last = Some(queries);
    }
    tracing::trace!(count = changes.len(), "media observer snapshot");
    observer(&changes);
}

impl fmt::Debug for MediaObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaObserver")
            .field("filter_overlaps", &self.inner.filter_overlaps.get())
            .field("destroyed", &self.inner.destroyed.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockMediaEnvironment;
    use crate::scheduler::TaskQueue;
    use understory_breakpoints::LayoutConfig;

    struct Fixture {
        env: MockMediaEnvironment,
        queue: TaskQueue,
        observer: MediaObserver,
        seen: Rc<RefCell<Vec<Vec<String>>>>,
    }

    fn fixture(config: &LayoutConfig) -> Fixture {
        let registry = Rc::new(BreakpointRegistry::from_config(config));
        let env = MockMediaEnvironment::with_registry(registry.clone());
        let engine = MatchMedia::new(Rc::new(env.clone()), config);
        let hook = Rc::new(PrintHook::new(registry.clone(), config));
        let queue = TaskQueue::new();
        let observer = MediaObserver::new(engine, registry, hook, Rc::new(queue.clone()));
        Fixture {
            env,
            queue,
            observer,
            seen: Rc::new(RefCell::new(Vec::new())),
        }
    }

    impl Fixture {
        fn subscribe(&self) -> Subscription {
            let sink = self.seen.clone();
            self.observer.as_observable().subscribe(move |changes| {
                sink.borrow_mut()
                    .push(changes.iter().map(|c| c.alias.clone()).collect());
            })
        }
    }

    #[test]
    fn bursts_are_debounced_into_one_sorted_snapshot() {
        let fx = fixture(&LayoutConfig::default());
        fx.env.set_use_overlaps(true);
        let _sub = fx.subscribe();
        fx.env.activate("sm");
        assert!(fx.seen.borrow().is_empty());
        assert_eq!(fx.queue.run_pending(), 1);
        assert_eq!(
            *fx.seen.borrow(),
            [Vec::from([
                String::from("sm"),
                String::from("lt-md"),
                String::from("lt-lg"),
                String::from("lt-xl"),
                String::from("gt-xs"),
            ])]
        );
    }

    #[test]
    fn overlaps_can_be_filtered() {
        let fx = fixture(&LayoutConfig::default());
        fx.env.set_use_overlaps(true);
        fx.observer.set_filter_overlaps(true);
        let _sub = fx.subscribe();
        fx.env.activate("lg");
        fx.queue.run_pending();
        assert_eq!(*fx.seen.borrow(), [Vec::from([String::from("lg")])]);
    }

    #[test]
    fn identical_snapshots_are_suppressed() {
        let fx = fixture(&LayoutConfig::default());
        let _sub = fx.subscribe();
        fx.env.activate("md");
        fx.queue.run_pending();
        fx.env.deactivate("md");
        fx.env.activate("md");
        fx.queue.run_pending();
        assert_eq!(fx.seen.borrow().len(), 1);
    }

    #[test]
    fn deactivation_alone_emits_nothing() {
        let fx = fixture(&LayoutConfig::default());
        fx.env.activate("md");
        let _sub = fx.subscribe();
        fx.queue.run_pending();
        assert_eq!(fx.seen.borrow().len(), 1);
        fx.env.deactivate("md");
        assert_eq!(fx.queue.run_pending(), 0);
        assert_eq!(fx.seen.borrow().len(), 1);
    }

    #[test]
    fn print_is_reported_as_substitute() {
        let fx = fixture(&LayoutConfig::default().with_print_breakpoint("md"));
        let _sub = fx.subscribe();
        fx.env.activate("print");
        fx.queue.run_pending();
        assert_eq!(*fx.seen.borrow(), [Vec::from([String::from("md")])]);
    }

    #[test]
    fn unsubscribed_and_destroyed_pipelines_stay_quiet() {
        let fx = fixture(&LayoutConfig::default());
        let sub = fx.subscribe();
        fx.env.activate("xs");
        drop(sub);
        fx.queue.run_pending();
        assert!(fx.seen.borrow().is_empty());

        let _sub = fx.subscribe();
        fx.observer.destroy();
        fx.env.activate("md");
        fx.queue.run_pending();
        assert!(fx.seen.borrow().is_empty());
    }

    #[test]
    fn is_active_accepts_alias_lists() {
        let fx = fixture(&LayoutConfig::default());
        fx.env.activate("md");
        assert!(fx.observer.is_active("xs, md"));
        assert!(!fx.observer.is_active("xs,lg"));
        assert!(fx.observer.is_active("screen and (min-width: 960px) and (max-width: 1279.98px)"));
    }
}
