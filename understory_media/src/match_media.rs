// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`MatchMedia`]: the shared media query engine.

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use hashbrown::{HashMap, HashSet};
use understory_breakpoints::LayoutConfig;

use crate::change::MediaChange;
use crate::environment::{MediaEnvironment, MediaListener, MediaQueryList, StubMediaQueryList};
use crate::stream::{Observable, Subject, Subscription};

struct QueryEntry {
    list: Rc<dyn MediaQueryList>,
    matches: Rc<Cell<bool>>,
    listener: MediaListener,
}

struct Inner {
    environment: Rc<dyn MediaEnvironment>,
    source: Subject<MediaChange>,
    registry: RefCell<HashMap<String, QueryEntry>>,
    /// Registration order; teardown walks it backwards.
    order: RefCell<Vec<String>>,
    injected: RefCell<HashSet<String>>,
}

impl Inner {
    fn teardown(&self) {
        let order = core::mem::take(&mut *self.order.borrow_mut());
        let mut registry = core::mem::take(&mut *self.registry.borrow_mut());
        for query in order.iter().rev() {
            if let Some(entry) = registry.remove(query) {
                entry.list.remove_listener(&entry.listener);
            }
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// The single source of truth for "does media query Q match right now".
///
/// Every unique query string is registered with the platform once and gets
/// exactly one native listener, no matter how many streams watch it. Native
/// notifications update the cached state first and are then republished on a
/// shared stream that remembers the latest change.
///
/// Cloning yields another handle to the same engine. Construct one engine per
/// process (or per test) and pass it to everything that needs it.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use understory_breakpoints::LayoutConfig;
/// use understory_media::{MatchMedia, MockMediaEnvironment};
///
/// let env = MockMediaEnvironment::new();
/// let engine = MatchMedia::new(Rc::new(env.clone()), &LayoutConfig::default());
///
/// assert!(!engine.is_active("print"));
/// env.activate("print");
/// assert!(engine.is_active("print"));
/// assert_eq!(env.listener_count("print"), 1);
/// ```
#[derive(Clone)]
pub struct MatchMedia {
    inner: Rc<Inner>,
}

impl MatchMedia {
    /// Creates an engine over `environment`.
    ///
    /// Logs a warning when the platform is non-interactive and
    /// [`LayoutConfig::server_loaded`] is not set.
    #[must_use]
    pub fn new(environment: Rc<dyn MediaEnvironment>, config: &LayoutConfig) -> Self {
        if !environment.supports_listeners() && !config.server_loaded {
            tracing::warn!(
                "media queries are evaluated on a non-interactive platform without server support; \
                 every breakpoint will report as inactive"
            );
        }
        Self {
            inner: Rc::new(Inner {
                environment,
                source: Subject::replaying(),
                registry: RefCell::new(HashMap::new()),
                order: RefCell::new(Vec::new()),
                injected: RefCell::new(HashSet::new()),
            }),
        }
    }

    /// Whether `query` matches.
    ///
    /// Registered queries answer from the cache; unknown queries are
    /// registered on the spot and answer with their current state.
    pub fn is_active(&self, query: &str) -> bool {
        if let Some(entry) = self.inner.registry.borrow().get(query) {
            return entry.matches.get();
        }
        self.register_query(query);
        self.cached(query)
    }

    fn cached(&self, query: &str) -> bool {
        self.inner
            .registry
            .borrow()
            .get(query)
            .is_some_and(|entry| entry.matches.get())
    }

    /// Registers one query. Returns `true` if it currently matches.
    pub fn register_query(&self, query: &str) -> bool {
        !self.register_queries(&[query]).is_empty()
    }

    /// Registers every query that is not registered yet.
    ///
    /// Returns a matching [`MediaChange`] for each listed query that currently
    /// matches, in list order.
    pub fn register_queries<S: AsRef<str>>(&self, queries: &[S]) -> Vec<MediaChange> {
        let mut fresh: Vec<&str> = Vec::new();
        {
            let registry = self.inner.registry.borrow();
            for query in queries.iter().map(AsRef::as_ref) {
                if !registry.contains_key(query) && !fresh.contains(&query) {
                    fresh.push(query);
                }
            }
        }

        let interactive = self.inner.environment.supports_listeners();
        if interactive {
            let mut listed: Vec<&str> = Vec::new();
            for query in queries.iter().map(AsRef::as_ref) {
                if !listed.contains(&query) {
                    listed.push(query);
                }
            }
            self.inject_styles(&listed);
        }

        for query in fresh {
            let list: Rc<dyn MediaQueryList> = if interactive {
                self.inner.environment.match_media(query)
            } else {
                Rc::new(StubMediaQueryList::new(query))
            };
            let matches = Rc::new(Cell::new(list.matches()));
            let listener = self.listener_for(query, matches.clone());
            list.add_listener(listener.clone());
            tracing::debug!(query, matches = matches.get(), "registered media query");

            self.inner.order.borrow_mut().push(query.into());
            self.inner.registry.borrow_mut().insert(
                query.into(),
                QueryEntry {
                    list,
                    matches,
                    listener,
                },
            );
        }

        queries
            .iter()
            .map(AsRef::as_ref)
            .filter(|query| self.cached(query))
            .map(|query| MediaChange::new(true, query))
            .collect()
    }

    fn listener_for(&self, query: &str, matches: Rc<Cell<bool>>) -> MediaListener {
        let engine: Weak<Inner> = Rc::downgrade(&self.inner);
        let query = String::from(query);
        Rc::new(move |now: bool| {
            matches.set(now);
            if let Some(inner) = engine.upgrade() {
                inner.source.next(&MediaChange::new(now, query.clone()));
            }
        })
    }

    fn inject_styles(&self, queries: &[&str]) {
        let pending: Vec<&str> = {
            let injected = self.inner.injected.borrow();
            queries
                .iter()
                .copied()
                .filter(|query| !injected.contains(*query))
                .collect()
        };
        if pending.is_empty() {
            return;
        }
        let css = query_test_rule(&pending);
        if let Err(err) = self.inner.environment.inject_query_styles(&css) {
            tracing::error!(%err, "failed to inject media query test styles");
            return;
        }
        let mut injected = self.inner.injected.borrow_mut();
        for query in pending {
            injected.insert(query.into());
        }
    }

    /// Streams changes, starting with the current matches of `queries`.
    ///
    /// Nothing is registered until the stream is subscribed. On subscription
    /// every query is registered, then each currently matching query except
    /// the last is delivered to the new subscriber, the last one is published
    /// on the shared stream (so every subscriber sees it), and finally the
    /// subscriber joins the shared stream, which replays its latest change.
    ///
    /// With `filter_others`, only changes for `queries` are delivered. An
    /// empty list is the same as [`observe_all`](Self::observe_all).
    #[must_use]
    pub fn observe(&self, queries: &[String], filter_others: bool) -> Observable<MediaChange> {
        if queries.is_empty() {
            return self.observe_all();
        }
        let engine = self.clone();
        let queries: Rc<[String]> = queries.into();
        Observable::new(move |observer| {
            let mut current = engine.register_queries(&queries[..]);
            if let Some(last) = current.pop() {
                for change in &current {
                    observer(change);
                }
                engine.inner.source.next(&last);
            }
            let live = engine.observe_all();
            let live = if filter_others {
                let watched = queries.clone();
                live.filter(move |change| watched.iter().any(|q| *q == change.media_query))
            } else {
                live
            };
            live.subscribe_observer(observer)
        })
    }

    /// The raw shared stream of every registered query's changes.
    #[must_use]
    pub fn observe_all(&self) -> Observable<MediaChange> {
        self.inner.source.as_observable()
    }

    /// Subscribes `callback` to the raw shared stream.
    pub fn subscribe(&self, callback: impl Fn(&MediaChange) + 'static) -> Subscription {
        self.inner.source.subscribe(callback)
    }

    /// The latest change published on the shared stream.
    #[must_use]
    pub fn latest(&self) -> Option<MediaChange> {
        self.inner.source.latest()
    }

    /// Currently matching registered queries, in registration order.
    #[must_use]
    pub fn activations(&self) -> Vec<String> {
        let registry = self.inner.registry.borrow();
        self.inner
            .order
            .borrow()
            .iter()
            .filter(|query| registry.get(*query).is_some_and(|e| e.matches.get()))
            .cloned()
            .collect()
    }

    /// Every registered query, in registration order.
    #[must_use]
    pub fn registered_queries(&self) -> Vec<String> {
        self.inner.order.borrow().clone()
    }

    /// Detaches every native listener, most recent first, and forgets all
    /// registrations. The engine stays usable; queries re-register on demand.
    pub fn destroy(&self) {
        tracing::debug!("tearing down media query listeners");
        self.inner.teardown();
    }
}

impl fmt::Debug for MatchMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchMedia")
            .field("registered", &self.inner.order.borrow().len())
            .field("injected", &self.inner.injected.borrow().len())
            .field("observers", &self.inner.source.observer_count())
            .finish_non_exhaustive()
    }
}

/// Builds the `@media` rule that makes listeners fire for `queries`.
#[must_use]
pub fn query_test_rule(queries: &[&str]) -> String {
    let mut css = String::from("@media ");
    for (i, query) in queries.iter().enumerate() {
        if i > 0 {
            css.push_str(", ");
        }
        css.push_str(query);
    }
    css.push_str(" {.fx-query-test{ }}");
    css
}
