// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal single-threaded change streams.
//!
//! - [`Subject`]: a hot broadcaster. A replaying subject remembers the latest
//!   value and hands it to each new subscriber.
//! - [`Observable`]: a lazy stream. Nothing happens until
//!   [`subscribe`](Observable::subscribe) is called, and each subscription runs
//!   the producer independently.
//! - [`Subscription`]: an RAII handle. Dropping or unsubscribing it stops
//!   further callbacks immediately, even in the middle of an emission.
//!
//! ```rust
//! use core::cell::RefCell;
//! use std::rc::Rc;
//! use understory_media::Subject;
//!
//! let subject = Subject::replaying();
//! subject.next(&1);
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//! let sub = subject
//!     .as_observable()
//!     .filter(|v| v % 2 == 1)
//!     .subscribe(move |v| sink.borrow_mut().push(*v));
//!
//! subject.next(&2);
//! subject.next(&3);
//! drop(sub);
//! subject.next(&5);
//!
//! assert_eq!(*seen.borrow(), [1, 3]);
//! ```

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

/// A shared subscriber callback.
pub type Observer<T> = Rc<dyn Fn(&T)>;

/// Handle to a live subscription.
///
/// Holds the teardown actions registered for the subscription. They run once,
/// in reverse registration order, on [`unsubscribe`](Self::unsubscribe) or drop.
#[must_use = "dropping a Subscription unsubscribes it"]
#[derive(Default)]
pub struct Subscription {
    teardowns: Vec<Box<dyn FnOnce()>>,
    closed: bool,
}

impl Subscription {
    /// Creates an open subscription with no teardown actions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a subscription that runs `teardown` when closed.
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        let mut sub = Self::empty();
        sub.add(teardown);
        sub
    }

    /// Registers another teardown action.
    ///
    /// If the subscription is already closed the action runs immediately.
    pub fn add(&mut self, teardown: impl FnOnce() + 'static) {
        if self.closed {
            teardown();
        } else {
            self.teardowns.push(Box::new(teardown));
        }
    }

    /// Ties another subscription's lifetime to this one.
    pub fn add_subscription(&mut self, mut other: Self) {
        self.add(move || other.unsubscribe());
    }

    /// Runs every teardown action. Calling this again is a no-op.
    pub fn unsubscribe(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        while let Some(teardown) = self.teardowns.pop() {
            teardown();
        }
    }

    /// Returns `true` once the subscription has been unsubscribed.
    #[must_use]
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.closed)
            .field("teardowns", &self.teardowns.len())
            .finish()
    }
}

struct Slot<T> {
    id: u64,
    active: Rc<Cell<bool>>,
    callback: Observer<T>,
}

struct SubjectInner<T> {
    slots: RefCell<Vec<Slot<T>>>,
    next_id: Cell<u64>,
    latest: RefCell<Option<T>>,
    replay: bool,
}

/// A hot broadcaster of values to any number of subscribers.
///
/// Cloning a subject yields another handle to the same subscriber list.
pub struct Subject<T> {
    inner: Rc<SubjectInner<T>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Subject<T> {
    /// Creates a subject that only delivers values emitted after subscription.
    #[must_use]
    pub fn new() -> Self {
        Self::with_replay(false)
    }

    /// Creates a subject that replays its latest value to new subscribers.
    ///
    /// The subject starts with no latest value, so nothing is replayed until
    /// the first [`next`](Self::next).
    #[must_use]
    pub fn replaying() -> Self {
        Self::with_replay(true)
    }

    fn with_replay(replay: bool) -> Self {
        Self {
            inner: Rc::new(SubjectInner {
                slots: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                latest: RefCell::new(None),
                replay,
            }),
        }
    }

    /// Delivers `value` to every current subscriber.
    ///
    /// Subscribers added during delivery do not receive this value (beyond the
    /// replay they get on subscription); subscribers removed during delivery
    /// are skipped.
    pub fn next(&self, value: &T) {
        if self.inner.replay {
            *self.inner.latest.borrow_mut() = Some(value.clone());
        }
        let targets: Vec<(Rc<Cell<bool>>, Observer<T>)> = self
            .inner
            .slots
            .borrow()
            .iter()
            .map(|slot| (slot.active.clone(), slot.callback.clone()))
            .collect();
        for (active, callback) in targets {
            if active.get() {
                callback(value);
            }
        }
    }

    /// Returns the latest value of a replaying subject.
    #[must_use]
    pub fn latest(&self) -> Option<T> {
        self.inner.latest.borrow().clone()
    }

    /// Returns the number of live subscribers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.slots.borrow().len()
    }

    /// Adds a subscriber.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.subscribe_observer(Rc::new(callback))
    }

    /// Adds a shared subscriber.
    pub fn subscribe_observer(&self, callback: Observer<T>) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let active = Rc::new(Cell::new(true));
        self.inner.slots.borrow_mut().push(Slot {
            id,
            active: active.clone(),
            callback: callback.clone(),
        });

        let weak: Weak<SubjectInner<T>> = Rc::downgrade(&self.inner);
        let flag = active.clone();
        let subscription = Subscription::new(move || {
            flag.set(false);
            if let Some(inner) = weak.upgrade() {
                inner.slots.borrow_mut().retain(|slot| slot.id != id);
            }
        });

        let replayed = if self.inner.replay {
            self.latest()
        } else {
            None
        };
        if let Some(value) = replayed {
            if active.get() {
                callback(&value);
            }
        }
        subscription
    }

    /// Returns a lazy view of this subject.
    #[must_use]
    pub fn as_observable(&self) -> Observable<T> {
        let subject = self.clone();
        Observable::new(move |observer| subject.subscribe_observer(observer))
    }
}

impl<T> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("observers", &self.inner.slots.borrow().len())
            .field("replay", &self.inner.replay)
            .finish_non_exhaustive()
    }
}

/// A lazy stream of values.
///
/// Each call to [`subscribe`](Self::subscribe) runs the producer for that
/// subscriber alone; combinators build new lazy streams on top.
pub struct Observable<T> {
    producer: Rc<dyn Fn(Observer<T>) -> Subscription>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            producer: self.producer.clone(),
        }
    }
}

impl<T: 'static> Observable<T> {
    /// Creates a stream from a producer.
    ///
    /// The producer receives the subscriber and returns the subscription that
    /// stops it.
    pub fn new(producer: impl Fn(Observer<T>) -> Subscription + 'static) -> Self {
        Self {
            producer: Rc::new(producer),
        }
    }

    /// A stream that never emits.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(|_| Subscription::empty())
    }

    /// Starts the stream, calling `callback` for every value.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        (self.producer)(Rc::new(callback))
    }

    /// Starts the stream with a shared subscriber.
    pub fn subscribe_observer(&self, observer: Observer<T>) -> Subscription {
        (self.producer)(observer)
    }

    /// Only passes values for which `predicate` returns `true`.
    #[must_use]
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Self {
        let source = self.clone();
        let predicate = Rc::new(predicate);
        Self::new(move |observer| {
            let predicate = predicate.clone();
            source.subscribe(move |value| {
                if predicate(value) {
                    observer(value);
                }
            })
        })
    }

    /// Transforms every value.
    #[must_use]
    pub fn map<U: 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Observable<U> {
        let source = self.clone();
        let f = Rc::new(f);
        Observable::new(move |observer: Observer<U>| {
            let f = f.clone();
            source.subscribe(move |value| observer(&f(value)))
        })
    }

    /// Interleaves this stream with `other`.
    ///
    /// `self` is subscribed first, so values it emits synchronously on
    /// subscription arrive before those of `other`.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let first = self.clone();
        let second = other.clone();
        Self::new(move |observer| {
            let mut sub = first.subscribe_observer(observer.clone());
            sub.add_subscription(second.subscribe_observer(observer));
            sub
        })
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl Fn(&T) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        (log, move |v: &T| sink.borrow_mut().push(v.clone()))
    }

    #[test]
    fn plain_subject_does_not_replay() {
        let subject = Subject::new();
        subject.next(&1);
        let (log, sink) = recorder();
        let _sub = subject.subscribe(sink);
        subject.next(&2);
        assert_eq!(*log.borrow(), vec![2]);
        assert_eq!(subject.latest(), None);
    }

    #[test]
    fn replaying_subject_starts_empty() {
        let subject: Subject<u32> = Subject::replaying();
        let (log, sink) = recorder();
        let _sub = subject.subscribe(sink);
        assert!(log.borrow().is_empty());
        subject.next(&7);
        assert_eq!(subject.latest(), Some(7));
        assert_eq!(*log.borrow(), vec![7]);
    }

    #[test]
    fn unsubscribe_mid_emission_stops_later_observers() {
        let subject = Subject::new();
        let second: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let hits = Rc::new(Cell::new(0));

        let killer = second.clone();
        let _first = subject.subscribe(move |_: &u8| {
            if let Some(mut sub) = killer.borrow_mut().take() {
                sub.unsubscribe();
            }
        });
        let counter = hits.clone();
        *second.borrow_mut() = Some(subject.subscribe(move |_| counter.set(counter.get() + 1)));

        subject.next(&0);
        assert_eq!(hits.get(), 0);
        assert_eq!(subject.observer_count(), 1);
    }

    #[test]
    fn teardowns_run_once_in_reverse() {
        let (log, _) = recorder::<u8>();
        let mut sub = Subscription::empty();
        let a = log.clone();
        sub.add(move || a.borrow_mut().push(1));
        let b = log.clone();
        sub.add(move || b.borrow_mut().push(2));
        sub.unsubscribe();
        sub.unsubscribe();
        assert!(sub.is_closed());
        assert_eq!(*log.borrow(), vec![2, 1]);

        let c = log.clone();
        sub.add(move || c.borrow_mut().push(3));
        assert_eq!(*log.borrow(), vec![2, 1, 3]);
    }

    #[test]
    fn observable_is_lazy_and_per_subscriber() {
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let source = Observable::new(move |observer: Observer<u32>| {
            counter.set(counter.get() + 1);
            observer(&counter.get());
            Subscription::empty()
        });
        let doubled = source.map(|v| v * 2);
        assert_eq!(runs.get(), 0);

        let (log, sink) = recorder();
        let _a = doubled.subscribe(sink);
        let (log2, sink2) = recorder();
        let _b = doubled.subscribe(sink2);
        assert_eq!(runs.get(), 2);
        assert_eq!(*log.borrow(), vec![2]);
        assert_eq!(*log2.borrow(), vec![4]);
    }

    #[test]
    fn merge_subscribes_both_and_unsubscribes_both() {
        let a = Subject::new();
        let b = Subject::new();
        let (log, sink) = recorder();
        let sub = a.as_observable().merge(&b.as_observable()).subscribe(sink);
        a.next(&1);
        b.next(&2);
        drop(sub);
        a.next(&3);
        b.next(&4);
        assert_eq!(*log.borrow(), vec![1, 2]);
        assert_eq!(a.observer_count(), 0);
        assert_eq!(b.observer_count(), 0);
    }
}
