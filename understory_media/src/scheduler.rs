// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred task execution for zero-delay debouncing.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Runs tasks "on the next tick".
///
/// The host decides what a tick is; the only contract is that a scheduled task
/// never runs synchronously inside [`schedule`](Self::schedule).
pub trait Scheduler {
    /// Queues `task` for later execution.
    fn schedule(&self, task: Task);
}

/// A FIFO task queue drained explicitly by the host.
///
/// Cloning yields another handle to the same queue.
///
/// ```rust
/// use core::cell::Cell;
/// use std::rc::Rc;
/// use understory_media::{Scheduler, TaskQueue};
///
/// let queue = TaskQueue::new();
/// let ran = Rc::new(Cell::new(false));
/// let flag = ran.clone();
/// queue.schedule(Box::new(move || flag.set(true)));
///
/// assert!(!ran.get());
/// assert_eq!(queue.run_pending(), 1);
/// assert!(ran.get());
/// ```
#[derive(Clone, Default)]
pub struct TaskQueue {
    tasks: Rc<RefCell<VecDeque<Task>>>,
}

impl TaskQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs queued tasks until the queue is empty, including tasks queued by
    /// the tasks themselves. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.tasks.borrow_mut().pop_front();
            let Some(task) = task else {
                return ran;
            };
            task();
            ran += 1;
        }
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }
}

impl Scheduler for TaskQueue {
    fn schedule(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn tasks_scheduled_while_draining_also_run() {
        let queue = TaskQueue::new();
        let count = Rc::new(Cell::new(0));
        let inner_queue = queue.clone();
        let counter = count.clone();
        queue.schedule(Box::new(move || {
            counter.set(counter.get() + 1);
            let counter = counter.clone();
            inner_queue.schedule(Box::new(move || counter.set(counter.get() + 10)));
        }));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.run_pending(), 2);
        assert_eq!(count.get(), 11);
        assert!(queue.is_empty());
    }
}
