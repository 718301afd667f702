// This file is part of yash, an extended POSIX shell.
// Copyright (C) 2024 WATANABE Yuki

//! Implementation of `Task`

use crate::ExecutorState;
use crate::waker;
use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

/// A future that has been spawned onto an executor.
///
/// A `Task` is always held behind an `Rc` so that the `Waker` passed to the
/// contained future's `poll` method can keep the task alive (and re-enqueue
/// it) even after the executor has otherwise forgotten about it.
pub(crate) struct Task<'a> {
    /// The spawned future, or `None` once it has completed.
    future: RefCell<Option<Pin<Box<dyn Future<Output = ()> + 'a>>>>,
    /// The executor this task belongs to, used to re-enqueue the task when
    /// woken.
    executor: Weak<RefCell<ExecutorState<'a>>>,
}

impl<'a> Task<'a> {
    /// Creates a new task wrapping `future`.
    pub(crate) fn new(
        future: Pin<Box<dyn Future<Output = ()> + 'a>>,
        executor: Weak<RefCell<ExecutorState<'a>>>,
    ) -> Self {
        Task {
            future: RefCell::new(Some(future)),
            executor,
        }
    }

    /// Wakes the task so that it will be polled again by the executor.
    ///
    /// This is a no-op if the executor has already been dropped.
    pub(crate) fn wake(self: Rc<Self>) {
        if let Some(executor) = self.executor.upgrade() {
            ExecutorState::enqueue_task(&executor, self);
        }
    }

    /// Polls the future contained in the task.
    ///
    /// If the future completes, this method returns `true` and leaves the
    /// task empty so that subsequent calls are no-ops that return `true`
    /// again. If the future is not complete, this method returns `false`.
    ///
    /// This method panics if the task is polled recursively.
    pub(crate) fn poll(self: &Rc<Self>) -> bool {
        let mut future = self.future.borrow_mut();
        let Some(pinned) = future.as_mut() else {
            return true;
        };

        let waker = waker::into_waker(Rc::clone(self));
        let mut context = Context::from_waker(&waker);
        match pinned.as_mut().poll(&mut context) {
            Poll::Ready(()) => {
                *future = None;
                true
            }
            Poll::Pending => false,
        }
    }
}
