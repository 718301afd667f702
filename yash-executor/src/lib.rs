// This file is part of yash, an extended POSIX shell.
// Copyright (C) 2024 WATANABE Yuki

//! Single-threaded concurrent task executor
//!
//! This crate provides a minimal executor for running multiple
//! [`Future`]s concurrently on a single thread. It is used by the shell to
//! drive asynchronous command execution (built-ins, subshells, job control
//! waits) without depending on a multi-threaded runtime.
//!
//! The [`Executor`] owns a queue of tasks that have been woken up. Calling
//! [`Executor::step`] or [`Executor::run_until_stalled`] polls those tasks.
//! New tasks are added with [`Executor::spawn_pinned`] or
//! [`Executor::spawn`], or, from inside a running task, via a cloned
//! [`Spawner`].
//!
//! This crate is `no_std` (it only requires `alloc`) and is not thread-safe:
//! all types are built around [`alloc::rc::Rc`] and must stay on the thread
//! that created them.

#![no_std]
extern crate alloc;

mod executor;
pub mod forwarder;
mod spawner;
mod task;
mod waker;

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use core::future::{Future, IntoFuture};
use core::pin::Pin;

pub use spawner::SpawnError;
use task::Task;

/// Queue of tasks shared between an [`Executor`] and its [`Spawner`]s.
#[derive(Default)]
struct ExecutorState<'a> {
    /// Tasks that have been woken up and are waiting to be polled.
    queue: VecDeque<Rc<Task<'a>>>,
}

impl<'a> ExecutorState<'a> {
    /// Wraps `future` in a new task and enqueues it.
    fn enqueue(state: &Rc<RefCell<Self>>, future: Pin<Box<dyn Future<Output = ()> + 'a>>) {
        let task = Rc::new(Task::new(future, Rc::downgrade(state)));
        Self::enqueue_task(state, task);
    }

    /// Enqueues an existing task.
    fn enqueue_task(state: &Rc<RefCell<Self>>, task: Rc<Task<'a>>) {
        state.borrow_mut().queue.push_back(task);
    }

    /// Wraps `future` so its result is forwarded to the returned receiver,
    /// then enqueues it.
    fn enqueue_forwarding<F, T>(state: &Rc<RefCell<Self>>, future: F) -> forwarder::Receiver<T>
    where
        F: IntoFuture<Output = T> + 'a,
        T: 'a,
    {
        let (sender, receiver) = forwarder::forwarder();
        let future = future.into_future();
        let future = Box::pin(async move {
            let result = future.await;
            let _ = sender.send(result);
        });
        Self::enqueue(state, future);
        receiver
    }
}

/// Single-threaded task executor
///
/// An `Executor` owns the queue of tasks that are ready to be polled. Cloning
/// an `Executor` shares the same queue; the underlying state is dropped only
/// once every clone and every [`Spawner`] derived from it has been dropped.
pub struct Executor<'a> {
    state: Rc<RefCell<ExecutorState<'a>>>,
}

impl<'a> Default for Executor<'a> {
    fn default() -> Self {
        Executor {
            state: Rc::new(RefCell::new(ExecutorState::default())),
        }
    }
}

impl<'a> Clone for Executor<'a> {
    fn clone(&self) -> Self {
        Executor {
            state: Rc::clone(&self.state),
        }
    }
}

impl<'a> Executor<'a> {
    /// Returns the number of tasks currently waiting to be polled.
    #[must_use]
    pub fn wake_count(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Returns a [`Spawner`] that can be used to add tasks to this executor.
    ///
    /// Unlike `Executor`, a `Spawner` does not keep the executor alive: once
    /// every `Executor` referring to the same queue has been dropped, the
    /// spawner's methods become no-ops.
    #[must_use]
    pub fn spawner(&self) -> Spawner<'a> {
        Spawner {
            state: Rc::downgrade(&self.state),
        }
    }

    /// Adds the given future to the task queue so that it will be polled
    /// when the executor is run.
    ///
    /// See [`Spawner::spawn_pinned`] for details, including safety
    /// considerations.
    ///
    /// # Safety
    ///
    /// See [`Spawner::spawn_pinned`].
    #[allow(clippy::type_complexity)]
    pub unsafe fn spawn_pinned(
        &self,
        future: Pin<Box<dyn Future<Output = ()> + 'a>>,
    ) -> Result<(), SpawnError<Pin<Box<dyn Future<Output = ()> + 'a>>>> {
        unsafe { self.spawner().spawn_pinned(future) }
    }

    /// Adds the given future to the task queue, returning a receiver for its
    /// result.
    ///
    /// See [`Spawner::spawn`] for details, including safety considerations.
    ///
    /// # Safety
    ///
    /// See [`Spawner::spawn`].
    pub unsafe fn spawn<F, T>(&self, future: F) -> Result<forwarder::Receiver<T>, SpawnError<F>>
    where
        F: IntoFuture<Output = T> + 'a,
        T: 'a,
    {
        unsafe { self.spawner().spawn(future) }
    }
}

/// Handle used to add tasks to an [`Executor`] without owning it.
///
/// A `Spawner` is obtained from [`Executor::spawner`] or passed into a
/// running task's future so the task can spawn further tasks on the same
/// executor. Once every `Executor` sharing its queue has been dropped, the
/// spawner's methods return the future back wrapped in a [`SpawnError`]
/// instead of panicking.
#[derive(Clone, Debug)]
pub struct Spawner<'a> {
    state: Weak<RefCell<ExecutorState<'a>>>,
}
