// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Carrying the logging context across suspension points and task boundaries.
//!
//! A thread-local alone is not enough for async code: a task can hop threads
//! between polls and many tasks share one worker thread. [`ContextFuture`] owns
//! its own flow and installs it on the polling thread for the duration of every
//! `poll` (and while the wrapped future is dropped), so context set inside the
//! future survives `.await` points and never leaks into sibling tasks.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use pin_project::{pin_project, pinned_drop};
use tokio::task::JoinHandle;

use crate::context::store::{self, Flow};
use crate::context::ContextMap;

/// Installs a flow on the current thread until dropped.
struct Entered<'a> {
    flow: &'a mut Flow,
}

impl<'a> Entered<'a> {
    fn new(flow: &'a mut Flow) -> Self {
        store::swap_flow(flow);
        Self { flow }
    }
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        store::swap_flow(self.flow);
    }
}

/// A future that runs inside its own logging-context flow.
#[pin_project(PinnedDrop)]
pub struct ContextFuture<F> {
    #[pin]
    inner: Option<F>,
    flow: Flow,
}

impl<F> ContextFuture<F> {
    fn new(inner: F, flow: Flow) -> Self {
        Self {
            inner: Some(inner),
            flow,
        }
    }
}

impl<F: Future> Future for ContextFuture<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();
        let _entered = Entered::new(this.flow);

        let poll = match this.inner.as_mut().as_pin_mut() {
            Some(inner) => inner.poll(cx),
            None => panic!("`ContextFuture` polled after completion"),
        };

        if poll.is_ready() {
            this.inner.set(None);
        }
        poll
    }
}

#[pinned_drop]
impl<F> PinnedDrop for ContextFuture<F> {
    fn drop(self: Pin<&mut Self>) {
        let mut this = self.project();
        if this.inner.is_some() {
            // Scope guards held by a cancelled future must unwind in its own flow.
            let _entered = Entered::new(this.flow);
            this.inner.set(None);
        }
    }
}

pub trait FutureExt: Future + Sized {
    /// Run this future in a copy of the caller's current context.
    fn in_current_context(self) -> ContextFuture<Self>;

    /// Run this future in a copy of the caller's current context plus `entries`.
    fn with_context(self, entries: ContextMap) -> ContextFuture<Self>;
}

impl<F: Future> FutureExt for F {
    fn in_current_context(self) -> ContextFuture<Self> {
        ContextFuture::new(self, store::current_flow().fork())
    }

    fn with_context(self, entries: ContextMap) -> ContextFuture<Self> {
        ContextFuture::new(self, store::current_flow().fork().with_entries(entries))
    }
}

/// Spawn a tokio task that inherits a copy of the current logging context.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::spawn(future.in_current_context())
}

/// A copy of the current flow that can be entered later, possibly on another thread.
#[derive(Clone, Debug)]
pub struct CapturedContext {
    flow: Flow,
}

/// Capture the current context for use in another thread or callback.
pub fn capture() -> CapturedContext {
    CapturedContext {
        flow: store::current_flow(),
    }
}

impl CapturedContext {
    /// Run `f` in a fresh flow seeded from the captured mapping.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let mut flow = self.flow.fork();
        let _entered = Entered::new(&mut flow);
        f()
    }
}
