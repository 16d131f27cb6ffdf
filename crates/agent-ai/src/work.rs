//! Suspended work polled by the tick loop.

use std::future::Future;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use futures::task::noop_waker_ref;

/// An in-flight asynchronous work item.
///
/// The tick loop polls the item once per frame; nothing is ever woken, so
/// the wrapped future must make progress on re-poll alone (tick-time
/// [`crate::clock::Delay`]s and synchronous collaborators).
pub struct WorkItem<T> {
    future: BoxFuture<'static, T>,
}

impl<T> WorkItem<T> {
    pub fn new(future: impl Future<Output = T> + Send + 'static) -> Self {
        Self {
            future: future.boxed(),
        }
    }

    /// Polls once. Returns the output when the work has completed; the item
    /// must not be polled again afterwards.
    pub fn poll(&mut self) -> Option<T> {
        let mut cx = Context::from_waker(noop_waker_ref());
        match self.future.poll_unpin(&mut cx) {
            Poll::Ready(output) => Some(output),
            Poll::Pending => None,
        }
    }
}
