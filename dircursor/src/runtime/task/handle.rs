use super::core::Slot;

use std::future::Future;
use std::panic;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// A handle to a blocking closure queued with
/// [`spawn_blocking`](super::spawn_blocking).
///
/// A `JoinHandle` implements [`Future`] and resolves to the closure's
/// return value once it has run. If the closure panicked, the panic is
/// resumed on the task awaiting the handle.
///
/// Dropping the `JoinHandle` does **not** cancel the closure; it only
/// discards the ability to observe its result.
pub struct JoinHandle<T> {
    /// Slot filled by the pool thread.
    pub(crate) slot: Arc<Slot<T>>,
}

impl<T> JoinHandle<T> {
    /// Returns a handle that resolves to `value` on its first poll.
    pub(crate) fn ready(value: T) -> Self {
        Self {
            slot: Arc::new(Slot::ready(value)),
        }
    }

    /// Returns `true` if the closure has finished running.
    pub fn is_finished(&self) -> bool {
        self.slot.lock().result.is_some()
    }
}

impl<T> Future for JoinHandle<T> {
    type Output = T;

    /// Polls the join handle.
    ///
    /// If the closure has already completed, its result is returned
    /// immediately. Otherwise the current waker is stored in the slot,
    /// under the same lock the pool thread uses to publish the result,
    /// so no wake-up can be missed.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut state = self.slot.lock();

        match state.result.take() {
            Some(Ok(value)) => Poll::Ready(value),
            Some(Err(payload)) => {
                drop(state);
                panic::resume_unwind(payload)
            }
            None => {
                state.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}
