use super::JoinHandle;
use crate::runtime::blocking::BlockingPool;
use crate::runtime::context;

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::Waker;
use std::thread;

/// Completion slot shared by a blocking job and its [`JoinHandle`].
pub(crate) struct Slot<T> {
    state: Mutex<SlotState<T>>,
}

pub(crate) struct SlotState<T> {
    /// Outcome of the job, including a captured panic.
    pub(crate) result: Option<thread::Result<T>>,

    /// Waker of the task awaiting the handle.
    pub(crate) waker: Option<Waker>,
}

impl<T> Slot<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                result: None,
                waker: None,
            }),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SlotState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a slot that already holds `value`.
    pub(crate) fn ready(value: T) -> Self {
        let slot = Self::new();
        slot.lock().result = Some(Ok(value));
        slot
    }

    /// Stores the job outcome and wakes the awaiting task.
    pub(crate) fn complete(&self, result: thread::Result<T>) {
        let waker = {
            let mut state = self.lock();
            state.result = Some(result);
            state.waker.take()
        };

        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// Runs a blocking closure on the pool and returns a handle to its result.
///
/// The closure starts as soon as a pool thread is free, whether or not the
/// handle is ever polled. Dropping the [`JoinHandle`] does **not** cancel
/// the closure; it only discards its result.
///
/// # Examples
///
/// ```rust,ignore
/// let len = dircursor::task::spawn_blocking(|| std::fs::read("Cargo.toml").map(|b| b.len()))
///     .await?;
/// ```
pub fn spawn_blocking<F, T>(f: F) -> JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    spawn_on(&context::current_pool(), f)
}

/// Runs a blocking closure on the given pool.
pub(crate) fn spawn_on<F, T>(pool: &BlockingPool, f: F) -> JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let slot = Arc::new(Slot::new());
    let completion = slot.clone();

    pool.push(Box::new(move || {
        let result = panic::catch_unwind(AssertUnwindSafe(f));
        completion.complete(result);
    }));

    JoinHandle { slot }
}
