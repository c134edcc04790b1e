use crate::runtime::context;
use crate::runtime::park;
use crate::runtime::task::JoinHandle;
use crate::runtime::task::core::Slot;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Work left over by an operation, run once the value is unlocked.
type Deferred = Box<dyn FnOnce() + Send + 'static>;

/// An operation queued against the protected value.
type Op<T> = Box<dyn FnOnce(&mut T) -> Option<Deferred> + Send + 'static>;

thread_local! {
    /// Queues currently being drained by this thread, by address.
    static DRAINING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Runs closures against a value one at a time, in submission order.
///
/// `Serial<T>` is the lock behind every directory cursor. Unlike a mutex,
/// callers never wait for their turn themselves: [`submit`](Self::submit)
/// queues the closure *immediately* and returns a [`JoinHandle`] to its
/// result. The queue is drained by a job on the blocking pool, so queued
/// closures run even if nobody polls their handles, and they always run in
/// the order in which they were submitted.
///
/// Blocking callers use [`run_blocking`](Self::run_blocking), which takes
/// the same place in line and runs inline when nothing else is queued.
///
/// Closures must not call back into the same `Serial`; callbacks given to
/// [`submit_with`](Self::submit_with) may.
pub struct Serial<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    /// The protected value.
    ///
    /// Only the holder of the `running` flag locks it, so it is never
    /// contended; the mutex exists to make `Inner` shareable.
    value: Mutex<T>,

    queue: Mutex<Queue<T>>,
}

struct Queue<T> {
    /// Pending operations, oldest first.
    ops: VecDeque<Op<T>>,

    /// Set while someone (a drain job or an inline caller) owns the value.
    running: bool,
}

impl<T: Send + 'static> Serial<T> {
    /// Creates a new, idle queue around the given value.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: Mutex::new(value),
                queue: Mutex::new(Queue {
                    ops: VecDeque::new(),
                    running: false,
                }),
            }),
        }
    }

    /// Queues `f` and returns a handle to its result.
    ///
    /// `f` runs on the blocking pool after every closure submitted before
    /// it. Dropping the handle does not cancel `f`. A panic in `f` is
    /// resumed on the task awaiting the handle; the queue keeps going.
    pub fn submit<F, R>(&self, f: F) -> JoinHandle<R>
    where
        F: FnOnce(&mut T) -> R + Send + 'static,
        R: Send + 'static,
    {
        let slot = Arc::new(Slot::new());
        let completion = slot.clone();

        self.push(Box::new(move |value: &mut T| -> Option<Deferred> {
            let result = panic::catch_unwind(AssertUnwindSafe(|| f(value)));
            completion.complete(result);
            None
        }));

        JoinHandle { slot }
    }

    /// Queues `f`, then calls `callback` with its result.
    ///
    /// The callback runs on the draining thread once the value has been
    /// unlocked, before the next queued closure and before the handle
    /// resolves. It may use this `Serial` again, including through
    /// [`run_blocking`](Self::run_blocking).
    pub fn submit_with<F, C, R>(&self, f: F, callback: C) -> JoinHandle<R>
    where
        F: FnOnce(&mut T) -> R + Send + 'static,
        C: FnOnce(&R) + Send + 'static,
        R: Send + 'static,
    {
        let slot = Arc::new(Slot::new());
        let completion = slot.clone();

        self.push(Box::new(move |value: &mut T| -> Option<Deferred> {
            match panic::catch_unwind(AssertUnwindSafe(|| f(value))) {
                Ok(result) => Some(Box::new(move || {
                    let delivered =
                        panic::catch_unwind(AssertUnwindSafe(|| callback(&result))).map(|()| result);
                    completion.complete(delivered);
                }) as Deferred),
                Err(payload) => {
                    completion.complete(Err(payload));
                    None
                }
            }
        }));

        JoinHandle { slot }
    }

    /// Runs `f` now, on the calling thread, if nothing is queued or running.
    ///
    /// Returns `None` without running `f` otherwise.
    pub fn try_now<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        if !self.inner.claim() {
            return None;
        }

        let _release = Release(&self.inner);
        Some(f(&mut self.inner.value()))
    }

    /// Runs `f` in submission order and blocks until it has run.
    ///
    /// When the queue is idle `f` runs inline; otherwise it is queued and
    /// the current thread is parked until the drain job reaches it. Called
    /// from a callback on the thread draining this queue, the queue is
    /// drained inline up to `f` instead.
    pub fn run_blocking<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.inner.is_drained_here() {
            let handle = self.submit(f);

            while !handle.is_finished() {
                let Some(op) = self.inner.pop() else {
                    break;
                };
                self.inner.run(op);
            }

            return park::block_on(handle);
        }

        if !self.inner.claim() {
            return park::block_on(self.submit(f));
        }

        let _release = Release(&self.inner);
        f(&mut self.inner.value())
    }

    fn push(&self, op: Op<T>) {
        let start_drain = {
            let mut queue = self.inner.queue();
            queue.ops.push_back(op);

            !std::mem::replace(&mut queue.running, true)
        };

        if start_drain {
            self.inner.clone().spawn_drain();
        }
    }
}

impl<T> Clone for Serial<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send + 'static> Inner<T> {
    fn queue(&self) -> MutexGuard<'_, Queue<T>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn value(&self) -> MutexGuard<'_, T> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn id(&self) -> usize {
        self as *const Self as usize
    }

    /// Takes the `running` flag if the queue is idle.
    fn claim(&self) -> bool {
        let mut queue = self.queue();
        if queue.running || !queue.ops.is_empty() {
            return false;
        }
        queue.running = true;
        true
    }

    /// Returns `true` if the current thread is draining this queue.
    fn is_drained_here(&self) -> bool {
        let id = self.id();
        DRAINING.with(|d| d.borrow().contains(&id))
    }

    fn pop(&self) -> Option<Op<T>> {
        self.queue().ops.pop_front()
    }

    /// Runs one operation, then its deferred work with the value unlocked.
    fn run(&self, op: Op<T>) {
        let deferred = op(&mut self.value());

        if let Some(deferred) = deferred {
            deferred();
        }
    }

    /// Hands the queue over to a drain job on the current pool.
    fn spawn_drain(self: Arc<Self>) {
        context::current_pool().push(Box::new(move || self.drain()));
    }

    /// Runs queued operations until the queue is empty.
    fn drain(&self) {
        let _draining = Draining::enter(self.id());

        loop {
            let op = {
                let mut queue = self.queue();

                match queue.ops.pop_front() {
                    Some(op) => op,
                    None => {
                        queue.running = false;
                        return;
                    }
                }
            };

            self.run(op);
        }
    }
}

/// Marks a queue as drained by the current thread while alive.
struct Draining(usize);

impl Draining {
    fn enter(id: usize) -> Self {
        DRAINING.with(|d| d.borrow_mut().push(id));
        Self(id)
    }
}

impl Drop for Draining {
    fn drop(&mut self) {
        DRAINING.with(|d| {
            let mut d = d.borrow_mut();
            if let Some(pos) = d.iter().rposition(|&id| id == self.0) {
                d.remove(pos);
            }
        });
    }
}

/// Gives up the `running` flag after an inline run.
///
/// Operations queued meanwhile are handed to a drain job.
struct Release<'a, T: Send + 'static>(&'a Arc<Inner<T>>);

impl<T: Send + 'static> Drop for Release<'_, T> {
    fn drop(&mut self) {
        let pending = {
            let mut queue = self.0.queue();
            if queue.ops.is_empty() {
                queue.running = false;
                false
            } else {
                true
            }
        };

        if pending {
            self.0.clone().spawn_drain();
        }
    }
}
