use super::blocking::{BlockingPool, PoolHandle};
use super::context::enter_context;
use super::park;
use super::task::JoinHandle;
use super::task::core::spawn_on;

use std::future::Future;
use std::sync::Arc;

/// The main runtime handle.
///
/// `Runtime` is responsible for:
/// - owning the blocking pool used for directory system calls,
/// - providing a synchronous entry point via [`block_on`](Self::block_on),
/// - exposing the pool directly through [`spawn_blocking`](Self::spawn_blocking).
///
/// Dropping the runtime shuts the pool down: queued jobs still run, then
/// every worker thread is joined.
pub struct Runtime {
    /// Pool running blocking calls on behalf of futures.
    pool: PoolHandle,
}

impl Runtime {
    /// Creates a new runtime instance.
    ///
    /// # Arguments
    ///
    /// * `blocking_threads` - Maximum number of blocking worker threads.
    /// * `thread_name` - Name prefix of those threads.
    pub(crate) fn new(blocking_threads: usize, thread_name: String) -> Self {
        Self {
            pool: Arc::new(BlockingPool::new(blocking_threads, thread_name)),
        }
    }

    /// Runs a future to completion, blocking the current thread.
    ///
    /// This method is typically used as the synchronous entry point
    /// of the runtime (e.g. in `main` or tests). While the future runs,
    /// this runtime's pool is the one used by
    /// [`task::spawn_blocking`](crate::task::spawn_blocking).
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let result = runtime.block_on(async {
    ///     42
    /// });
    /// assert_eq!(result, 42);
    /// ```
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        enter_context(self.pool.clone(), || park::block_on(future))
    }

    /// Runs a blocking closure on this runtime's pool.
    pub fn spawn_blocking<F, T>(&self, f: F) -> JoinHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        spawn_on(&self.pool, f)
    }
}

impl Drop for Runtime {
    /// Shuts down the blocking pool and joins its threads.
    fn drop(&mut self) {
        self.pool.shutdown();
    }
}
