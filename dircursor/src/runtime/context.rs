use crate::runtime::blocking::{BlockingPool, PoolHandle};
use crate::runtime::builder::{DEFAULT_THREAD_NAME, default_blocking_threads};

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

thread_local! {
    /// Thread-local handle to the blocking pool of the runtime currently
    /// driving this thread.
    ///
    /// This is set by [`Runtime::block_on`](crate::Runtime::block_on) and
    /// lets directory handles reach the pool without explicit parameter
    /// passing.
    pub(crate) static CURRENT_POOL: RefCell<Option<PoolHandle>> =
        const { RefCell::new(None) };
}

/// Pool used when no runtime context is installed.
static GLOBAL_POOL: OnceLock<PoolHandle> = OnceLock::new();

/// Enters the runtime execution context for the current thread.
///
/// The pool handle is installed for the duration of the closure `f`.
/// After the closure completes, the previous context is restored.
pub(crate) fn enter_context<R>(pool: PoolHandle, f: impl FnOnce() -> R) -> R {
    CURRENT_POOL.with(|p| {
        let prev = p.replace(Some(pool));

        let out = f();

        p.replace(prev);

        out
    })
}

/// Returns the pool of the current runtime, or the process-wide pool.
pub(crate) fn current_pool() -> PoolHandle {
    CURRENT_POOL
        .with(|p| p.borrow().clone())
        .unwrap_or_else(|| {
            GLOBAL_POOL
                .get_or_init(|| {
                    Arc::new(BlockingPool::new(
                        default_blocking_threads(),
                        DEFAULT_THREAD_NAME,
                    ))
                })
                .clone()
        })
}
