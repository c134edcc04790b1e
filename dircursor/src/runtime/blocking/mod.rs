//! Thread pool for blocking filesystem primitives.
//!
//! Directory streams cannot be polled for readiness, so every call that
//! may block (`opendir`, `readdir`, `closedir`) is shipped to a small pool
//! of dedicated threads instead of running on the thread driving futures.
//!
//! It consists of:
//! - [`pool`]: the shared job queue and on-demand thread spawning,
//! - [`worker`]: the loop executed by every pool thread.

pub(crate) mod pool;
pub(crate) mod worker;

pub(crate) use pool::{BlockingPool, PoolHandle};
