//! Blocking task primitives.
//!
//! This module lets async code hand a blocking closure to a thread pool
//! and await its result.
//!
//! It includes:
//! - [`spawn_blocking`], which queues a closure on the current pool,
//! - [`JoinHandle`], the future resolving to the closure's result.
//!
//! Inside [`Runtime::block_on`](crate::Runtime::block_on) the runtime's own
//! pool is used; anywhere else a process-wide pool is created on first use.

pub(crate) mod core;
pub(crate) mod handle;

pub use self::core::spawn_blocking;
pub use handle::JoinHandle;
