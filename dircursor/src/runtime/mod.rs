//! Core runtime components.
//!
//! This module contains the execution machinery behind directory handles:
//! a current-thread `block_on` entry point and a pool of threads on which
//! blocking directory calls run.
//!
//! It is responsible for:
//! - driving futures to completion by parking the calling thread,
//! - running blocking system calls off the polling thread,
//! - providing a thread-local runtime context so handles find the pool.
//!
//! Most users will interact with higher-level APIs built on top of
//! these components rather than using this module directly.

mod blocking;
mod core;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod park;

pub mod task;

pub use self::core::Runtime;
