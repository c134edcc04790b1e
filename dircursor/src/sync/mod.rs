//! Synchronization primitives.
//!
//! This module provides the queue that serializes every operation on a
//! directory handle's cursor.
//!
//! The current primitives include:
//! - [`Serial`]: runs closures against a value one at a time, in the
//!   order they were submitted.
//!
//! ## Design notes
//!
//! - A closure's place in line is fixed when it is submitted, not when its
//!   handle is first polled.
//! - Submitted closures make progress on the blocking pool on their own,
//!   so handles may be awaited in any order, or not at all.
//! - Pool threads never wait for a turn: the queue is drained by a single
//!   job at a time.

mod serial;

pub use serial::Serial;
