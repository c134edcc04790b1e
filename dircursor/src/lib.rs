//! # dircursor
//!
//! **dircursor** reads directories one entry at a time through a handle
//! that owns a single directory stream and a single read cursor.
//!
//! The same handle can be read synchronously, through futures, or through
//! callbacks, and iterated until exhaustion. Whatever the calling
//! convention, operations are applied to the cursor in the order they were
//! issued, the end of the directory is reported exactly once, and closing
//! is idempotent and waits for reads issued before it.
//!
//! It offers:
//!
//! - **Directory handles** with lazy opening and explicit close
//! - **Sync, async and callback reads** over one consistent cursor
//! - **Single-pass iteration**, async and blocking
//! - **A small runtime** that keeps blocking system calls off the
//!   polling thread
//! - **Ergonomic macros** like `#[dircursor::main]`, `#[dircursor::test]`
//!   and `join!`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dircursor::fs::DirHandle;
//!
//! #[dircursor::main]
//! async fn main() -> dircursor::Result<()> {
//!     let dir = DirHandle::new(".");
//!
//!     while let Some(entry) = dir.read().await? {
//!         println!("{}", entry.name().to_string_lossy());
//!     }
//!
//!     dir.close().await
//! }
//! ```
//!
//! ## Modules
//!
//! - [`fs`]: directory handles, entries and iterators
//! - [`sync`]: the issuance-ordered queue behind each cursor
//! - [`task`]: running blocking closures off the polling thread
//! - [`error`]: error type shared by every operation

#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "macos")))]
compile_error!("dircursor supports Linux, Android and macOS only");

mod runtime;

pub mod error;
pub mod fs;
pub mod sync;

pub use error::{DirError, Result};
pub use runtime::Runtime;
pub use runtime::builder::RuntimeBuilder;
pub use runtime::task;

pub use dircursor_macros::*;
