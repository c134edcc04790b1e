//! Directory handles.
//!
//! This module provides a handle over a single directory stream with one
//! serialized read cursor, usable from blocking code and from async code
//! alike.
//!
//! It exposes:
//! - [`DirHandle`], the handle itself,
//! - [`DirEntry`] and [`FileType`], the values it produces,
//! - [`Entries`] and [`EntriesSync`], single-pass iterators over a handle,
//! - [`opendir`] and [`opendir_sync`], which open the stream eagerly.
//!
//! Blocking system calls never run on the thread polling a future; they
//! are handed to the runtime's blocking pool.

mod cursor;
mod dir;
mod entries;
mod entry;
mod stream;

pub use dir::{DirHandle, opendir, opendir_sync};
pub use entries::{Entries, EntriesSync};
pub use entry::{DirEntry, FileType};
