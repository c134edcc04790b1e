use super::cursor::Cursor;
use super::dir::{DirHandle, read_cursor};
use super::entry::DirEntry;
use crate::error::Result;
use crate::sync::Serial;
use crate::task::JoinHandle;

use std::fmt;
use std::future::{Future, poll_fn};
use std::pin::Pin;
use std::task::{Context, Poll, ready};

/// Async iterator over the remaining entries of a [`DirHandle`].
///
/// Created by [`DirHandle::entries`]. Each step issues one read on the
/// handle's cursor. The iterator ends at the end of the directory, or right
/// after yielding the first error.
///
/// It is single-pass: once the handle is exhausted, every new iterator
/// over it ends immediately. Interleaving it with direct reads on the same
/// handle splits the entries between them in issuance order.
///
/// # Examples
///
/// ```rust,ignore
/// let mut entries = dir.entries();
/// while let Some(entry) = entries.next().await {
///     let entry = entry?;
///     println!("{:?}", entry.name());
/// }
/// ```
pub struct Entries {
    cursor: Serial<Cursor>,

    /// Read currently in flight, if any.
    pending: Option<JoinHandle<Result<Option<DirEntry>>>>,

    done: bool,
}

impl Entries {
    pub(crate) fn new(cursor: Serial<Cursor>) -> Self {
        Self {
            cursor,
            pending: None,
            done: false,
        }
    }

    /// Polls for the next entry.
    ///
    /// Returns `Poll::Ready(None)` once iteration has ended.
    pub fn poll_next(&mut self, cx: &mut Context<'_>) -> Poll<Option<Result<DirEntry>>> {
        if self.done {
            return Poll::Ready(None);
        }

        let pending = self
            .pending
            .get_or_insert_with(|| read_cursor(&self.cursor));

        let result = ready!(Pin::new(pending).poll(cx));
        self.pending = None;

        match result {
            Ok(Some(entry)) => Poll::Ready(Some(Ok(entry))),
            Ok(None) => {
                self.done = true;
                Poll::Ready(None)
            }
            Err(e) => {
                self.done = true;
                Poll::Ready(Some(Err(e)))
            }
        }
    }

    /// Resolves to the next entry, or `None` once iteration has ended.
    pub async fn next(&mut self) -> Option<Result<DirEntry>> {
        poll_fn(|cx| self.poll_next(cx)).await
    }

    /// Drains the remaining entries into a vector.
    ///
    /// Stops at, and returns, the first error.
    pub async fn collect(mut self) -> Result<Vec<DirEntry>> {
        let mut out = Vec::new();

        while let Some(entry) = self.next().await {
            out.push(entry?);
        }

        Ok(out)
    }
}

impl fmt::Debug for Entries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entries")
            .field("in_flight", &self.pending.is_some())
            .field("done", &self.done)
            .finish()
    }
}

/// Blocking iterator over the remaining entries of a [`DirHandle`].
///
/// Created by [`DirHandle::entries_sync`]. Same termination rules as
/// [`Entries`].
#[derive(Debug)]
pub struct EntriesSync<'a> {
    handle: &'a DirHandle,
    done: bool,
}

impl<'a> EntriesSync<'a> {
    pub(crate) fn new(handle: &'a DirHandle) -> Self {
        Self {
            handle,
            done: false,
        }
    }
}

impl Iterator for EntriesSync<'_> {
    type Item = Result<DirEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.handle.read_sync() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for EntriesSync<'_> {}
