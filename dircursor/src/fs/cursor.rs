use super::entry::DirEntry;
use super::stream::{DirStream, EntryStream};
use crate::error::{DirError, Result};

use std::mem;
use std::sync::Arc;

/// Position of a handle over its directory stream.
///
/// ```text
/// Unopened --(read)--> Open --(end of stream)--> Exhausted
/// Unopened | Open | Exhausted --(close)--> Closed
/// ```
///
/// A stream can only exist in `Open` or `Exhausted`, so an exhausted
/// handle is always one that was opened.
pub(crate) enum State<S = DirStream> {
    Unopened,
    Open(S),
    /// End of stream reached. The stream stays open until closed.
    Exhausted(S),
    Closed,
}

/// The single read cursor of a directory handle.
///
/// Every operation is a plain blocking call; the handle runs them one at
/// a time through its [`Serial`](crate::sync::Serial) queue.
pub(crate) struct Cursor<S = DirStream> {
    path: Arc<str>,
    state: State<S>,
}

impl<S: EntryStream> Cursor<S> {
    pub(crate) fn new(path: Arc<str>) -> Self {
        Self {
            path,
            state: State::Unopened,
        }
    }

    /// Answers a read without touching the stream, if possible.
    ///
    /// Returns `None` when the read needs I/O (open and/or pull).
    pub(crate) fn settled_read(&self) -> Option<Result<Option<DirEntry>>> {
        match self.state {
            State::Closed => Some(Err(DirError::Closed)),
            State::Exhausted(_) => Some(Ok(None)),
            State::Unopened | State::Open(_) => None,
        }
    }

    /// Answers a close without touching the stream, if possible.
    ///
    /// Closing a handle that never opened its stream only flips the state.
    pub(crate) fn settled_close(&mut self) -> Option<Result<()>> {
        match self.state {
            State::Closed => Some(Ok(())),
            State::Unopened => {
                self.state = State::Closed;
                Some(Ok(()))
            }
            State::Open(_) | State::Exhausted(_) => None,
        }
    }

    /// Opens the stream if it is not open yet.
    ///
    /// On failure the cursor stays `Unopened`, so a later call retries.
    pub(crate) fn open(&mut self) -> Result<()> {
        match self.state {
            State::Unopened => {
                let stream = S::open(self.path.clone()).map_err(|source| DirError::Open {
                    path: self.path.to_string(),
                    source,
                })?;
                self.state = State::Open(stream);
                Ok(())
            }
            State::Open(_) | State::Exhausted(_) => Ok(()),
            State::Closed => Err(DirError::Closed),
        }
    }

    /// Advances the cursor by one entry.
    ///
    /// Opens the stream lazily. The end of the stream moves the cursor to
    /// `Exhausted` and is reported exactly once as `Ok(None)`; every later
    /// read short-circuits. A pull failure leaves the state untouched.
    pub(crate) fn read(&mut self) -> Result<Option<DirEntry>> {
        if let Some(settled) = self.settled_read() {
            return settled;
        }

        self.open()?;

        let State::Open(stream) = &mut self.state else {
            return Ok(None);
        };

        match stream.next_entry().map_err(DirError::Read)? {
            Some(entry) => Ok(Some(entry)),
            None => {
                if let State::Open(stream) = mem::replace(&mut self.state, State::Closed) {
                    self.state = State::Exhausted(stream);
                }
                Ok(None)
            }
        }
    }

    /// Closes the cursor.
    ///
    /// The cursor is `Closed` afterwards even if `closedir` fails, so a
    /// failed close is never retried implicitly.
    pub(crate) fn close(&mut self) -> Result<()> {
        if let Some(settled) = self.settled_close() {
            return settled;
        }

        match mem::replace(&mut self.state, State::Closed) {
            State::Open(stream) | State::Exhausted(stream) => {
                stream.close().map_err(DirError::Close)
            }
            State::Unopened | State::Closed => Ok(()),
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &State<S> {
        &self.state
    }
}
