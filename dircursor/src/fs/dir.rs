use super::cursor::Cursor;
use super::entries::{Entries, EntriesSync};
use super::entry::DirEntry;
use crate::error::Result;
use crate::sync::Serial;
use crate::task::JoinHandle;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A handle over one directory stream with a single read cursor.
///
/// `DirHandle` reads the entries of a directory one at a time, either
/// synchronously ([`read_sync`](Self::read_sync)) or asynchronously
/// ([`read`](Self::read), [`read_with`](Self::read_with)), and can be
/// iterated until exhaustion ([`entries`](Self::entries)).
///
/// Construction is pure: the directory is opened by the first read, so a
/// missing path is reported there. Closing a handle whose stream was never
/// opened simply marks it closed.
///
/// # Ordering
///
/// Every operation takes its place in line when the method is *called*,
/// not when the returned future is first polled. Operations are applied to
/// the cursor strictly in that order, whichever API they come from, and
/// the returned futures may be awaited in any order. A close therefore
/// waits for every read issued before it, and every read issued after it
/// fails with [`DirError::Closed`](crate::DirError::Closed).
///
/// # Blocking
///
/// The `*_sync` methods run on the calling thread when nothing else is
/// pending on the handle, and otherwise park it until the operations
/// issued before them have been applied.
///
/// # Examples
///
/// ```rust,ignore
/// let dir = DirHandle::new("/tmp");
///
/// while let Some(entry) = dir.read().await? {
///     println!("{}", entry.name().to_string_lossy());
/// }
///
/// dir.close().await?;
/// ```
pub struct DirHandle {
    /// Directory path, decoded once at construction.
    path: Arc<str>,

    /// The read cursor, shared with in-flight operations.
    cursor: Serial<Cursor>,
}

impl DirHandle {
    /// Creates a handle for the directory at `path`.
    ///
    /// The filesystem is not touched.
    pub fn new(path: impl Into<String>) -> Self {
        let path: Arc<str> = Arc::from(path.into());

        Self {
            cursor: Serial::new(Cursor::new(path.clone())),
            path,
        }
    }

    /// Creates a handle from a UTF-8 encoded path.
    ///
    /// The bytes are decoded once; [`path`](Self::path) returns exactly the
    /// text that [`new`](Self::new) would have stored for the same string.
    ///
    /// # Errors
    ///
    /// Returns [`DirError::Decode`](crate::DirError::Decode) if the bytes
    /// are not valid UTF-8.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self> {
        let path = std::str::from_utf8(bytes.as_ref())?;
        Ok(Self::new(path))
    }

    /// Returns the path this handle was created with.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Reads the next entry, blocking the current thread.
    ///
    /// Returns `Ok(None)` once every entry has been read; all later reads
    /// return `Ok(None)` again without touching the stream.
    ///
    /// # Errors
    ///
    /// - [`Closed`](crate::DirError::Closed) if the handle was closed,
    /// - [`Open`](crate::DirError::Open) if the directory cannot be opened,
    /// - [`Read`](crate::DirError::Read) if reading the entry failed.
    pub fn read_sync(&self) -> Result<Option<DirEntry>> {
        self.cursor.run_blocking(|cursor: &mut Cursor| cursor.read())
    }

    /// Reads the next entry without blocking the caller.
    ///
    /// Same results as [`read_sync`](Self::read_sync). Closed and exhausted
    /// handles are answered right away; opening and reading the stream
    /// happen on the blocking pool.
    ///
    /// The read is queued when this method is called. It runs even if the
    /// returned future is dropped or never polled.
    pub fn read(
        &self,
    ) -> impl Future<Output = Result<Option<DirEntry>>> + Send + 'static + use<> {
        read_cursor(&self.cursor)
    }

    /// Reads the next entry and reports it to `callback` as well.
    ///
    /// The callback is invoked exactly once, with the same value the
    /// returned future then resolves to. It runs as soon as the read
    /// completes, on the blocking pool, or on the calling thread when the
    /// handle is already closed or exhausted. The callback may use this
    /// handle again, including through the `*_sync` methods.
    pub fn read_with<F>(
        &self,
        callback: F,
    ) -> impl Future<Output = Result<Option<DirEntry>>> + Send + 'static + use<F>
    where
        F: FnOnce(&Result<Option<DirEntry>>) + Send + 'static,
    {
        if let Some(settled) = self.cursor.try_now(|cursor| cursor.settled_read()).flatten() {
            callback(&settled);
            return JoinHandle::ready(settled);
        }

        self.cursor
            .submit_with(|cursor: &mut Cursor| cursor.read(), callback)
    }

    /// Closes the handle, blocking the current thread.
    ///
    /// Closing an already closed handle succeeds. If closing the stream
    /// fails the error is returned, but the handle is closed anyway.
    pub fn close_sync(&self) -> Result<()> {
        self.cursor.run_blocking(|cursor: &mut Cursor| cursor.close())
    }

    /// Closes the handle without blocking the caller.
    ///
    /// Same results as [`close_sync`](Self::close_sync). A handle whose
    /// stream was never opened is closed on the calling thread.
    pub fn close(&self) -> impl Future<Output = Result<()>> + Send + 'static + use<> {
        if let Some(settled) = self.cursor.try_now(Cursor::settled_close).flatten() {
            return JoinHandle::ready(settled);
        }

        self.cursor.submit(|cursor: &mut Cursor| cursor.close())
    }

    /// Closes the handle and reports the outcome to `callback` as well.
    ///
    /// See [`read_with`](Self::read_with) for the delivery rules.
    pub fn close_with<F>(
        &self,
        callback: F,
    ) -> impl Future<Output = Result<()>> + Send + 'static + use<F>
    where
        F: FnOnce(&Result<()>) + Send + 'static,
    {
        if let Some(settled) = self.cursor.try_now(Cursor::settled_close).flatten() {
            callback(&settled);
            return JoinHandle::ready(settled);
        }

        self.cursor
            .submit_with(|cursor: &mut Cursor| cursor.close(), callback)
    }

    /// Returns an async iterator over the remaining entries.
    ///
    /// The iterator shares this handle's cursor: it is single-pass and
    /// cannot be restarted. Iterating an exhausted handle ends at once.
    pub fn entries(&self) -> Entries {
        Entries::new(self.cursor.clone())
    }

    /// Returns a blocking iterator over the remaining entries.
    ///
    /// Same rules as [`entries`](Self::entries).
    pub fn entries_sync(&self) -> EntriesSync<'_> {
        EntriesSync::new(self)
    }

    /// Opens the stream now instead of on the first read.
    pub(crate) fn open_sync(&self) -> Result<()> {
        self.cursor.run_blocking(|cursor: &mut Cursor| cursor.open())
    }

    /// Opens the stream on the blocking pool.
    pub(crate) fn open(
        &self,
    ) -> impl Future<Output = Result<()>> + Send + 'static + use<> {
        self.cursor.submit(|cursor: &mut Cursor| cursor.open())
    }
}

/// Queues one read on the cursor.
///
/// Settled reads are answered without going through the pool.
pub(crate) fn read_cursor(cursor: &Serial<Cursor>) -> JoinHandle<Result<Option<DirEntry>>> {
    if let Some(settled) = cursor.try_now(|cursor| cursor.settled_read()).flatten() {
        return JoinHandle::ready(settled);
    }

    cursor.submit(|cursor: &mut Cursor| cursor.read())
}

impl fmt::Debug for DirHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirHandle").field("path", &self.path).finish()
    }
}

impl From<&str> for DirHandle {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for DirHandle {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl TryFrom<&[u8]> for DirHandle {
    type Error = crate::DirError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl TryFrom<Vec<u8>> for DirHandle {
    type Error = crate::DirError;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

/// Creates a handle and opens its directory stream right away.
///
/// Unlike [`DirHandle::new`], a missing or unreadable directory is
/// reported here rather than by the first read.
///
/// # Examples
///
/// ```rust,ignore
/// let dir = dircursor::fs::opendir("/tmp").await?;
/// let mut entries = dir.entries();
/// while let Some(entry) = entries.next().await {
///     println!("{:?}", entry?.name());
/// }
/// ```
pub fn opendir(path: impl Into<String>) -> impl Future<Output = Result<DirHandle>> + Send + 'static {
    let handle = DirHandle::new(path);
    let open = handle.open();

    async move {
        open.await?;
        Ok(handle)
    }
}

/// Blocking counterpart of [`opendir`].
pub fn opendir_sync(path: impl Into<String>) -> Result<DirHandle> {
    let handle = DirHandle::new(path);
    handle.open_sync()?;
    Ok(handle)
}
