use super::entry::{DirEntry, FileType};

use libc::{AT_SYMLINK_NOFOLLOW, DIR, DT_UNKNOWN, c_int};
use log::{debug, trace, warn};
use std::ffi::{CStr, CString, OsStr};
use std::io;
use std::mem;
use std::os::unix::ffi::OsStrExt;
use std::ptr::NonNull;
use std::sync::Arc;

/// An open directory stream backed by `opendir(3)`.
///
/// The stream is the only owner of its `DIR*`. It is closed either
/// explicitly through `close`, which reports failures, or
/// on drop, which only logs them.
pub(crate) struct DirStream {
    /// Raw directory pointer returned by `opendir`, `None` once released.
    dir: Option<NonNull<DIR>>,

    /// Path the stream was opened from, shared with every entry.
    path: Arc<str>,
}

// Safety: the `DIR*` is owned exclusively by this value and never aliased,
// so moving it to another thread is sound. It is not `Sync`.
unsafe impl Send for DirStream {}

/// A source of directory entries driven by a cursor.
pub(crate) trait EntryStream: Send + Sized {
    /// Opens the stream for the directory at `path`.
    fn open(path: Arc<str>) -> io::Result<Self>;

    /// Pulls the next entry, or `None` at the end of the directory.
    fn next_entry(&mut self) -> io::Result<Option<DirEntry>>;

    /// Releases the stream, reporting any failure.
    fn close(self) -> io::Result<()>;
}

impl EntryStream for DirStream {
    /// Opens a directory stream.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the path contains a NUL byte, or the OS
    /// error reported by `opendir` (missing path, not a directory,
    /// permission denied...).
    fn open(path: Arc<str>) -> io::Result<Self> {
        let c_path = CString::new(path.as_bytes())?;

        let dir = NonNull::new(unsafe { libc::opendir(c_path.as_ptr()) })
            .ok_or_else(io::Error::last_os_error)?;

        debug!("opened directory stream `{}`", path);

        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    /// Reads the next entry, skipping `.` and `..`.
    ///
    /// Returns `Ok(None)` once the end of the directory is reached.
    /// `errno` is cleared before every `readdir` call so that the end of
    /// the stream can be told apart from a failure.
    fn next_entry(&mut self) -> io::Result<Option<DirEntry>> {
        let Some(dir) = self.dir else {
            return Err(io::Error::other("directory stream already released"));
        };

        loop {
            set_errno(0);

            let ent = unsafe { libc::readdir(dir.as_ptr()) };

            if ent.is_null() {
                let err = io::Error::last_os_error();

                return match err.raw_os_error() {
                    Some(0) | None => {
                        trace!("end of directory stream `{}`", self.path);
                        Ok(None)
                    }
                    Some(_) => Err(err),
                };
            }

            let (name, d_type) = unsafe {
                let ent = &*ent;
                (CStr::from_ptr(ent.d_name.as_ptr()), ent.d_type)
            };

            let bytes = name.to_bytes();
            if bytes == b"." || bytes == b".." {
                continue;
            }

            let file_type = if d_type == DT_UNKNOWN {
                lstat_type(dir, name)
            } else {
                FileType::from_dtype(d_type)
            };

            let name = OsStr::from_bytes(bytes).to_os_string();
            trace!("read `{}` from `{}`", name.to_string_lossy(), self.path);

            return Ok(Some(DirEntry::new(name, self.path.clone(), file_type)));
        }
    }

    /// Closes the stream, reporting any error from `closedir`.
    ///
    /// The `DIR*` is released even when an error is returned.
    fn close(mut self) -> io::Result<()> {
        self.release()
    }
}

impl DirStream {
    fn release(&mut self) -> io::Result<()> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };

        if unsafe { libc::closedir(dir.as_ptr()) } < 0 {
            return Err(io::Error::last_os_error());
        }

        debug!("closed directory stream `{}`", self.path);
        Ok(())
    }
}

impl Drop for DirStream {
    /// Closes the directory if `close` was never called.
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("failed to close directory stream `{}` on drop: {}", self.path, e);
        }
    }
}

/// Resolves the type of an entry whose `d_type` is unknown.
///
/// Uses `fstatat` relative to the stream's descriptor without
/// following symbolic links.
fn lstat_type(dir: NonNull<DIR>, name: &CStr) -> FileType {
    let fd = unsafe { libc::dirfd(dir.as_ptr()) };
    let mut stat: libc::stat = unsafe { mem::zeroed() };

    let rc = unsafe { libc::fstatat(fd, name.as_ptr(), &mut stat, AT_SYMLINK_NOFOLLOW) };

    if rc == 0 {
        FileType::from_mode(stat.st_mode)
    } else {
        FileType::Unknown
    }
}

/// Sets the calling thread's `errno`.
fn set_errno(value: c_int) {
    unsafe { *errno_location() = value };
}

#[cfg(target_os = "linux")]
unsafe fn errno_location() -> *mut c_int {
    unsafe { libc::__errno_location() }
}

#[cfg(target_os = "android")]
unsafe fn errno_location() -> *mut c_int {
    unsafe { libc::__errno() }
}

#[cfg(target_os = "macos")]
unsafe fn errno_location() -> *mut c_int {
    unsafe { libc::__error() }
}
