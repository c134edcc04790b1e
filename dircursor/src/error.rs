use std::io;
use std::str::Utf8Error;

use thiserror::Error;

/// Errors reported by directory handles.
///
/// Every failure is reported to the caller of the operation that
/// triggered it; nothing is retried automatically.
#[derive(Debug, Error)]
pub enum DirError {
    /// The byte path given at construction is not valid UTF-8.
    #[error("directory path is not valid UTF-8: {0}")]
    Decode(#[from] Utf8Error),

    /// The directory stream could not be opened.
    ///
    /// Surfaced by the first read (or an eager open), never by
    /// construction.
    #[error("failed to open directory `{path}`: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Reading the next entry failed after the stream was opened.
    ///
    /// The handle is not marked exhausted by this error.
    #[error("failed to read directory entry: {0}")]
    Read(#[source] io::Error),

    /// The handle was closed before this read was applied.
    #[error("directory handle is closed")]
    Closed,

    /// Closing the underlying stream failed.
    ///
    /// The handle is considered closed afterwards regardless.
    #[error("failed to close directory: {0}")]
    Close(#[source] io::Error),
}

/// Result alias for directory handle operations.
pub type Result<T> = std::result::Result<T, DirError>;

impl DirError {
    /// Returns the underlying OS error, if any.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Read(e) | Self::Close(e) => Some(e),
            Self::Decode(_) | Self::Closed => None,
        }
    }

    /// Returns `true` if this error was caused by a read after close.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl From<DirError> for io::Error {
    fn from(error: DirError) -> Self {
        match error {
            DirError::Open { source, .. } => source,
            DirError::Read(e) | DirError::Close(e) => e,
            DirError::Decode(e) => io::Error::new(io::ErrorKind::InvalidData, e),
            DirError::Closed => io::Error::other("directory handle is closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_error_keeps_os_error() {
        let err = DirError::Open {
            path: "/missing".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };

        assert_eq!(err.io_error().map(io::Error::kind), Some(io::ErrorKind::NotFound));
        assert!(err.to_string().contains("/missing"));

        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn closed_maps_to_other() {
        let err = DirError::Closed;
        assert!(err.is_closed());
        assert!(err.io_error().is_none());

        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::Other);
        assert_eq!(io_err.to_string(), "directory handle is closed");
    }

    #[test]
    fn decode_maps_to_invalid_data() {
        let bytes = vec![0xff, 0xfe];
        let utf8 = std::str::from_utf8(&bytes).unwrap_err();
        let err = DirError::from(utf8);

        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
    }
}
