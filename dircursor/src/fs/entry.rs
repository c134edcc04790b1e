use libc::{
    DT_BLK, DT_CHR, DT_DIR, DT_FIFO, DT_LNK, DT_REG, DT_SOCK, S_IFBLK, S_IFCHR, S_IFDIR, S_IFIFO,
    S_IFLNK, S_IFMT, S_IFREG, S_IFSOCK, mode_t,
};

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::sync::Arc;

/// The type of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    BlockDevice,
    CharDevice,
    Directory,
    Fifo,
    Symlink,
    RegularFile,
    Socket,
    /// The filesystem did not report a type and `lstat` failed.
    Unknown,
}

impl FileType {
    /// Converts a `d_type` value from `readdir`.
    ///
    /// `DT_UNKNOWN` (and anything unexpected) maps to [`FileType::Unknown`].
    pub(crate) const fn from_dtype(d_type: u8) -> Self {
        match d_type {
            DT_DIR => Self::Directory,
            DT_REG => Self::RegularFile,
            DT_BLK => Self::BlockDevice,
            DT_CHR => Self::CharDevice,
            DT_FIFO => Self::Fifo,
            DT_LNK => Self::Symlink,
            DT_SOCK => Self::Socket,
            _ => Self::Unknown,
        }
    }

    /// Converts the `st_mode` of a `stat` result.
    pub(crate) const fn from_mode(mode: mode_t) -> Self {
        match mode & S_IFMT {
            S_IFDIR => Self::Directory,
            S_IFREG => Self::RegularFile,
            S_IFBLK => Self::BlockDevice,
            S_IFCHR => Self::CharDevice,
            S_IFIFO => Self::Fifo,
            S_IFLNK => Self::Symlink,
            S_IFSOCK => Self::Socket,
            _ => Self::Unknown,
        }
    }
}

/// A single entry produced by a directory handle.
///
/// Entries are plain values: they hold no reference to the underlying
/// stream and stay valid after the handle is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// File name, exactly as returned by the OS.
    name: OsString,

    /// Path of the directory the entry was read from.
    parent: Arc<str>,

    file_type: FileType,
}

impl DirEntry {
    pub(crate) fn new(name: OsString, parent: Arc<str>, file_type: FileType) -> Self {
        Self {
            name,
            parent,
            file_type,
        }
    }

    /// Returns the file name of this entry, without any leading path.
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// Returns the path of the directory this entry was read from.
    pub fn parent_path(&self) -> &str {
        &self.parent
    }

    /// Returns the full path of this entry.
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&*self.parent).join(&self.name)
    }

    /// Returns the type of this entry.
    ///
    /// Symbolic links are reported as such and never followed.
    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Returns `true` if this entry is a regular file.
    pub fn is_file(&self) -> bool {
        self.file_type == FileType::RegularFile
    }

    /// Returns `true` if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }

    /// Returns `true` if this entry is a symbolic link.
    pub fn is_symlink(&self) -> bool {
        self.file_type == FileType::Symlink
    }

    /// Returns `true` if this entry is a named pipe.
    pub fn is_fifo(&self) -> bool {
        self.file_type == FileType::Fifo
    }

    /// Returns `true` if this entry is a Unix domain socket.
    pub fn is_socket(&self) -> bool {
        self.file_type == FileType::Socket
    }

    /// Returns `true` if this entry is a block device.
    pub fn is_block_device(&self) -> bool {
        self.file_type == FileType::BlockDevice
    }

    /// Returns `true` if this entry is a character device.
    pub fn is_char_device(&self) -> bool {
        self.file_type == FileType::CharDevice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dtype_mapping() {
        assert_eq!(FileType::from_dtype(DT_DIR), FileType::Directory);
        assert_eq!(FileType::from_dtype(DT_REG), FileType::RegularFile);
        assert_eq!(FileType::from_dtype(DT_LNK), FileType::Symlink);
        assert_eq!(FileType::from_dtype(libc::DT_UNKNOWN), FileType::Unknown);
    }

    #[test]
    fn mode_mapping_ignores_permission_bits() {
        assert_eq!(FileType::from_mode(S_IFDIR | 0o755), FileType::Directory);
        assert_eq!(FileType::from_mode(S_IFREG | 0o644), FileType::RegularFile);
        assert_eq!(FileType::from_mode(S_IFSOCK), FileType::Socket);
    }

    #[test]
    fn path_joins_parent_and_name() {
        let entry = DirEntry::new("foo.txt".into(), Arc::from("/tmp/dir"), FileType::RegularFile);

        assert_eq!(entry.name(), "foo.txt");
        assert_eq!(entry.parent_path(), "/tmp/dir");
        assert_eq!(entry.path(), PathBuf::from("/tmp/dir/foo.txt"));
        assert!(entry.is_file());
        assert!(!entry.is_dir());
    }
}
