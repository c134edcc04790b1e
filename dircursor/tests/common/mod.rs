#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn unique_temp_base() -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let base = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let pid = std::process::id();
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);

    base.join(format!("dircursor_test_{}_{}_{}", pid, nanos, seq))
}

/// A scratch directory removed on drop.
pub struct TestDir {
    path: PathBuf,
}

impl TestDir {
    /// Creates an empty scratch directory.
    pub fn new() -> Self {
        let path = unique_temp_base();
        fs::create_dir_all(&path).expect("create scratch dir");
        Self { path }
    }

    /// Creates a scratch directory holding empty files with these names.
    pub fn with_files(names: &[&str]) -> Self {
        let dir = Self::new();
        for name in names {
            fs::write(dir.path.join(name), b"").expect("create file");
        }
        dir
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn path_str(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
