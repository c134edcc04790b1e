mod common;

use common::TestDir;
use dircursor::fs::DirHandle;

use std::collections::HashSet;
use std::ffi::OsString;

fn expected(names: &[&str]) -> HashSet<OsString> {
    names.iter().copied().map(OsString::from).collect()
}

#[dircursor::test]
async fn iterates_over_every_entry() {
    let tmp = TestDir::with_files(&["foo.txt", "bar.txt"]);
    let dir = DirHandle::new(tmp.path_str());

    let mut names = HashSet::new();
    let mut entries = dir.entries();
    while let Some(entry) = entries.next().await {
        names.insert(entry.expect("entry").name().to_os_string());
    }

    assert_eq!(names, expected(&["foo.txt", "bar.txt"]));
    assert!(entries.next().await.is_none());

    dir.close().await.expect("close");
}

#[dircursor::test]
async fn second_pass_is_empty() {
    let tmp = TestDir::with_files(&["foo.txt", "bar.txt"]);
    let dir = DirHandle::new(tmp.path_str());

    let first = dir.entries().collect().await.expect("first pass");
    assert_eq!(first.len(), 2);

    let second = dir.entries().collect().await.expect("second pass");
    assert!(second.is_empty());
}

#[dircursor::test]
async fn iteration_continues_after_direct_reads() {
    let tmp = TestDir::with_files(&["a", "b", "c"]);
    let dir = DirHandle::new(tmp.path_str());

    let head = dir.read().await.expect("read").expect("entry");
    let rest = dir.entries().collect().await.expect("rest");

    let mut names: HashSet<_> = rest.iter().map(|e| e.name().to_os_string()).collect();
    assert_eq!(rest.len(), 2);
    assert!(names.insert(head.name().to_os_string()));
    assert_eq!(names, expected(&["a", "b", "c"]));
}

#[test]
fn sync_iteration() {
    let tmp = TestDir::with_files(&["foo.txt", "bar.txt"]);
    let dir = DirHandle::new(tmp.path_str());

    let names = dir
        .entries_sync()
        .map(|entry| entry.map(|e| e.name().to_os_string()))
        .collect::<dircursor::Result<HashSet<_>>>()
        .expect("iterate");

    assert_eq!(names, expected(&["foo.txt", "bar.txt"]));
    assert_eq!(dir.entries_sync().count(), 0);

    dir.close_sync().expect("close");
}

#[test]
fn sync_iteration_stops_after_error() {
    let tmp = TestDir::new();
    let dir = DirHandle::new(tmp.path().join("missing").to_string_lossy().into_owned());

    let mut entries = dir.entries_sync();
    assert!(matches!(entries.next(), Some(Err(_))));
    assert!(entries.next().is_none());
}

#[dircursor::test]
async fn opendir_then_iterate() {
    let tmp = TestDir::with_files(&["x", "y"]);

    let dir = dircursor::fs::opendir(tmp.path_str()).await.expect("opendir");
    let names: HashSet<_> = dir
        .entries()
        .collect()
        .await
        .expect("collect")
        .into_iter()
        .map(|e| e.name().to_os_string())
        .collect();

    assert_eq!(names, expected(&["x", "y"]));
    dir.close().await.expect("close");
}

#[test]
fn opendir_sync_reports_missing_path_immediately() {
    let tmp = TestDir::new();
    let missing = tmp.path().join("nope").to_string_lossy().into_owned();

    let err = dircursor::fs::opendir_sync(missing).expect_err("opendir");
    assert_eq!(
        err.io_error().map(std::io::Error::kind),
        Some(std::io::ErrorKind::NotFound)
    );

    let dir = dircursor::fs::opendir_sync(tmp.path_str()).expect("opendir");
    assert!(dir.read_sync().expect("read").is_none());
}
