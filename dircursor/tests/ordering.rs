mod common;

use common::TestDir;
use dircursor::fs::DirHandle;
use dircursor::{RuntimeBuilder, join};

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[dircursor::test]
async fn reads_apply_in_issuance_order_when_awaited_in_reverse() {
    let tmp = TestDir::with_files(&["a", "b", "c", "d"]);
    let dir = DirHandle::new(tmp.path_str());

    let reads: Vec<_> = (0..5).map(|_| dir.read()).collect();

    let mut results = Vec::new();
    for read in reads.into_iter().rev() {
        results.push(read.await.expect("read"));
    }
    results.reverse();

    assert!(results[4].is_none(), "last issued read must see the end");

    let names: HashSet<_> = results[..4]
        .iter()
        .map(|e| e.as_ref().expect("entry").name().to_os_string())
        .collect();
    assert_eq!(names.len(), 4);
}

#[dircursor::test]
async fn concurrent_reads_with_join_get_distinct_entries() {
    let tmp = TestDir::with_files(&["one", "two"]);
    let dir = DirHandle::new(tmp.path_str());

    let (a, b, c) = join!(dir.read(), dir.read(), dir.read());

    let a = a.expect("a").expect("entry a");
    let b = b.expect("b").expect("entry b");
    assert_ne!(a.name(), b.name());
    assert!(c.expect("c").is_none());
}

#[dircursor::test]
async fn callbacks_fire_in_issuance_order() {
    let tmp = TestDir::with_files(&["a", "b"]);
    let dir = DirHandle::new(tmp.path_str());

    let order = Arc::new(Mutex::new(Vec::new()));

    let pending: Vec<_> = (0..3)
        .map(|i| {
            let order = order.clone();
            dir.read_with(move |_| order.lock().unwrap().push(i))
        })
        .collect();

    let close_order = order.clone();
    let close = dir.close_with(move |_| close_order.lock().unwrap().push(99));

    close.await.expect("close");
    for read in pending {
        read.await.expect("read");
    }

    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 99]);
}

#[dircursor::test]
async fn dropped_read_still_consumes_its_entry() {
    let tmp = TestDir::with_files(&["only"]);
    let dir = DirHandle::new(tmp.path_str());

    drop(dir.read());

    assert!(dir.read().await.expect("read").is_none());
}

#[dircursor::test]
async fn sync_read_waits_for_pending_async_read() {
    let tmp = TestDir::with_files(&["a", "b"]);
    let dir = DirHandle::new(tmp.path_str());

    let pending = dir.read();
    let sync_entry = dir.read_sync().expect("sync").expect("sync entry");
    let async_entry = pending.await.expect("async").expect("async entry");

    assert_ne!(sync_entry.name(), async_entry.name());
    assert!(dir.read_sync().expect("end").is_none());
}

#[test]
fn reads_from_many_threads_share_one_cursor() {
    let names: Vec<String> = (0..32).map(|i| format!("f{}", i)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let tmp = TestDir::with_files(&refs);

    let dir = Arc::new(DirHandle::new(tmp.path_str()));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let threads: Vec<_> = (0..4)
        .map(|_| {
            let dir = dir.clone();
            let seen = seen.clone();

            std::thread::spawn(move || {
                let rt = RuntimeBuilder::new().blocking_threads(1).build();

                rt.block_on(async {
                    while let Some(entry) = dir.read().await.expect("read") {
                        seen.lock().unwrap().push(entry.name().to_os_string());
                    }
                });
            })
        })
        .collect();

    for t in threads {
        t.join().expect("reader thread");
    }

    let seen = seen.lock().unwrap();
    let unique: HashSet<_> = seen.iter().collect();
    assert_eq!(seen.len(), names.len());
    assert_eq!(unique.len(), names.len());
}
