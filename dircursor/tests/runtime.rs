use dircursor::task::spawn_blocking;
use dircursor::{RuntimeBuilder, join};

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

#[test]
fn block_on_returns_value() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async { 42 });
    assert_eq!(result, 42);
}

#[test]
fn spawn_blocking_runs_off_the_calling_thread() {
    let rt = RuntimeBuilder::new().blocking_threads(2).build();
    let caller = thread::current().id();

    let worker = rt.block_on(async { spawn_blocking(|| thread::current().id()).await });
    assert_ne!(worker, caller);
}

#[test]
fn blocking_threads_use_configured_name() {
    let rt = RuntimeBuilder::new()
        .blocking_threads(1)
        .thread_name("dir-io")
        .build();

    let name = rt.block_on(rt.spawn_blocking(|| thread::current().name().map(str::to_owned)));
    assert_eq!(name.as_deref(), Some("dir-io-0"));
}

#[test]
fn blocking_pool_never_exceeds_its_cap() {
    let rt = RuntimeBuilder::new().blocking_threads(2).build();
    let names = Arc::new(Mutex::new(HashSet::new()));

    rt.block_on(async {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let names = names.clone();
                spawn_blocking(move || {
                    let name = thread::current().name().map(str::to_owned);
                    names.lock().unwrap().insert(name);
                    thread::sleep(std::time::Duration::from_millis(2));
                })
            })
            .collect();

        for h in handles {
            h.await;
        }
    });

    let names = names.lock().unwrap();
    assert!(!names.is_empty());
    assert!(names.len() <= 2);
}

#[test]
fn blocking_jobs_run_in_parallel_up_to_cap() {
    let rt = RuntimeBuilder::new().blocking_threads(3).build();
    let barrier = Arc::new(Barrier::new(3));

    let total = rt.block_on(async {
        let handles: Vec<_> = (0..3)
            .map(|i| {
                let barrier = barrier.clone();
                spawn_blocking(move || {
                    barrier.wait();
                    i
                })
            })
            .collect();

        let mut total = 0;
        for h in handles {
            total += h.await;
        }
        total
    });

    assert_eq!(total, 3);
}

#[test]
#[should_panic(expected = "boom")]
fn panic_in_blocking_job_propagates() {
    let rt = RuntimeBuilder::new().build();

    rt.block_on(async {
        spawn_blocking(|| panic!("boom")).await;
    });
}

#[test]
fn dropping_runtime_finishes_queued_jobs() {
    let counter = Arc::new(AtomicUsize::new(0));

    {
        let rt = RuntimeBuilder::new().blocking_threads(1).build();
        for _ in 0..8 {
            let counter = counter.clone();
            drop(rt.spawn_blocking(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }
    }

    assert_eq!(counter.load(Ordering::SeqCst), 8);
}

#[test]
fn join_two_futures() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let (a, b) = join!(async { 10 }, async { 20 });
        (a, b)
    });

    assert_eq!(result, (10, 20));
}

#[test]
fn join_single_future() {
    let rt = RuntimeBuilder::new().build();

    let a = rt.block_on(async { join!(async { "only" }) });
    assert_eq!(a, "only");
}

#[dircursor::test(blocking_threads = 1)]
async fn test_macro_accepts_blocking_threads() {
    let (a, b) = join!(spawn_blocking(|| 1), spawn_blocking(|| 2));
    assert_eq!(a + b, 3);
}

#[dircursor::test]
async fn test_macro_can_return_result() -> dircursor::Result<()> {
    let tmp = std::env::temp_dir();
    let dir = dircursor::fs::opendir(tmp.to_string_lossy().into_owned()).await?;
    dir.close().await
}
