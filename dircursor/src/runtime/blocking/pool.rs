use super::worker;

use log::{debug, warn};
use std::collections::VecDeque;
use std::mem;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

/// A unit of work executed by the pool.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// Shared handle to a blocking pool.
pub(crate) type PoolHandle = Arc<BlockingPool>;

/// Pool of threads dedicated to blocking calls.
///
/// Threads are spawned lazily whenever queued jobs outnumber idle
/// workers, up to `max_threads`. Jobs are taken from the queue in
/// submission order.
///
/// Shutting the pool down does not discard queued jobs: workers drain
/// the queue before exiting, so a submitted job always runs.
pub(crate) struct BlockingPool {
    /// State shared with worker threads.
    shared: Arc<Shared>,

    /// Upper bound on live worker threads.
    max_threads: usize,

    /// Prefix for worker thread names.
    thread_name: String,

    /// Join handles of spawned workers.
    handles: Mutex<Vec<thread::JoinHandle<()>>>,
}

/// State shared between the pool and its workers.
pub(crate) struct Shared {
    pub(crate) inner: Mutex<Inner>,

    /// Signalled when a job is queued or on shutdown.
    pub(crate) condvar: Condvar,
}

pub(crate) struct Inner {
    /// Jobs waiting for a worker.
    pub(crate) queue: VecDeque<Job>,

    /// Number of live worker threads.
    pub(crate) threads: usize,

    /// Number of workers waiting on the condvar.
    pub(crate) idle: usize,

    /// Set once the owning runtime is dropped.
    pub(crate) shutdown: bool,

    /// Identifier for the next spawned worker.
    next_id: usize,
}

impl Shared {
    pub(crate) fn lock(&self) -> MutexGuard<'_, Inner> {
        // Jobs never run under this lock.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BlockingPool {
    /// Creates an empty pool. No thread is spawned until the first job.
    pub(crate) fn new(max_threads: usize, thread_name: impl Into<String>) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    queue: VecDeque::new(),
                    threads: 0,
                    idle: 0,
                    shutdown: false,
                    next_id: 0,
                }),
                condvar: Condvar::new(),
            }),
            max_threads: max_threads.max(1),
            thread_name: thread_name.into(),
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Queues a job.
    ///
    /// If the pool is shut down, the job runs inline on the calling thread.
    pub(crate) fn push(&self, job: Job) {
        let mut inner = self.shared.lock();

        if inner.shutdown {
            drop(inner);
            debug!("blocking pool `{}` is shut down, running job inline", self.thread_name);
            job();
            return;
        }

        inner.queue.push_back(job);

        if inner.idle > 0 {
            self.shared.condvar.notify_one();
        }

        // `idle` still counts workers that were signalled but are not awake yet.
        if inner.queue.len() <= inner.idle || inner.threads >= self.max_threads {
            return;
        }

        inner.threads += 1;
        let id = inner.next_id;
        inner.next_id += 1;
        drop(inner);

        self.spawn_worker(id);
    }

    /// Spawns a worker thread.
    ///
    /// If spawning fails and no other worker is alive, the queued jobs are
    /// run on the calling thread so that none of them is stranded.
    fn spawn_worker(&self, id: usize) {
        let shared = self.shared.clone();

        let spawned = thread::Builder::new()
            .name(format!("{}-{}", self.thread_name, id))
            .spawn(move || worker::run(id, shared));

        match spawned {
            Ok(handle) => {
                self.handles
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(handle);
            }
            Err(e) => {
                warn!("failed to spawn blocking worker `{}-{}`: {}", self.thread_name, id, e);

                let orphaned = {
                    let mut inner = self.shared.lock();
                    inner.threads -= 1;

                    if inner.threads == 0 {
                        mem::take(&mut inner.queue)
                    } else {
                        VecDeque::new()
                    }
                };

                for job in orphaned {
                    job();
                }
            }
        }
    }

    /// Stops the pool.
    ///
    /// Workers finish every queued job, then exit and are joined.
    pub(crate) fn shutdown(&self) {
        self.shared.lock().shutdown = true;
        self.shared.condvar.notify_all();

        let handles = mem::take(&mut *self.handles.lock().unwrap_or_else(PoisonError::into_inner));

        for handle in handles {
            let _ = handle.join();
        }
    }

    /// Number of live worker threads.
    #[cfg(test)]
    pub(crate) fn threads(&self) -> usize {
        self.shared.lock().threads
    }

    /// Number of workers waiting for a job.
    #[cfg(test)]
    pub(crate) fn idle(&self) -> usize {
        self.shared.lock().idle
    }
}

impl Drop for BlockingPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
