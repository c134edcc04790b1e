use super::pool::Shared;

use log::debug;
use std::sync::{Arc, PoisonError};

/// Runs the worker loop until the pool shuts down and its queue is empty.
///
/// # Execution loop
///
/// - Pop the oldest job and run it without holding the queue lock
/// - Otherwise exit if shutdown was requested
/// - Otherwise wait on the condvar
pub(crate) fn run(id: usize, shared: Arc<Shared>) {
    debug!("blocking worker {} started", id);

    loop {
        let job = {
            let mut inner = shared.lock();

            loop {
                if let Some(job) = inner.queue.pop_front() {
                    break Some(job);
                }

                if inner.shutdown {
                    break None;
                }

                inner.idle += 1;
                inner = shared
                    .condvar
                    .wait(inner)
                    .unwrap_or_else(PoisonError::into_inner);
                inner.idle -= 1;
            }
        };

        match job {
            Some(job) => job(),
            None => break,
        }
    }

    shared.lock().threads -= 1;
    debug!("blocking worker {} exiting", id);
}
