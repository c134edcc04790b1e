use super::Runtime;

use std::thread;

/// Name prefix given to blocking worker threads by default.
pub(crate) const DEFAULT_THREAD_NAME: &str = "dircursor-blocking";

/// Default upper bound on blocking worker threads.
///
/// Falls back to `1` if the number of logical CPUs is unavailable.
pub(crate) fn default_blocking_threads() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Builder for configuring and creating a runtime.
///
/// `RuntimeBuilder` allows customizing runtime parameters before
/// constructing the runtime: the maximum number of threads used for
/// blocking directory calls and the name given to those threads.
///
/// # Examples
///
/// ```rust,ignore
/// let runtime = RuntimeBuilder::new()
///     .blocking_threads(4)
///     .thread_name("dir-io")
///     .build();
/// ```
pub struct RuntimeBuilder {
    /// Maximum number of blocking worker threads.
    blocking_threads: usize,

    /// Prefix for worker thread names.
    thread_name: String,
}

impl RuntimeBuilder {
    /// Creates a new `RuntimeBuilder` with default configuration.
    ///
    /// By default, the number of blocking threads is set to the number
    /// of available logical CPUs, falling back to `1` if unavailable.
    pub fn new() -> Self {
        Self {
            blocking_threads: default_blocking_threads(),
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
        }
    }

    /// Sets the maximum number of blocking worker threads.
    ///
    /// Threads are only spawned when work is queued and no idle
    /// worker is available.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn blocking_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "blocking_threads must be > 0");

        self.blocking_threads = n;
        self
    }

    /// Sets the name prefix of blocking worker threads.
    ///
    /// Each thread is named `{prefix}-{id}`.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Builds the runtime with the configured options.
    ///
    /// No thread is started until the first blocking job is queued.
    pub fn build(self) -> Runtime {
        Runtime::new(self.blocking_threads, self.thread_name)
    }
}

impl Default for RuntimeBuilder {
    /// Creates a default `RuntimeBuilder`.
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "blocking_threads must be > 0")]
    fn zero_threads_rejected() {
        let _ = RuntimeBuilder::new().blocking_threads(0);
    }

    #[test]
    fn defaults_are_sane() {
        let builder = RuntimeBuilder::default();
        assert!(builder.blocking_threads >= 1);
        assert_eq!(builder.thread_name, DEFAULT_THREAD_NAME);
    }
}
