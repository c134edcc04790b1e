use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};
use std::thread::{self, Thread};

/// Waker that unparks the thread driving a future.
struct ThreadWaker(Thread);

impl Wake for ThreadWaker {
    fn wake(self: Arc<Self>) {
        self.0.unpark();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.0.unpark();
    }
}

/// Drives a future to completion on the current thread.
///
/// The thread is parked between polls and unparked by the future's waker.
/// Spurious unparks only cause an extra poll.
pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
    let mut future = pin!(future);

    let waker = Waker::from(Arc::new(ThreadWaker(thread::current())));
    let mut cx = Context::from_waker(&waker);

    loop {
        match future.as_mut().poll(&mut cx) {
            Poll::Ready(value) => return value,
            Poll::Pending => thread::park(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::time::Duration;

    /// Resolves once another thread has filled the slot.
    struct Slot(Arc<Mutex<(Option<u32>, Option<Waker>)>>);

    impl Future for Slot {
        type Output = u32;

        fn poll(self: std::pin::Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<u32> {
            let mut inner = self.0.lock().unwrap();
            match inner.0 {
                Some(value) => Poll::Ready(value),
                None => {
                    inner.1 = Some(cx.waker().clone());
                    Poll::Pending
                }
            }
        }
    }

    #[test]
    fn ready_future_returns_immediately() {
        assert_eq!(block_on(async { 7 }), 7);
    }

    #[test]
    fn woken_from_another_thread() {
        let shared = Arc::new(Mutex::new((None::<u32>, None::<Waker>)));
        let producer = shared.clone();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            let waker = {
                let mut inner = producer.lock().unwrap();
                inner.0 = Some(99);
                inner.1.take()
            };
            if let Some(waker) = waker {
                waker.wake();
            }
        });

        assert_eq!(block_on(Slot(shared)), 99);
        handle.join().unwrap();
    }
}
