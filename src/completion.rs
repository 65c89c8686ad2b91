use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

/// Single-fire result of a `play` request.
///
/// `true` means the transport started, not that the clip played to the end. The value is consumed
/// by [`Completion::complete`]; if it is dropped first (for example because the sound system is
/// gone) it fires `false`, so every completion reports exactly once.
pub struct Completion {
    callback: Option<Box<dyn FnOnce(bool) + Send>>,
}

impl Completion {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(bool) + Send + 'static,
    {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// Completion paired with a receipt the caller can block on.
    pub fn channel() -> (Self, PlayReceipt) {
        let (sender, receiver) = mpsc::sync_channel(1);
        let completion = Self::new(move |started| {
            // receipt may already be gone
            let _ = sender.send(started);
        });
        (completion, PlayReceipt { receiver })
    }

    pub fn complete(mut self, started: bool) {
        if let Some(callback) = self.callback.take() {
            fire(callback, started);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            fire(callback, false);
        }
    }
}

/// Runs a user callback. A panicking callback must not take the sound system thread down with it.
fn fire(callback: Box<dyn FnOnce(bool) + Send>, started: bool) {
    if panic::catch_unwind(AssertUnwindSafe(move || callback(started))).is_err() {
        log::error!("play completion callback panicked");
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("pending", &self.callback.is_some())
            .finish()
    }
}

/// Receiving side of [`Completion::channel`].
#[derive(Debug)]
pub struct PlayReceipt {
    receiver: Receiver<bool>,
}

impl PlayReceipt {
    /// Blocks until the play request was handled.
    pub fn wait(self) -> bool {
        self.receiver.recv().unwrap_or(false)
    }

    /// Returns `None` if nothing was reported within `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<bool> {
        match self.receiver.recv_timeout(timeout) {
            Ok(started) => Some(started),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(false),
        }
    }

    pub fn try_result(&self) -> Option<bool> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn complete_fires_once() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&calls);
        let completion = Completion::new(move |started| recorded.lock().unwrap().push(started));
        completion.complete(true);
        assert_eq!(*calls.lock().unwrap(), vec![true]);
    }

    #[test]
    fn dropped_completion_reports_failure() {
        let count = Arc::new(AtomicUsize::new(0));
        let failures = Arc::clone(&count);
        let completion = Completion::new(move |started| {
            assert!(!started);
            failures.fetch_add(1, Ordering::SeqCst);
        });
        drop(completion);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_callback_is_contained() {
        Completion::new(|_| panic!("callback failure")).complete(true);
        drop(Completion::new(|_| panic!("callback failure")));
    }

    #[test]
    fn receipt() {
        let (completion, receipt) = Completion::channel();
        assert_eq!(receipt.try_result(), None);
        completion.complete(true);
        assert!(receipt.wait());
    }

    #[test]
    fn receipt_of_dropped_completion() {
        let (completion, receipt) = Completion::channel();
        drop(completion);
        assert_eq!(receipt.wait_timeout(Duration::from_millis(50)), Some(false));
    }

    #[test]
    fn receipt_times_out() {
        let (_completion, receipt) = Completion::channel();
        assert_eq!(receipt.wait_timeout(Duration::from_millis(10)), None);
    }
}
