//! Cancellation plumbing shared by the sender and receiver halves.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// State shared between the adapter halves: the cancel flag and the wakeup
/// channel. Publishes signal `notify` with a stored permit; cancellation
/// wakes whoever is currently parked on it.
pub(crate) struct Shared {
    cancelled: AtomicBool,
    pub(crate) notify: Notify,
}

impl Shared {
    pub(crate) fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    #[inline]
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub(crate) fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            self.notify.notify_waiters();
        }
    }
}

/// A cloneable handle that ends the stream from anywhere.
///
/// Cancelling is idempotent. The stream returns `None` without draining
/// the values still sitting in the ring, and the sender starts refusing
/// publishes with [`crate::StreamError::Cancelled`].
#[derive(Clone)]
pub struct CancelSignal {
    shared: Arc<Shared>,
}

impl CancelSignal {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Fires the cancellation.
    pub fn cancel(&self) {
        self.shared.cancel();
    }

    /// Whether cancellation has fired.
    pub fn is_cancelled(&self) -> bool {
        self.shared.is_cancelled()
    }
}
