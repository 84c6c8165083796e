use crate::waiter::WaitSignal;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// Cloneable cancellation handle for the blocking adapters.
///
/// Cancelling is idempotent: the first call flips the flag and wakes every
/// registered wait signal so a blocked `next()` returns promptly; later
/// calls are no-ops. Cancellation never drains the underlying diode, and a
/// handle cancelled up front makes `next()` return on the first empty read.
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

struct Inner {
    cancelled: AtomicBool,
    signals: Mutex<Vec<Weak<WaitSignal>>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                signals: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Fires the cancellation.
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        let mut signals = self.inner.signals.lock();
        for signal in signals.drain(..) {
            if let Some(signal) = signal.upgrade() {
                signal.interrupt();
            }
        }
    }

    /// Whether the handle has been cancelled.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Registers a wait signal to be woken on cancellation. Waiters still
    /// re-check `is_cancelled` around every wait, so registering against an
    /// already-fired token is harmless.
    pub(crate) fn register(&self, signal: &Arc<WaitSignal>) {
        let mut signals = self.inner.signals.lock();
        signals.retain(|weak| weak.strong_count() > 0);
        signals.push(Arc::downgrade(signal));
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
