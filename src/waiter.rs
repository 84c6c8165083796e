//! Condition-wait consumer adapter.
//!
//! The `Waiter` turns the non-blocking consume surface into a blocking
//! `next()` without touching the buffer's hot path: a decorator on the
//! producer side raises a level-triggered signal after every publish, and
//! the consumer side parks on that signal whenever a read comes up empty.
//!
//! The signal is coalesced: any number of publishes between two waits
//! produce at most one wake. That is enough because the consumer
//! unconditionally re-checks `try_next` after waking.

use crate::cancel::CancelToken;
use crate::consumer::{Consume, Publish};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;

/// Level-triggered wake signal shared by the producer and consumer halves.
pub(crate) struct WaitSignal {
    pending: Mutex<bool>,
    cond: Condvar,
}

impl WaitSignal {
    fn new() -> Self {
        Self {
            pending: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    /// Raise the signal (publish side). Wakes at most one parked waiter.
    pub(crate) fn raise(&self) {
        let mut pending = self.pending.lock();
        *pending = true;
        self.cond.notify_one();
    }

    /// Wake without raising (cancellation). Holding the lock while
    /// notifying closes the window between a waiter's cancel check and its
    /// park, so a cancel can never slip through unobserved.
    pub(crate) fn interrupt(&self) {
        let _pending = self.pending.lock();
        self.cond.notify_all();
    }

    /// Park until the signal is raised or `cancel` fires. Consumes one
    /// raised level.
    fn wait(&self, cancel: Option<&CancelToken>) {
        let mut pending = self.pending.lock();
        loop {
            if *pending {
                *pending = false;
                return;
            }
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return;
            }
            self.cond.wait(&mut pending);
        }
    }
}

/// Producer decorator that raises the wake signal after every publish.
pub struct SignalingProducer<P> {
    inner: P,
    signal: Arc<WaitSignal>,
}

impl<P: Publish> SignalingProducer<P> {
    /// Publishes through the wrapped producer, then wakes the waiter.
    pub fn publish(&mut self, item: P::Item) {
        self.inner.publish(item);
        self.signal.raise();
    }
}

impl<P: Publish> Publish for SignalingProducer<P> {
    type Item = P::Item;

    #[inline]
    fn publish(&mut self, item: P::Item) {
        SignalingProducer::publish(self, item);
    }
}

/// Blocking consumer adapter parking on a publish signal.
pub struct Waiter<C> {
    consumer: C,
    signal: Arc<WaitSignal>,
    cancel: Option<CancelToken>,
}

impl<C: Consume> Waiter<C> {
    /// Blocks until a value is available or the cancellation handle fires.
    ///
    /// Returns `None` only for cancellation; an already-cancelled handle
    /// makes the call return on the first empty read, without draining
    /// whatever the buffer still holds.
    pub fn next(&mut self) -> Option<C::Item> {
        loop {
            if let Some(item) = self.consumer.try_next() {
                return Some(item);
            }
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                return None;
            }
            self.signal.wait(self.cancel.as_ref());
        }
    }

    /// The wrapped consumer's non-blocking read, unchanged.
    #[inline]
    pub fn try_next(&mut self) -> Option<C::Item> {
        self.consumer.try_next()
    }
}

impl<C: Consume> Consume for Waiter<C> {
    type Item = C::Item;

    #[inline]
    fn try_next(&mut self) -> Option<C::Item> {
        Waiter::try_next(self)
    }
}

/// Wraps a producer/consumer pair with the wait signal.
pub fn waiter<P, C>(producer: P, consumer: C) -> (SignalingProducer<P>, Waiter<C>)
where
    P: Publish,
    C: Consume,
{
    wire(producer, consumer, None)
}

/// Like [`waiter`], with a cancellation handle that unblocks `next()`.
pub fn waiter_with_cancel<P, C>(
    producer: P,
    consumer: C,
    cancel: CancelToken,
) -> (SignalingProducer<P>, Waiter<C>)
where
    P: Publish,
    C: Consume,
{
    wire(producer, consumer, Some(cancel))
}

fn wire<P, C>(
    producer: P,
    consumer: C,
    cancel: Option<CancelToken>,
) -> (SignalingProducer<P>, Waiter<C>)
where
    P: Publish,
    C: Consume,
{
    let signal = Arc::new(WaitSignal::new());
    if let Some(cancel) = &cancel {
        cancel.register(&signal);
    }
    (
        SignalingProducer {
            inner: producer,
            signal: Arc::clone(&signal),
        },
        Waiter {
            consumer,
            signal,
            cancel,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_next_returns_buffered_value_without_waiting() {
        let (tx, rx) = crate::spsc::<u64>(4);
        let (mut tx, mut rx) = waiter(tx, rx);

        tx.publish(Arc::new(42));
        assert_eq!(*rx.next().unwrap(), 42);
    }

    #[test]
    fn test_cancelled_handle_returns_none_on_empty() {
        let cancel = CancelToken::new();
        let (tx, rx) = crate::spsc::<u64>(4);
        let (mut tx, mut rx) = waiter_with_cancel(tx, rx, cancel.clone());

        cancel.cancel();
        assert!(rx.next().is_none());

        // A buffered value still wins over an old cancellation.
        tx.publish(Arc::new(7));
        assert_eq!(*rx.next().unwrap(), 7);
    }

    #[test]
    fn test_signal_coalesces_publishes() {
        let (tx, rx) = crate::spsc::<u64>(8);
        let (mut tx, mut rx) = waiter(tx, rx);

        for i in 0..3u64 {
            tx.publish(Arc::new(i));
        }
        // Three publishes, one raised level; every value is still readable
        // because next() consults the buffer before parking.
        assert_eq!(*rx.next().unwrap(), 0);
        assert_eq!(*rx.next().unwrap(), 1);
        assert_eq!(*rx.next().unwrap(), 2);
    }
}
