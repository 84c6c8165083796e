//! Polling consumer adapter.
//!
//! The simplest road from `try_next` to a blocking `next()`: sleep and
//! retry. The interval trades CPU for response latency; the default of
//! 10ms suits log- and metric-shipping loops.

use crate::cancel::CancelToken;
use crate::consumer::Consume;
use std::thread;
use std::time::Duration;

/// Default sleep between empty reads.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Blocking consumer adapter that polls on an interval.
pub struct Poller<C> {
    consumer: C,
    interval: Duration,
    cancel: Option<CancelToken>,
}

impl<C: Consume> Poller<C> {
    /// Wraps a consumer with the default interval and no cancellation.
    pub fn new(consumer: C) -> Self {
        Self {
            consumer,
            interval: DEFAULT_POLL_INTERVAL,
            cancel: None,
        }
    }

    /// Sets the sleep interval between empty reads.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Attaches a cancellation handle; cancelling makes `next()` return
    /// `None` within one interval.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Blocks until a value is available or the cancellation handle fires.
    ///
    /// Returns `None` only for cancellation.
    pub fn next(&mut self) -> Option<C::Item> {
        loop {
            if let Some(item) = self.consumer.try_next() {
                return Some(item);
            }
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                return None;
            }
            thread::sleep(self.interval);
        }
    }

    /// The wrapped consumer's non-blocking read, unchanged.
    #[inline]
    pub fn try_next(&mut self) -> Option<C::Item> {
        self.consumer.try_next()
    }
}

impl<C: Consume> Consume for Poller<C> {
    type Item = C::Item;

    #[inline]
    fn try_next(&mut self) -> Option<C::Item> {
        Poller::try_next(self)
    }
}
