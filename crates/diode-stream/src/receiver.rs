//! Async receiver implementing `futures::Stream`.

use crate::cancel::{CancelSignal, Shared};
use crate::config::StreamConfig;
use diode_rs::Consume;
use futures_core::Stream;
use pin_project_lite::pin_project;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::time::{interval, Interval};

pin_project! {
    /// Async stream wrapping a diode consumer.
    ///
    /// Values are drained in batches (up to `batch_hint` per poll) into an
    /// internal buffer and yielded one at a time. Wakeups are hybrid: the
    /// paired sender signals after every publish, and the poll interval
    /// sweeps up anything that arrived without a signal.
    ///
    /// Dropped values are reported through the diode's own drop sink, on
    /// this task, exactly as they would be for a blocking consumer.
    pub struct DiodeReceiver<C, T> {
        consumer: C,
        shared: Arc<Shared>,
        config: StreamConfig,
        #[pin]
        poll_timer: Interval,
        buffer: VecDeque<T>,
    }
}

impl<C, T> DiodeReceiver<C, T>
where
    C: Consume<Item = T>,
{
    pub(crate) fn new(consumer: C, shared: Arc<Shared>, config: StreamConfig) -> Self {
        let poll_timer = interval(config.poll_interval);
        Self {
            consumer,
            shared,
            config,
            poll_timer,
            buffer: VecDeque::new(),
        }
    }

    /// A cloneable handle that ends this stream from another task.
    pub fn cancel_signal(&self) -> CancelSignal {
        CancelSignal::new(Arc::clone(&self.shared))
    }

    /// Number of values drained but not yet yielded.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

fn drain<C, T>(consumer: &mut C, buffer: &mut VecDeque<T>, limit: usize)
where
    C: Consume<Item = T>,
{
    for _ in 0..limit {
        match consumer.try_next() {
            Some(item) => buffer.push_back(item),
            None => break,
        }
    }
}

impl<C, T> Stream for DiodeReceiver<C, T>
where
    C: Consume<Item = T>,
{
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        // Yield buffered values first.
        if let Some(item) = this.buffer.pop_front() {
            return Poll::Ready(Some(item));
        }

        // Cancellation ends the stream without draining the ring.
        if this.shared.is_cancelled() {
            return Poll::Ready(None);
        }

        // Pull a batch off the diode.
        drain(this.consumer, this.buffer, this.config.batch_hint);
        if let Some(item) = this.buffer.pop_front() {
            return Poll::Ready(Some(item));
        }

        // Arm the publish notification. A publish that raced the drain
        // above left a stored permit, which resolves this immediately.
        let notified = this.shared.notify.notified();
        tokio::pin!(notified);
        if notified.as_mut().poll(cx).is_ready() {
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }

        // The notified future dies with this poll, so a signal arriving
        // while we are parked only leaves a permit. The interval timer is
        // the safety net that turns that permit into a wakeup, and it also
        // covers producers publishing through an unwrapped handle.
        if this.poll_timer.as_mut().poll_tick(cx).is_ready() {
            drain(this.consumer, this.buffer, this.config.batch_hint);
            // Re-arm so the next tick has a registered waker.
            let _ = this.poll_timer.as_mut().poll_tick(cx);
            if let Some(item) = this.buffer.pop_front() {
                return Poll::Ready(Some(item));
            }
        }

        Poll::Pending
    }
}
