//! Async sender implementing `futures::Sink`.

use crate::cancel::Shared;
use crate::error::StreamError;
use diode_rs::Publish;
use futures_sink::Sink;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

pin_project! {
    /// Async sink wrapping a diode producer.
    ///
    /// A diode never exerts backpressure (it overwrites instead), so the
    /// sink is always ready and `poll_flush` has nothing to do. Every
    /// publish signals the receiver's notify so a parked stream wakes
    /// without waiting out its poll interval.
    pub struct DiodeSender<P> {
        producer: P,
        shared: Arc<Shared>,
    }
}

impl<P: Publish> DiodeSender<P> {
    pub(crate) fn new(producer: P, shared: Arc<Shared>) -> Self {
        Self { producer, shared }
    }

    /// Publishes a value and wakes the stream. Never blocks.
    ///
    /// After cancellation, values are refused; whatever already sits in
    /// the ring stays there (cancellation does not drain).
    pub fn publish(&mut self, item: P::Item) -> Result<(), StreamError> {
        if self.shared.is_cancelled() {
            return Err(StreamError::Cancelled);
        }
        self.producer.publish(item);
        self.shared.notify.notify_one();
        Ok(())
    }

    /// Whether the paired stream has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.shared.is_cancelled()
    }
}

impl<P: Publish> Sink<P::Item> for DiodeSender<P> {
    type Error = StreamError;

    fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        let this = self.project();
        if this.shared.is_cancelled() {
            Poll::Ready(Err(StreamError::Cancelled))
        } else {
            Poll::Ready(Ok(()))
        }
    }

    fn start_send(self: Pin<&mut Self>, item: P::Item) -> Result<(), Self::Error> {
        let this = self.project();
        if this.shared.is_cancelled() {
            return Err(StreamError::Cancelled);
        }
        this.producer.publish(item);
        this.shared.notify.notify_one();
        Ok(())
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Nothing is ever buffered in the sink itself.
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }
}
