//! Async Stream/Sink adapters for diode-rs
//!
//! This crate puts a [`futures_core::Stream`] consumer and a
//! [`futures_sink::Sink`] producer in front of any diode handle pair,
//! for async pipelines that read telemetry off a lossy ring.
//!
//! # Strategy
//!
//! - **Hybrid wakeups**: the sender signals a `Notify` after every publish,
//!   and the receiver also polls on a configurable interval as a safety
//!   net. The interval covers publishes made through an unwrapped handle
//!   (the raw diode never signals anyone) and notifications that land
//!   between two polls.
//! - **No backpressure**: diodes overwrite instead of filling up, so the
//!   sink is always ready and never buffers.
//! - **Cancellation**: a cloneable [`CancelSignal`] ends the stream
//!   without draining it, mirroring the blocking adapters' contract.
//!
//! # Example
//!
//! ```ignore
//! use diode_stream::{wrap, StreamConfig, StreamExt};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tx, rx) = diode_rs::spsc::<u64>(1024);
//!     let (mut tx, mut rx) = wrap(tx, rx, StreamConfig::default());
//!
//!     tx.publish(Arc::new(42)).unwrap();
//!
//!     while let Some(value) = rx.next().await {
//!         println!("received: {value}");
//!     }
//! }
//! ```

mod cancel;
mod config;
mod error;
mod receiver;
mod sender;

pub use cancel::CancelSignal;
pub use config::StreamConfig;
pub use error::StreamError;
pub use receiver::DiodeReceiver;
pub use sender::DiodeSender;

// Re-export the stream combinators callers will reach for first.
pub use tokio_stream::StreamExt;

use cancel::Shared;
use diode_rs::{Consume, Publish};
use std::sync::Arc;

/// Wraps a producer/consumer pair with the async adapters.
///
/// The sender wakes the receiver after every publish; the receiver
/// implements `Stream` and drains in batches.
///
/// # Panics
///
/// Must be called from within a Tokio runtime: the receiver arms its
/// safety-net timer at construction.
pub fn wrap<P, C>(
    producer: P,
    consumer: C,
    config: StreamConfig,
) -> (DiodeSender<P>, DiodeReceiver<C, C::Item>)
where
    P: Publish,
    C: Consume,
{
    let shared = Arc::new(Shared::new());
    let sender = DiodeSender::new(producer, Arc::clone(&shared));
    let receiver = DiodeReceiver::new(consumer, shared, config);
    (sender, receiver)
}
