//! diode-rs - Lossy, Non-Blocking Ring Buffers
//!
//! A diode is a ring buffer for one-way data flow: producers never block and
//! never slow down. When the consumer falls behind, the oldest in-flight
//! values are silently overwritten and the consumer is told how many it
//! missed. That trade (reliability for producer latency) suits telemetry
//! pipelines, log shippers, and metric collectors, where recent data matters
//! more than complete data.
//!
//! # Key Properties
//!
//! - Wait-free `publish` and `try_next` (the many-producer publish retry
//!   loop is lock-free)
//! - Overwrite detection via per-cell sequence tags; the consumer
//!   fast-forwards past the gap and reports the exact miss count
//! - Single-producer and many-producer variants behind one consumer surface
//! - Blocking adapters ([`Poller`], [`Waiter`]) with cooperative
//!   cancellation
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! let (mut tx, mut rx) = diode_rs::spsc::<&str>(8);
//!
//! tx.publish(Arc::new("hello"));
//! let value = rx.try_next().unwrap();
//! assert_eq!(*value, "hello");
//! assert!(rx.try_next().is_none());
//! ```
//!
//! Many producers share a cloneable handle:
//!
//! ```
//! use std::sync::Arc;
//!
//! let (tx, mut rx) = diode_rs::mpsc::<u64>(16);
//! let tx2 = tx.clone();
//!
//! tx.publish(Arc::new(1));
//! tx2.publish(Arc::new(2));
//! assert_eq!(*rx.try_next().unwrap(), 1);
//! assert_eq!(*rx.try_next().unwrap(), 2);
//! ```

mod backoff;
mod builder;
mod cancel;
mod config;
mod consumer;
mod invariants;
mod metrics;
pub mod mpsc;
mod poller;
mod ring;
mod sink;
mod slot;
pub mod spsc;
mod waiter;

pub use builder::{mpsc, spsc, Builder};
pub use cancel::CancelToken;
pub use config::Config;
pub use consumer::{Consume, Consumer, Publish};
pub use metrics::{Metrics, MetricsSnapshot};
pub use poller::{Poller, DEFAULT_POLL_INTERVAL};
pub use sink::{AlertFn, DropSink, SilentSink, TracingSink};
pub use waiter::{waiter, waiter_with_cancel, SignalingProducer, Waiter};
