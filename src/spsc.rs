//! Single-producer variant.
//!
//! The publish path is the cheapest possible: one counter bump and one
//! pointer swap, no occupancy check, no retry loop. The contract (exactly
//! one producer) is enforced by the type system rather than documented
//! hope: the handle is not `Clone` and `publish` takes `&mut self`, so a
//! second concurrent publisher cannot compile.

use crate::consumer::Publish;
use crate::metrics::MetricsSnapshot;
use crate::ring::Ring;
use std::sync::Arc;

/// The producing half of a single-producer diode.
pub struct Producer<T> {
    ring: Arc<Ring<T>>,
}

// Note: Producer intentionally does NOT implement Clone. A clone would be a
// second writer racing the unconditional slot overwrite, which the
// single-producer protocol does not defend against.

impl<T> Producer<T> {
    pub(crate) fn new(ring: Arc<Ring<T>>) -> Self {
        Self { ring }
    }

    /// Publishes the next value, unconditionally displacing whatever
    /// occupies its slot. Never blocks, never fails.
    pub fn publish(&mut self, data: Arc<T>) {
        self.ring.publish_overwrite(data);
    }

    /// The ring capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Snapshot of the diode's counters (zeros unless enabled in config).
    pub fn metrics(&self) -> MetricsSnapshot {
        self.ring.metrics()
    }
}

impl<T> Publish for Producer<T> {
    type Item = Arc<T>;

    #[inline]
    fn publish(&mut self, item: Arc<T>) {
        Producer::publish(self, item);
    }
}
