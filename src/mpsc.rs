//! Many-producer variant.
//!
//! Producers draw unique sequences from a shared fetch-and-add counter, so
//! ordering between producers is defined by counter order. The slot-level
//! CAS resolves the rare case where retries put two sequences on the same
//! slot at the same instant; a lost CAS or a too-fresh occupant sends the
//! producer back for a fresh sequence. The retry loop is lock-free: a
//! failed attempt means some other producer made progress.

use crate::consumer::Publish;
use crate::metrics::MetricsSnapshot;
use crate::ring::Ring;
use std::sync::Arc;

/// The producing half of a many-producer diode. Cloneable; every clone (and
/// every thread borrowing one) may publish concurrently.
pub struct Producer<T> {
    ring: Arc<Ring<T>>,
}

impl<T> Producer<T> {
    pub(crate) fn new(ring: Arc<Ring<T>>) -> Self {
        Self { ring }
    }

    /// Publishes the next value.
    ///
    /// May retry internally on slot contention, warning the drop sink once
    /// per collision, but always eventually succeeds. Never blocks on the
    /// consumer.
    pub fn publish(&self, data: Arc<T>) {
        self.ring.publish_contended(data);
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

impl<T> Clone for Producer<T> {
    fn clone(&self) -> Self {
        Self {
            ring: Arc::clone(&self.ring),
        }
    }
}

impl<T> Publish for Producer<T> {
    type Item = Arc<T>;

    #[inline]
    fn publish(&mut self, item: Arc<T>) {
        Producer::publish(self, item);
    }
}
