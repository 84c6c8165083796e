#[cfg(debug_assertions)]
use crate::invariants::debug_assert_cursor_monotonic;
use crate::metrics::MetricsSnapshot;
use crate::ring::Ring;
use std::sync::Arc;

/// Non-blocking consume capability.
///
/// This is the seam the blocking adapters decorate: anything that can yield
/// the next value (or report "nothing yet") can sit under a `Poller` or a
/// `Waiter`.
pub trait Consume {
    /// The yielded value type.
    type Item;

    /// Attempts to consume the next value without blocking.
    fn try_next(&mut self) -> Option<Self::Item>;
}

/// Publish capability, the producer-side seam.
///
/// The `Waiter`'s producer wrapper intercepts this to raise its wake signal
/// after every publication; the buffer itself stays oblivious.
pub trait Publish {
    /// The accepted value type.
    type Item;

    /// Publishes a value. Diode publishes never fail and never block.
    fn publish(&mut self, item: Self::Item);
}

/// The consuming half of a diode.
///
/// The same consumer serves both variants: the consume algorithm relies
/// only on cells being published atomically as a unit and on per-slot
/// sequence tags being monotonic, which both publish protocols guarantee.
///
/// The read cursor lives here as a plain integer. It is owned by this
/// handle, never touched by producers, and the handle is not `Clone`, so a
/// second concurrent reader cannot be constructed.
pub struct Consumer<T> {
    ring: Arc<Ring<T>>,
    read_idx: u64,
}

impl<T> Consumer<T> {
    pub(crate) fn new(ring: Arc<Ring<T>>) -> Self {
        Self { ring, read_idx: 0 }
    }

    /// Attempts to read the next value.
    ///
    /// Returns `None` when the expected slot is empty or holds a stale
    /// leftover; neither case advances the cursor. When the producer has
    /// lapped this consumer, the drop sink is alerted with the exact number
    /// of skipped values and the cursor snaps forward to the surviving
    /// value, which is returned.
    pub fn try_next(&mut self) -> Option<Arc<T>> {
        #[cfg(debug_assertions)]
        let before = self.read_idx;

        let value = self.ring.consume(&mut self.read_idx);

        #[cfg(debug_assertions)]
        debug_assert_cursor_monotonic!(before, self.read_idx);

        value
    }

    /// The sequence this consumer expects next.
    #[inline]
    pub fn read_index(&self) -> u64 {
        self.read_idx
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

impl<T> Consume for Consumer<T> {
    type Item = Arc<T>;

    #[inline]
    fn try_next(&mut self) -> Option<Arc<T>> {
        Consumer::try_next(self)
    }
}
