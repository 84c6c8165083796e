use crate::backoff::Backoff;
use crate::config::Config;
use crate::invariants::{debug_assert_forward_jump, debug_assert_slot_congruence};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::sink::DropSink;
use crate::slot::{Slot, SlotArray};
use crossbeam::epoch;
use crossbeam::epoch::Owned;
use crossbeam::utils::CachePadded;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// The diode is a lossy ring: producers never wait for the consumer, and the
// consumer detects overwrites after the fact through per-cell sequence tags.
//
// ## Sequence Numbers
//
// `write_idx` is an unbounded u64 handing out one sequence per publish. It
// rests at the all-ones bit pattern so the first `fetch_add(1)` wraps to
// sequence 0. The slot for sequence `s` is `s % capacity`; capacity is an
// arbitrary N >= 1, so indexing uses modulo rather than a mask.
//
// ## Memory Ordering Protocol
//
// **Producer (publish path):**
// 1. `fetch_add` on `write_idx` with Relaxed (uniqueness comes from the RMW
//    itself; publication is ordered by the slot swap, not the counter)
// 2. Build the cell, then swap/CAS it into the slot with Release
//    (publishes the fully built cell to the consumer)
//
// **Many-producer collision check:**
// 3. Acquire-load of the occupant's tag before the CAS (synchronizes with
//    whichever thread installed it)
//
// **Consumer (consume path):**
// 4. Acquire-swap the slot with empty (synchronizes with the producer's
//    Release, so the cell's tag and payload are fully visible)
//
// The read cursor is a plain u64 owned by the single consumer handle; no
// producer ever touches it, so it needs no atomicity at all.
//
// ## Reclamation
//
// Cells are retired through crossbeam-epoch (see `slot.rs`): the collision
// check reads cells the producer does not own, which rules out immediate
// destruction on either side.
//
// =============================================================================

pub(crate) const COLLISION_WARNING: &str =
    "diode publish collision, consider a larger capacity";

/// The shared core of both diode variants: the slot array, the write index,
/// and the drop sink. Handles wrap this in an `Arc` and keep the protocol
/// state that is theirs alone (the consumer's read cursor).
pub(crate) struct Ring<T> {
    /// Next-sequence counter. All-ones at rest so the first `fetch_add`
    /// hands out sequence 0.
    write_idx: CachePadded<AtomicU64>,
    slots: SlotArray<T>,
    sink: Arc<dyn DropSink>,
    /// Present when copy-on-publish was selected at construction.
    clone_payload: Option<fn(&T) -> T>,
    metrics: Metrics,
    config: Config,
}

impl<T> Ring<T> {
    pub(crate) fn new(
        config: Config,
        sink: Arc<dyn DropSink>,
        clone_payload: Option<fn(&T) -> T>,
    ) -> Self {
        Self {
            write_idx: CachePadded::new(AtomicU64::new(u64::MAX)),
            slots: SlotArray::new(config.capacity()),
            sink,
            clone_payload,
            metrics: Metrics::new(),
            config,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn slot_index(&self, seq: u64) -> usize {
        (seq % self.capacity() as u64) as usize
    }

    #[inline]
    fn next_seq(&self) -> u64 {
        self.write_idx.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    #[inline]
    fn prepare(&self, data: Arc<T>) -> Arc<T> {
        match self.clone_payload {
            Some(clone) => Arc::new(clone(&data)),
            None => data,
        }
    }

    // ---------------------------------------------------------------------
    // PRODUCER PROTOCOLS
    // ---------------------------------------------------------------------

    /// Uncontended publish: unconditionally displace the target slot.
    ///
    /// There is no occupancy check; overwriting a not-yet-consumed cell is
    /// the diode property, detected later by the consumer through the tag.
    pub(crate) fn publish_overwrite(&self, data: Arc<T>) {
        let data = self.prepare(data);
        let seq = self.next_seq();
        let idx = self.slot_index(seq);

        let guard = epoch::pin();
        self.slots.overwrite(idx, Owned::new(Slot { seq, data }), &guard);

        if self.config.enable_metrics {
            self.metrics.add_published(1);
        }
    }

    /// Contended publish: fetch a sequence, verify the target slot has aged
    /// a full lap, and CAS the cell in. On a collision or a lost CAS, warn
    /// the sink, back off, and restart with a fresh sequence.
    pub(crate) fn publish_contended(&self, data: Arc<T>) {
        let data = self.prepare(data);
        let guard = epoch::pin();
        let mut cell = Owned::new(Slot { seq: 0, data });
        let mut backoff = Backoff::new();

        loop {
            let seq = self.next_seq();
            let idx = self.slot_index(seq);
            let (observed, observed_seq) = self.slots.load_seq(idx, &guard);

            if let Some(occupied) = observed_seq {
                // Collision when the occupant is less than one full lap
                // old: `occupied > seq - N` in unbounded arithmetic,
                // rearranged as `occupied + N > seq` because sequences are
                // ordinals from zero and the subtraction form underflows
                // during the first lap. Installing over a fresh cell would
                // break per-slot tag monotonicity.
                if occupied + self.capacity() as u64 > seq {
                    self.on_collision();
                    backoff.snooze();
                    continue;
                }
            }

            cell.seq = seq;
            match self.slots.try_install(idx, observed, cell, &guard) {
                Ok(()) => {
                    if self.config.enable_metrics {
                        self.metrics.add_published(1);
                    }
                    return;
                }
                Err(returned) => {
                    // Another producer swapped the slot between our load and
                    // the CAS; the sequence is burned either way.
                    cell = returned;
                    self.on_collision();
                    backoff.snooze();
                }
            }
        }
    }

    #[cold]
    fn on_collision(&self) {
        if self.config.enable_metrics {
            self.metrics.add_collisions(1);
        }
        self.sink.warn(COLLISION_WARNING);
    }

    // ---------------------------------------------------------------------
    // CONSUMER PROTOCOL
    // ---------------------------------------------------------------------

    /// The consume step shared by both variants. `read_idx` is the
    /// caller-owned read cursor (the sequence expected next).
    ///
    /// Outcomes:
    /// - empty slot: `None`, cursor untouched (the producer has not filled
    ///   this slot yet)
    /// - tag behind the cursor: `None`, cursor untouched (a stale leftover
    ///   between the old and new cursor after an earlier fast-forward; it
    ///   was already accounted as dropped)
    /// - tag ahead of the cursor: the producer lapped us; report the exact
    ///   gap to the sink and snap the cursor forward before yielding
    pub(crate) fn consume(&self, read_idx: &mut u64) -> Option<Arc<T>> {
        let idx = self.slot_index(*read_idx);

        let guard = epoch::pin();
        let (seq, data) = self.slots.take(idx, &guard)?;
        debug_assert_slot_congruence!(seq, idx, self.capacity());

        if seq < *read_idx {
            return None;
        }

        if seq > *read_idx {
            debug_assert_forward_jump!(*read_idx, seq);
            let missed = seq - *read_idx;
            if self.config.enable_metrics {
                self.metrics.add_dropped(missed);
                self.metrics.add_alerts(1);
            }
            self.sink.alert(missed);
            *read_idx = seq;
        }

        *read_idx += 1;
        if self.config.enable_metrics {
            self.metrics.add_consumed(1);
        }
        Some(data)
    }

    // ---------------------------------------------------------------------
    // OBSERVABILITY
    // ---------------------------------------------------------------------

    pub(crate) fn metrics(&self) -> MetricsSnapshot {
        if self.config.enable_metrics {
            self.metrics.snapshot()
        } else {
            MetricsSnapshot::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::SilentSink;

    fn ring(capacity: usize) -> Ring<u64> {
        Ring::new(Config::new(capacity), Arc::new(SilentSink), None)
    }

    #[test]
    fn test_first_sequence_is_zero() {
        let ring = ring(4);
        ring.publish_overwrite(Arc::new(7));

        let mut cursor = 0;
        let value = ring.consume(&mut cursor).unwrap();
        assert_eq!(*value, 7);
        assert_eq!(cursor, 1);
    }

    #[test]
    fn test_contended_publish_lands_in_sequence_order() {
        let ring = ring(4);
        ring.publish_contended(Arc::new(1));
        ring.publish_contended(Arc::new(2));

        let mut cursor = 0;
        assert_eq!(*ring.consume(&mut cursor).unwrap(), 1);
        assert_eq!(*ring.consume(&mut cursor).unwrap(), 2);
        assert!(ring.consume(&mut cursor).is_none());
        assert_eq!(cursor, 2);
    }

    #[test]
    fn test_copy_on_publish_stores_a_private_clone() {
        let ring: Ring<Vec<u64>> = Ring::new(
            Config::new(2),
            Arc::new(SilentSink),
            Some(<Vec<u64>>::clone),
        );

        let original = Arc::new(vec![1, 2, 3]);
        ring.publish_overwrite(Arc::clone(&original));

        let mut cursor = 0;
        let stored = ring.consume(&mut cursor).unwrap();
        assert_eq!(*stored, vec![1, 2, 3]);
        // The ring held its own allocation, not the caller's.
        assert!(!Arc::ptr_eq(&original, &stored));
    }

    #[test]
    fn test_metrics_disabled_snapshot_is_empty() {
        let ring = ring(2);
        ring.publish_overwrite(Arc::new(1));
        assert_eq!(ring.metrics(), MetricsSnapshot::default());
    }
}
