use crossbeam::epoch::{self, Atomic, Guard, Owned, Shared};
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// A published cell: the payload handle plus the sequence tag it was
/// written under. Published and taken as a unit (pointer swap), so the
/// consumer never observes a torn tag/value pair.
pub(crate) struct Slot<T> {
    pub(crate) seq: u64,
    pub(crate) data: Arc<T>,
}

/// Fixed array of atomically published cells.
///
/// Publication is Release-ordered and taking is Acquire-ordered: a consumer
/// that observes a cell observes a fully initialized payload and tag.
///
/// Displaced and taken cells are retired through epoch guards rather than
/// dropped in place. Contended producers read the tag of cells they do not
/// own (the collision check), so a cell must stay allocated until every
/// thread that could hold a reference has moved past the current epoch.
pub(crate) struct SlotArray<T> {
    slots: Box<[Atomic<Slot<T>>]>,
}

impl<T> SlotArray<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, Atomic::null);
        Self {
            slots: slots.into_boxed_slice(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Unconditionally install `cell`, displacing whatever was present.
    pub(crate) fn overwrite(&self, idx: usize, cell: Owned<Slot<T>>, guard: &Guard) {
        let old = self.slots[idx].swap(cell, Ordering::AcqRel, guard);
        if !old.is_null() {
            // SAFETY: `old` was swapped out of the array, so no new
            // reference to it can be created; existing readers are tracked
            // by the epoch, and destruction waits for them.
            unsafe { guard.defer_destroy(old) };
        }
    }

    /// Acquire-load the current cell and its tag (the collision check).
    pub(crate) fn load_seq<'g>(
        &self,
        idx: usize,
        guard: &'g Guard,
    ) -> (Shared<'g, Slot<T>>, Option<u64>) {
        let current = self.slots[idx].load(Ordering::Acquire, guard);
        // SAFETY: a non-null cell stays allocated at least as long as the
        // guard pins the current epoch.
        let seq = unsafe { current.as_ref() }.map(|slot| slot.seq);
        (current, seq)
    }

    /// Try to replace the previously observed cell with `cell`.
    ///
    /// On success the displaced cell is retired. On failure (another
    /// producer got there first) `cell` is handed back for the retry.
    pub(crate) fn try_install<'g>(
        &self,
        idx: usize,
        observed: Shared<'g, Slot<T>>,
        cell: Owned<Slot<T>>,
        guard: &'g Guard,
    ) -> Result<(), Owned<Slot<T>>> {
        match self.slots[idx].compare_exchange(
            observed,
            cell,
            Ordering::AcqRel,
            Ordering::Acquire,
            guard,
        ) {
            Ok(_) => {
                if !observed.is_null() {
                    // SAFETY: the CAS displaced `observed`; same reasoning
                    // as `overwrite`.
                    unsafe { guard.defer_destroy(observed) };
                }
                Ok(())
            }
            Err(e) => Err(e.new),
        }
    }

    /// Swap the slot with empty, returning the taken cell's tag and payload.
    pub(crate) fn take(&self, idx: usize, guard: &Guard) -> Option<(u64, Arc<T>)> {
        let old = self.slots[idx].swap(Shared::null(), Ordering::Acquire, guard);
        if old.is_null() {
            return None;
        }
        // SAFETY: the swap removed `old` from the array, so this thread is
        // the only one that may retire it. Contended producers can still be
        // reading the tag, so the cell is not dropped in place: the payload
        // handle is cloned out and the cell destruction is deferred.
        let slot = unsafe { old.deref() };
        let taken = (slot.seq, Arc::clone(&slot.data));
        unsafe { guard.defer_destroy(old) };
        Some(taken)
    }
}

impl<T> Drop for SlotArray<T> {
    fn drop(&mut self) {
        // SAFETY: `&mut self` means no handle can reach this array anymore,
        // so no guard is protecting its cells.
        let guard = unsafe { epoch::unprotected() };
        for slot in self.slots.iter() {
            let cell = slot.swap(Shared::null(), Ordering::Relaxed, guard);
            if !cell.is_null() {
                // SAFETY: swapped out under exclusive access.
                drop(unsafe { cell.into_owned() });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_then_take() {
        let slots = SlotArray::new(4);
        let guard = epoch::pin();

        slots.overwrite(
            2,
            Owned::new(Slot {
                seq: 2,
                data: Arc::new("x"),
            }),
            &guard,
        );

        let (seq, data) = slots.take(2, &guard).unwrap();
        assert_eq!(seq, 2);
        assert_eq!(*data, "x");

        // Taking again observes an empty slot.
        assert!(slots.take(2, &guard).is_none());
    }

    #[test]
    fn test_overwrite_displaces_previous_cell() {
        let slots = SlotArray::new(2);
        let guard = epoch::pin();

        slots.overwrite(
            0,
            Owned::new(Slot {
                seq: 0,
                data: Arc::new(10u64),
            }),
            &guard,
        );
        slots.overwrite(
            0,
            Owned::new(Slot {
                seq: 2,
                data: Arc::new(20u64),
            }),
            &guard,
        );

        let (seq, data) = slots.take(0, &guard).unwrap();
        assert_eq!(seq, 2);
        assert_eq!(*data, 20);
    }

    #[test]
    fn test_try_install_fails_on_changed_slot() {
        let slots = SlotArray::new(2);
        let guard = epoch::pin();

        let (observed, seq) = slots.load_seq(1, &guard);
        assert!(seq.is_none());

        // Another publisher sneaks in between the load and the CAS.
        slots.overwrite(
            1,
            Owned::new(Slot {
                seq: 1,
                data: Arc::new(1u64),
            }),
            &guard,
        );

        let cell = Owned::new(Slot {
            seq: 3,
            data: Arc::new(3u64),
        });
        let returned = slots
            .try_install(1, observed, cell, &guard)
            .expect_err("stale observation must not install");
        assert_eq!(returned.seq, 3);

        // The interloper's cell is untouched.
        let (_, current_seq) = slots.load_seq(1, &guard);
        assert_eq!(current_seq, Some(1));
    }

    #[test]
    fn test_drop_releases_live_cells() {
        let payload = Arc::new(5u64);
        {
            let slots = SlotArray::new(2);
            let guard = epoch::pin();
            slots.overwrite(
                0,
                Owned::new(Slot {
                    seq: 0,
                    data: Arc::clone(&payload),
                }),
                &guard,
            );
        }
        // The array drop released its handle; ours is the only one left
        // once the collector catches up. Not asserting on the strong count
        // here: epoch destruction is deferred by design.
        assert_eq!(*payload, 5);
    }
}
