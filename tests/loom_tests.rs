//! Loom-based interleaving tests for the slot protocol.
//!
//! Run with: `cargo test --features loom --test loom_tests --release`
//!
//! Loom exhaustively explores thread interleavings to find synchronization
//! bugs that only occur under specific schedules. The real slot array
//! retires cells through crossbeam-epoch, which loom cannot model, so the
//! protocol is modeled here directly with loom atomics: same sequence
//! discipline, same swap/CAS publication, same consume algorithm. Cells
//! that another thread might still be reading (the many-producer collision
//! check) are only freed after the threads join.

#![cfg(feature = "loom")]

use loom::sync::atomic::{AtomicPtr, AtomicU64, Ordering};
use loom::sync::Arc;
use loom::thread;
use std::ptr;

struct Cell {
    seq: u64,
    value: u64,
}

struct ModelDiode {
    slots: Vec<AtomicPtr<Cell>>,
    write_idx: AtomicU64,
}

// Safety: all cross-thread access goes through the atomics; cell contents
// are immutable after publication.
unsafe impl Send for ModelDiode {}
unsafe impl Sync for ModelDiode {}

impl ModelDiode {
    fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| AtomicPtr::new(ptr::null_mut())).collect(),
            write_idx: AtomicU64::new(u64::MAX),
        }
    }

    fn capacity(&self) -> u64 {
        self.slots.len() as u64
    }

    fn next_seq(&self) -> u64 {
        self.write_idx.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// Single-producer publish: unconditional swap. The displaced cell is
    /// freed at once - only a swap can reach it, and swaps are exclusive.
    fn publish_overwrite(&self, value: u64) {
        let seq = self.next_seq();
        let idx = (seq % self.capacity()) as usize;
        let cell = Box::into_raw(Box::new(Cell { seq, value }));
        let old = self.slots[idx].swap(cell, Ordering::AcqRel);
        if !old.is_null() {
            drop(unsafe { Box::from_raw(old) });
        }
    }

    /// Many-producer publish. Returns the addresses of cells this call
    /// displaced; the caller frees them after every publishing thread has
    /// joined, because a rival's collision check may still be reading
    /// their tags. (Addresses rather than pointers so the vec crosses the
    /// thread join.)
    fn publish_contended(&self, value: u64) -> Vec<usize> {
        let mut displaced = Vec::new();
        let mut cell = Box::new(Cell { seq: 0, value });
        loop {
            let seq = self.next_seq();
            let idx = (seq % self.capacity()) as usize;
            let observed = self.slots[idx].load(Ordering::Acquire);

            if !observed.is_null() {
                let occupied = unsafe { (*observed).seq };
                if occupied + self.capacity() > seq {
                    thread::yield_now();
                    continue;
                }
            }

            cell.seq = seq;
            let new = Box::into_raw(cell);
            match self.slots[idx].compare_exchange(
                observed,
                new,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    if !observed.is_null() {
                        displaced.push(observed as usize);
                    }
                    return displaced;
                }
                Err(_) => {
                    cell = unsafe { Box::from_raw(new) };
                    thread::yield_now();
                }
            }
        }
    }

    /// The consume algorithm. `alerts` accumulates the miss counts that the
    /// real consumer would report to the drop sink. Taken cells are freed
    /// at once when `free_taken` holds (no producer still loads tags).
    fn consume(&self, read_idx: &mut u64, alerts: &mut u64, free_taken: bool) -> Option<u64> {
        let idx = (*read_idx % self.capacity()) as usize;
        let taken = self.slots[idx].swap(ptr::null_mut(), Ordering::Acquire);
        if taken.is_null() {
            return None;
        }

        let (seq, value) = unsafe { ((*taken).seq, (*taken).value) };
        if free_taken {
            drop(unsafe { Box::from_raw(taken) });
        }

        if seq < *read_idx {
            return None;
        }
        if seq > *read_idx {
            *alerts += seq - *read_idx;
            *read_idx = seq;
        }
        *read_idx += 1;
        Some(value)
    }
}

impl Drop for ModelDiode {
    fn drop(&mut self) {
        for slot in &self.slots {
            let cell = slot.swap(ptr::null_mut(), Ordering::Relaxed);
            if !cell.is_null() {
                drop(unsafe { Box::from_raw(cell) });
            }
        }
    }
}

/// Single producer racing the consumer: every published value is either
/// delivered (in order) or accounted as dropped, under every interleaving.
#[test]
fn loom_spsc_accounting_and_order() {
    loom::model(|| {
        let diode = Arc::new(ModelDiode::new(2));
        let producer_diode = Arc::clone(&diode);

        let producer = thread::spawn(move || {
            for value in 0..3 {
                producer_diode.publish_overwrite(value);
            }
        });

        let mut read_idx = 0u64;
        let mut alerts = 0u64;
        let mut delivered = Vec::new();

        // A few concurrent attempts; the producer freeing displaced cells
        // never races these takes because both sides use exclusive swaps.
        for _ in 0..2 {
            if let Some(value) = diode.consume(&mut read_idx, &mut alerts, true) {
                delivered.push(value);
            }
            thread::yield_now();
        }

        producer.join().unwrap();

        while let Some(value) = diode.consume(&mut read_idx, &mut alerts, true) {
            delivered.push(value);
        }

        assert_eq!(
            delivered.len() as u64 + alerts,
            3,
            "values delivered: {:?}, alerts: {}",
            delivered,
            alerts
        );
        for pair in delivered.windows(2) {
            assert!(pair[0] < pair[1], "out of order: {:?}", delivered);
        }
    });
}

/// Two producers racing on a capacity-1 ring: sequences stay unique, the
/// slot ends with the newest install, and accounting still closes.
#[test]
fn loom_mpsc_two_producers() {
    loom::model(|| {
        let diode = Arc::new(ModelDiode::new(1));

        let mut handles = Vec::new();
        for value in 0..2u64 {
            let diode = Arc::clone(&diode);
            handles.push(thread::spawn(move || diode.publish_contended(value + 10)));
        }

        let mut displaced = Vec::new();
        for handle in handles {
            displaced.extend(handle.join().unwrap());
        }
        // All publishers are done; their loads can no longer observe these.
        for addr in displaced {
            drop(unsafe { Box::from_raw(addr as *mut Cell) });
        }

        let mut read_idx = 0u64;
        let mut alerts = 0u64;
        let mut delivered = 0u64;
        while diode.consume(&mut read_idx, &mut alerts, true).is_some() {
            delivered += 1;
        }

        // Collision retries burn sequences, so the books close against the
        // counter, not the publish-call count.
        let issued = diode.write_idx.load(Ordering::Relaxed).wrapping_add(1);
        assert!(issued >= 2);
        assert_eq!(delivered + alerts, issued);
    });
}
