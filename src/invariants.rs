//! Debug assertion macros for the ring's documented invariants.
//!
//! Only active in debug builds (`debug_assert!`), so there is zero overhead
//! in release builds.

/// Assert that a cell's sequence tag lands in its slot's residue class.
///
/// **Invariant**: a published cell with sequence `s` lives at slot `s mod N`.
///
/// Used in: `Ring::consume()` on every taken cell
macro_rules! debug_assert_slot_congruence {
    ($seq:expr, $idx:expr, $capacity:expr) => {
        debug_assert!(
            ($seq % $capacity as u64) as usize == $idx,
            "slot {} holds sequence {} outside its residue class (capacity {})",
            $idx,
            $seq,
            $capacity
        )
    };
}

/// Assert that a fast-forward moves the read cursor strictly forward.
///
/// **Invariant**: a cell that triggers fast-forward has a sequence greater
/// than the cursor, so the reported miss count is nonzero.
///
/// Used in: `Ring::consume()` on the fast-forward path
macro_rules! debug_assert_forward_jump {
    ($cursor:expr, $seq:expr) => {
        debug_assert!(
            $seq > $cursor,
            "fast-forward must move the cursor forward: {} -> {}",
            $cursor,
            $seq
        )
    };
}

/// Assert that the read cursor never decreases.
///
/// **Invariant**: `R` is monotonically non-decreasing across consumes.
///
/// Used in: `Consumer::try_next()`
macro_rules! debug_assert_cursor_monotonic {
    ($old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "read cursor went backwards: {} -> {}",
            $old,
            $new
        )
    };
}

pub(crate) use debug_assert_cursor_monotonic;
pub(crate) use debug_assert_forward_jump;
pub(crate) use debug_assert_slot_congruence;
