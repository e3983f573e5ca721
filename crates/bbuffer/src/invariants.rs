//! Debug assertion macros for ring buffer invariants.
//!
//! Only active in debug builds (`debug_assert!`), so there is no overhead in
//! release builds. Used by every buffer variant.

// =============================================================================
// Capacity bound: 0 ≤ len ≤ capacity - 1
// =============================================================================

/// Assert that the number of unread slots never reaches `capacity`.
///
/// **Invariant**: one slot always stays empty, so `len ≤ capacity - 1`.
///
/// Used in: every `put` after the write index has been advanced
macro_rules! debug_assert_bounded_len {
    ($len:expr, $capacity:expr) => {
        debug_assert!(
            $len < $capacity,
            "capacity bound violated: {} unread slots in a ring of {}",
            $len,
            $capacity
        )
    };
}

// =============================================================================
// Index range: read, write ∈ [0, capacity)
// =============================================================================

/// Assert that an index stays inside the slot array.
///
/// Used in: `RingStorage::write` and `RingStorage::read`
macro_rules! debug_assert_index_in_range {
    ($name:literal, $idx:expr, $capacity:expr) => {
        debug_assert!(
            $idx < $capacity,
            "{} index {} out of range for capacity {}",
            $name,
            $idx,
            $capacity
        )
    };
}

// =============================================================================
// Occupancy: a slot is only read when the ring is not empty
// =============================================================================

/// Assert that the ring holds at least one unread slot before a read.
///
/// **Invariant**: `buffer[read]` is initialized ⟺ `read != write`
///
/// Used in: every `get` right before the slot is moved out
macro_rules! debug_assert_occupied {
    ($read:expr, $write:expr) => {
        debug_assert!(
            $read != $write,
            "reading slot {} from an empty ring (write index {})",
            $read,
            $write
        )
    };
}

pub(crate) use debug_assert_bounded_len;
pub(crate) use debug_assert_index_in_range;
pub(crate) use debug_assert_occupied;
