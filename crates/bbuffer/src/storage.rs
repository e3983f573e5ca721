use crate::invariants::{
    debug_assert_bounded_len, debug_assert_index_in_range, debug_assert_occupied,
};
use crate::{BufferError, Config};
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;

// =============================================================================
// SLOT LAYOUT & INDEX PROTOCOL
// =============================================================================
//
// Every variant stores its data in the same `RingStorage`: a fixed array of
// `capacity` slots addressed by a read index and a write index, both in
// `[0, capacity)` and advanced modulo `capacity`.
//
// - empty ⟺ read == write
// - full  ⟺ advance(write) == read
//
// One slot is therefore always unusable and the usable capacity is
// `capacity - 1`. Slots in `[read, write)` (circularly) are initialized; all
// other slots are uninitialized or already moved out.
//
// `RingStorage` itself never synchronizes. Who may touch which slot is decided
// by the owning variant:
// - `LocalRing` (sequential and blocking variants): `&mut self` access, the
//   borrow checker (or the mutex around it) gives exclusivity.
// - `SpinBuffer`: the producer owns slot `write`, the consumer owns slot
//   `read`, and the atomic index hand-off decides when ownership moves.
//
// =============================================================================

/// One ring position: a value plus the end-of-stream flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot<T> {
    /// `true` on the final slot of the stream.
    pub is_last: bool,
    /// The carried value; a placeholder when the stream ended without data.
    pub value: T,
}

impl<T> Slot<T> {
    #[inline]
    pub fn new(value: T, is_last: bool) -> Self {
        Self { is_last, value }
    }

    /// Returns `(is_last, value)`.
    #[inline]
    pub fn into_parts(self) -> (bool, T) {
        (self.is_last, self.value)
    }
}

/// Fixed-capacity circular slot array with the shared index arithmetic.
///
/// Holds no indices of its own; callers pass them in.
pub struct RingStorage<T> {
    /// Uses `Box<[_]>` because the size is fixed at construction.
    slots: Box<[UnsafeCell<MaybeUninit<Slot<T>>>]>,
}

impl<T> RingStorage<T> {
    /// Allocates `config.capacity` uninitialized slots.
    pub fn new(config: Config) -> Result<Self, BufferError> {
        config.validate()?;
        let slots = (0..config.capacity)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect();
        Ok(Self { slots })
    }

    /// Total number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Next position after `p` in circular order.
    #[inline]
    pub fn advance(&self, p: usize) -> usize {
        if p + 1 == self.capacity() {
            0
        } else {
            p + 1
        }
    }

    #[inline]
    pub fn is_empty(&self, read: usize, write: usize) -> bool {
        read == write
    }

    #[inline]
    pub fn is_full(&self, read: usize, write: usize) -> bool {
        self.advance(write) == read
    }

    /// Number of unread slots between `read` and `write`.
    #[inline]
    pub fn len(&self, read: usize, write: usize) -> usize {
        if write >= read {
            write - read
        } else {
            self.capacity() - read + write
        }
    }

    /// Moves `slot` into position `idx`.
    ///
    /// # Safety
    ///
    /// The caller must have exclusive access to position `idx`, and the
    /// position must not hold an unread slot (it would be leaked).
    #[inline]
    pub(crate) unsafe fn write(&self, idx: usize, slot: Slot<T>) {
        debug_assert_index_in_range!("write", idx, self.capacity());
        (*self.slots[idx].get()).write(slot);
    }

    /// Moves the slot out of position `idx`.
    ///
    /// # Safety
    ///
    /// The caller must have exclusive access to position `idx`, the position
    /// must be initialized, and it must be treated as uninitialized afterwards.
    #[inline]
    pub(crate) unsafe fn read(&self, idx: usize) -> Slot<T> {
        debug_assert_index_in_range!("read", idx, self.capacity());
        (*self.slots[idx].get()).assume_init_read()
    }

    /// Drops every unread slot in `[read, write)`.
    ///
    /// # Safety
    ///
    /// Exactly the slots in `[read, write)` must be initialized.
    pub(crate) unsafe fn drop_unread(&mut self, read: usize, write: usize) {
        let mut pos = read;
        while pos != write {
            self.slots[pos].get_mut().assume_init_drop();
            pos = self.advance(pos);
        }
    }
}

/// Storage plus plain read/write indices, accessed through `&mut self`.
///
/// Shared by `SequentialBuffer` (behind a `RefCell`) and `BlockingBuffer`
/// (behind a `Mutex`).
pub(crate) struct LocalRing<T> {
    storage: RingStorage<T>,
    read: usize,
    write: usize,
}

impl<T> LocalRing<T> {
    pub(crate) fn new(config: Config) -> Result<Self, BufferError> {
        Ok(Self {
            storage: RingStorage::new(config)?,
            read: 0,
            write: 0,
        })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.storage.len(self.read, self.write)
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.storage.is_empty(self.read, self.write)
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.storage.is_full(self.read, self.write)
    }

    /// Appends `slot`, handing it back if the ring is full.
    pub(crate) fn push(&mut self, slot: Slot<T>) -> Result<(), Slot<T>> {
        if self.is_full() {
            return Err(slot);
        }
        // SAFETY: `&mut self` gives exclusive access, and position `write`
        // is free because the ring is not full.
        unsafe { self.storage.write(self.write, slot) };
        self.write = self.storage.advance(self.write);

        debug_assert_bounded_len!(self.len(), self.capacity());
        Ok(())
    }

    /// Removes the oldest slot, or `None` if the ring is empty.
    pub(crate) fn pop(&mut self) -> Option<Slot<T>> {
        if self.is_empty() {
            return None;
        }
        debug_assert_occupied!(self.read, self.write);
        // SAFETY: `&mut self` gives exclusive access, and position `read` is
        // initialized because the ring is not empty. `read` advances past it
        // right after, so it is never read twice.
        let slot = unsafe { self.storage.read(self.read) };
        self.read = self.storage.advance(self.read);
        Some(slot)
    }
}

impl<T> Drop for LocalRing<T> {
    fn drop(&mut self) {
        let (read, write) = (self.read, self.write);
        // SAFETY: exactly `[read, write)` is initialized.
        unsafe { self.storage.drop_unread(read, write) };
    }
}
