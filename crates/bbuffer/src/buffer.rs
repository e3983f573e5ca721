use crate::{BufferError, MetricsSnapshot, Slot};

/// The contract shared by every bounded buffer variant.
///
/// A buffer carries a single stream from one producer to one consumer. The
/// producer ends the stream with exactly one `put(_, true)`; the consumer
/// stops after the `get` that returns a slot with `is_last` set.
///
/// | variant            | `put` when full       | `get` when empty      |
/// |--------------------|-----------------------|-----------------------|
/// | `SequentialBuffer` | `Err(Full)`           | `Err(Empty)`          |
/// | `BlockingBuffer`   | suspends on a condvar | suspends on a condvar |
/// | `SpinBuffer`       | spins                 | spins                 |
///
/// `try_get` never waits on any variant.
pub trait Buffer<T> {
    /// Total number of slots.
    fn size(&self) -> usize;

    /// Number of unread slots.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool;

    fn is_full(&self) -> bool;

    /// Writes `value` with the end-of-stream marker `is_last`.
    fn put(&self, value: T, is_last: bool) -> Result<(), BufferError>;

    /// Reads the oldest unread slot.
    fn get(&self) -> Result<Slot<T>, BufferError>;

    /// Reads the oldest unread slot without waiting.
    fn try_get(&self) -> Result<Slot<T>, BufferError>;

    /// Usage counters (all zero unless metrics were enabled).
    fn metrics(&self) -> MetricsSnapshot;

    /// Number of slots that can hold live data.
    fn usable_capacity(&self) -> usize {
        self.size() - 1
    }
}
