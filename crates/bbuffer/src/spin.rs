use crate::invariants::{debug_assert_bounded_len, debug_assert_occupied};
use crate::storage::RingStorage;
use crate::{Backoff, Buffer, BufferError, Config, Metrics, MetricsSnapshot, Slot};
use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// Classic lock-free SPSC hand-off over two wrapped indices.
//
// **Producer (`put`):**
// 1. Load `write` with Relaxed (only the producer stores it)
// 2. Load `read` with Acquire until `advance(write) != read`
//    (synchronizes with the consumer's Release store: the consumer has
//    finished moving the old value out of the slot we are about to reuse)
// 3. Write the slot at `write` (plain write, the slot is ours)
// 4. Store `advance(write)` into `write` with Release (publishes the slot)
//
// **Consumer (`get`):**
// 1. Load `read` with Relaxed (only the consumer stores it)
// 2. Load `write` with Acquire until `write != read`
//    (synchronizes with the producer's Release store: the slot is written)
// 3. Move the slot out of `read`
// 4. Store `advance(read)` into `read` with Release (hands the slot back)
//
// ## Single-Writer Roles
//
// Each index has exactly one writer. The `put` and `get` methods take `&self`,
// so the role is enforced at run time: entering `put` swaps `producer_busy`
// to true (Acquire) and leaving it stores false (Release); a concurrent second
// producer gets `ProducerContended` instead of racing on the slot. The same
// flag handoff also orders successive producers on different threads, so the
// Relaxed load of the own index in step 1 always sees the latest value.
//
// =============================================================================

/// Bounded buffer with atomic indices; waiting sides spin instead of sleeping.
///
/// Trades CPU burn for latency: no suspension and no wake-up cost. Only worth
/// it when producer and consumer are almost always ready.
pub struct SpinBuffer<T> {
    // === PRODUCER HOT ===
    /// Next position to write (written by producer, read by consumer)
    write: CachePadded<AtomicUsize>,
    producer_busy: CachePadded<AtomicBool>,

    // === CONSUMER HOT ===
    /// Next position to read (written by consumer, read by producer)
    read: CachePadded<AtomicUsize>,
    consumer_busy: CachePadded<AtomicBool>,

    // === COLD ===
    metrics: Metrics,
    config: Config,

    storage: RingStorage<T>,
}

// Safety: slots are handed between threads by the Acquire/Release index
// protocol above, and the role flags keep each index single-writer.
unsafe impl<T: Send> Sync for SpinBuffer<T> {}

impl<T> SpinBuffer<T> {
    pub fn new(config: Config) -> Result<Self, BufferError> {
        Ok(Self {
            write: CachePadded::new(AtomicUsize::new(0)),
            producer_busy: CachePadded::new(AtomicBool::new(false)),
            read: CachePadded::new(AtomicUsize::new(0)),
            consumer_busy: CachePadded::new(AtomicBool::new(false)),
            metrics: Metrics::new(),
            config,
            storage: RingStorage::new(config)?,
        })
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, BufferError> {
        Self::new(Config::new(capacity, false))
    }

    /// Blocks (spinning) until the consumer frees the slot after `write`.
    #[inline]
    fn wait_for_space(&self, next: usize) {
        if next != self.read.load(Ordering::Acquire) {
            return;
        }
        if self.config.enable_metrics {
            self.metrics.add_producer_wait();
        }
        let mut backoff = Backoff::new();
        while next == self.read.load(Ordering::Acquire) {
            backoff.spin();
        }
    }

    /// Blocks (spinning) until the producer publishes a slot at `read`.
    /// Returns the observed write index.
    #[inline]
    fn wait_for_data(&self, read: usize) -> usize {
        let mut write = self.write.load(Ordering::Acquire);
        if write != read {
            return write;
        }
        if self.config.enable_metrics {
            self.metrics.add_consumer_wait();
        }
        let mut backoff = Backoff::new();
        while write == read {
            backoff.spin();
            write = self.write.load(Ordering::Acquire);
        }
        write
    }

    /// Moves the slot at `read` out and hands the position back.
    ///
    /// Caller holds the consumer role and has observed `write != read` with
    /// an Acquire load.
    #[inline]
    fn take(&self, read: usize, write: usize) -> Slot<T> {
        debug_assert_occupied!(read, write);
        // SAFETY: the Acquire load of `write` synchronized with the producer's
        // Release store, so the slot at `read` is initialized and the producer
        // will not touch it until `read` moves past it.
        let slot = unsafe { self.storage.read(read) };
        self.read.store(self.storage.advance(read), Ordering::Release);

        if self.config.enable_metrics {
            self.metrics.add_get();
        }
        slot
    }
}

impl<T> Buffer<T> for SpinBuffer<T> {
    #[inline]
    fn size(&self) -> usize {
        self.storage.capacity()
    }

    fn len(&self) -> usize {
        let read = self.read.load(Ordering::Acquire);
        let write = self.write.load(Ordering::Acquire);
        self.storage.len(read, write)
    }

    fn is_empty(&self) -> bool {
        let read = self.read.load(Ordering::Acquire);
        let write = self.write.load(Ordering::Acquire);
        self.storage.is_empty(read, write)
    }

    fn is_full(&self) -> bool {
        let read = self.read.load(Ordering::Acquire);
        let write = self.write.load(Ordering::Acquire);
        self.storage.is_full(read, write)
    }

    fn put(&self, value: T, is_last: bool) -> Result<(), BufferError> {
        let _role = RoleGuard::claim(&self.producer_busy, BufferError::ProducerContended)?;

        let write = self.write.load(Ordering::Relaxed);
        let next = self.storage.advance(write);
        self.wait_for_space(next);

        // SAFETY: we hold the producer role and `next != read`, so the slot at
        // `write` is free and the consumer will not read it before the
        // Release store below.
        unsafe { self.storage.write(write, Slot::new(value, is_last)) };
        self.write.store(next, Ordering::Release);

        debug_assert_bounded_len!(
            self.storage.len(self.read.load(Ordering::Relaxed), next),
            self.storage.capacity()
        );
        if self.config.enable_metrics {
            self.metrics.add_put();
        }
        Ok(())
    }

    fn get(&self) -> Result<Slot<T>, BufferError> {
        let _role = RoleGuard::claim(&self.consumer_busy, BufferError::ConsumerContended)?;

        let read = self.read.load(Ordering::Relaxed);
        let write = self.wait_for_data(read);
        Ok(self.take(read, write))
    }

    fn try_get(&self) -> Result<Slot<T>, BufferError> {
        let _role = RoleGuard::claim(&self.consumer_busy, BufferError::ConsumerContended)?;

        let read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Acquire);
        if write == read {
            return Err(BufferError::Empty);
        }
        Ok(self.take(read, write))
    }

    fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl<T> Drop for SpinBuffer<T> {
    fn drop(&mut self) {
        let read = *self.read.get_mut();
        let write = *self.write.get_mut();
        // SAFETY: `&mut self` means both threads are gone, and exactly
        // `[read, write)` is initialized.
        unsafe { self.storage.drop_unread(read, write) };
    }
}

/// Holds the producer or consumer role for the duration of one operation.
struct RoleGuard<'a> {
    busy: &'a AtomicBool,
}

impl<'a> RoleGuard<'a> {
    #[inline]
    fn claim(busy: &'a AtomicBool, contended: BufferError) -> Result<Self, BufferError> {
        if busy.swap(true, Ordering::Acquire) {
            return Err(contended);
        }
        Ok(Self { busy })
    }
}

impl Drop for RoleGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
