use crate::storage::LocalRing;
use crate::{Buffer, BufferError, Config, Metrics, MetricsSnapshot, Slot};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Bounded buffer guarded by a mutex, with suspension instead of spinning.
///
/// A full buffer parks the producer on `space_available`; an empty one parks
/// the consumer on `data_available`. Each side signals the other exactly once
/// per completed operation, after releasing the lock.
///
/// `put` and `get` never fail once the buffer has been constructed; they only
/// wait. A producer whose consumer has gone away waits forever.
pub struct BlockingBuffer<T> {
    ring: Mutex<LocalRing<T>>,
    /// Signaled by the consumer after every `get`.
    space_available: Condvar,
    /// Signaled by the producer after every `put`.
    data_available: Condvar,
    metrics: Metrics,
    config: Config,
}

impl<T> BlockingBuffer<T> {
    pub fn new(config: Config) -> Result<Self, BufferError> {
        Ok(Self {
            ring: Mutex::new(LocalRing::new(config)?),
            space_available: Condvar::new(),
            data_available: Condvar::new(),
            metrics: Metrics::new(),
            config,
        })
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, BufferError> {
        Self::new(Config::new(capacity, false))
    }

    /// Nothing panics while the lock is held, so a poisoned lock still
    /// guards a consistent ring.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, LocalRing<T>> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Buffer<T> for BlockingBuffer<T> {
    #[inline]
    fn size(&self) -> usize {
        self.config.capacity
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn is_full(&self) -> bool {
        self.lock().is_full()
    }

    fn put(&self, value: T, is_last: bool) -> Result<(), BufferError> {
        let mut ring = self.lock();
        if ring.is_full() {
            if self.config.enable_metrics {
                self.metrics.add_producer_wait();
            }
            ring = self
                .space_available
                .wait_while(ring, |r| r.is_full())
                .unwrap_or_else(PoisonError::into_inner);
        }
        ring.push(Slot::new(value, is_last))
            .map_err(|_| BufferError::Full)?;
        drop(ring);

        if self.config.enable_metrics {
            self.metrics.add_put();
        }
        self.data_available.notify_one();
        Ok(())
    }

    fn get(&self) -> Result<Slot<T>, BufferError> {
        let mut ring = self.lock();
        if ring.is_empty() {
            if self.config.enable_metrics {
                self.metrics.add_consumer_wait();
            }
            ring = self
                .data_available
                .wait_while(ring, |r| r.is_empty())
                .unwrap_or_else(PoisonError::into_inner);
        }
        let slot = ring.pop().ok_or(BufferError::Empty)?;
        drop(ring);

        if self.config.enable_metrics {
            self.metrics.add_get();
        }
        self.space_available.notify_one();
        Ok(slot)
    }

    fn try_get(&self) -> Result<Slot<T>, BufferError> {
        let slot = self.lock().pop().ok_or(BufferError::Empty)?;
        if self.config.enable_metrics {
            self.metrics.add_get();
        }
        self.space_available.notify_one();
        Ok(slot)
    }

    fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
