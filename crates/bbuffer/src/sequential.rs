use crate::storage::LocalRing;
use crate::{Buffer, BufferError, Config, Metrics, MetricsSnapshot, Slot};
use std::cell::RefCell;

/// Single-threaded bounded buffer.
///
/// Used when producer and consumer are interleaved in one control flow. The
/// caller checks [`Buffer::is_full`] / [`Buffer::is_empty`] before every
/// `put` / `get`; breaking that contract yields [`BufferError::Full`] or
/// [`BufferError::Empty`] and leaves the buffer untouched.
///
/// The type is `!Sync`, so it cannot be shared between threads.
pub struct SequentialBuffer<T> {
    ring: RefCell<LocalRing<T>>,
    metrics: Metrics,
    config: Config,
}

impl<T> SequentialBuffer<T> {
    pub fn new(config: Config) -> Result<Self, BufferError> {
        Ok(Self {
            ring: RefCell::new(LocalRing::new(config)?),
            metrics: Metrics::new(),
            config,
        })
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, BufferError> {
        Self::new(Config::new(capacity, false))
    }
}

impl<T> Buffer<T> for SequentialBuffer<T> {
    #[inline]
    fn size(&self) -> usize {
        self.config.capacity
    }

    #[inline]
    fn len(&self) -> usize {
        self.ring.borrow().len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.ring.borrow().is_empty()
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.ring.borrow().is_full()
    }

    fn put(&self, value: T, is_last: bool) -> Result<(), BufferError> {
        self.ring
            .borrow_mut()
            .push(Slot::new(value, is_last))
            .map_err(|_| BufferError::Full)?;
        if self.config.enable_metrics {
            self.metrics.add_put();
        }
        Ok(())
    }

    fn get(&self) -> Result<Slot<T>, BufferError> {
        let slot = self.ring.borrow_mut().pop().ok_or(BufferError::Empty)?;
        if self.config.enable_metrics {
            self.metrics.add_get();
        }
        Ok(slot)
    }

    #[inline]
    fn try_get(&self) -> Result<Slot<T>, BufferError> {
        self.get()
    }

    fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
