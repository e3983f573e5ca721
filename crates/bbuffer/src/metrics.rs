use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing how a buffer was used.
///
/// All counters use `Relaxed` ordering: they are statistics, not
/// synchronization, and are only read after the run has been joined.
#[derive(Debug, Default)]
pub struct Metrics {
    puts: AtomicU64,
    gets: AtomicU64,
    producer_waits: AtomicU64,
    consumer_waits: AtomicU64,
}

/// Point-in-time copy of [`Metrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Slots written, terminal slot included.
    pub puts: u64,
    /// Slots read, terminal slot included.
    pub gets: u64,
    /// Puts that found the buffer full and had to wait.
    pub producer_waits: u64,
    /// Gets that found the buffer empty and had to wait.
    pub consumer_waits: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn add_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_get(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_producer_wait(&self) {
        self.producer_waits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_consumer_wait(&self) {
        self.consumer_waits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            puts: self.puts.load(Ordering::Relaxed),
            gets: self.gets.load(Ordering::Relaxed),
            producer_waits: self.producer_waits.load(Ordering::Relaxed),
            consumer_waits: self.consumer_waits.load(Ordering::Relaxed),
        }
    }
}
