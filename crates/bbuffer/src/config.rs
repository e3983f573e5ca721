use crate::BufferError;
use std::fmt;
use std::str::FromStr;

/// Smallest legal capacity. One slot always stays empty to tell full from empty.
pub const MIN_CAPACITY: usize = 2;

/// Configuration shared by every buffer variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of slots in the ring (usable capacity is one less)
    pub capacity: usize,
    /// Enable metrics collection (slight overhead)
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a new configuration with custom settings.
    pub const fn new(capacity: usize, enable_metrics: bool) -> Self {
        Self {
            capacity,
            enable_metrics,
        }
    }

    /// Returns the number of slots that can hold live data.
    #[inline]
    pub const fn usable_capacity(&self) -> usize {
        self.capacity.saturating_sub(1)
    }

    /// Rejects capacities that would leave no usable slot.
    pub fn validate(&self) -> Result<(), BufferError> {
        if self.capacity < MIN_CAPACITY {
            return Err(BufferError::InvalidCapacity {
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1024,
            enable_metrics: false,
        }
    }
}

/// Low latency configuration (64 slots, stays in L1 cache for small items)
pub const LOW_LATENCY_CONFIG: Config = Config::new(64, false);

/// High throughput configuration (64K slots)
pub const HIGH_THROUGHPUT_CONFIG: Config = Config::new(1 << 16, false);

/// Synchronization strategy of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Single-threaded, producer and consumer interleaved in one loop.
    Sequential,
    /// Mutex and two condition variables; waiting threads are suspended.
    Blocking,
    /// Atomic indices; waiting threads spin.
    Spin,
}

impl BufferKind {
    /// All variants, in increasing order of concurrency.
    pub const ALL: [BufferKind; 3] = [Self::Sequential, Self::Blocking, Self::Spin];

    /// Short name used on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sequential => "seq",
            Self::Blocking => "blocking",
            Self::Spin => "spin",
        }
    }
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BufferKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seq" | "sequential" => Ok(Self::Sequential),
            "blocking" | "locked" => Ok(Self::Blocking),
            "spin" | "atomic" => Ok(Self::Spin),
            other => Err(format!(
                "unknown buffer kind `{other}` (expected seq, blocking or spin)"
            )),
        }
    }
}
