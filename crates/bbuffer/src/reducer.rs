//! Accumulators fed by the consumer side of a run.

/// A stateful sink. Results are read through the implementor's own
/// accessors once the run is over.
pub trait Reducer<T> {
    fn reduce(&mut self, value: T);
}

impl<T, F: FnMut(T)> Reducer<T> for F {
    #[inline]
    fn reduce(&mut self, value: T) {
        self(value);
    }
}

/// Running minimum and maximum of `i64` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinMaxReducer {
    min: i64,
    max: i64,
}

impl MinMaxReducer {
    /// Starts at the identity: `min = i64::MAX`, `max = i64::MIN`.
    pub const fn new() -> Self {
        Self {
            min: i64::MAX,
            max: i64::MIN,
        }
    }

    pub const fn min(&self) -> i64 {
        self.min
    }

    pub const fn max(&self) -> i64 {
        self.max
    }
}

impl Default for MinMaxReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer<i64> for MinMaxReducer {
    #[inline]
    fn reduce(&mut self, value: i64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// Total byte length of the strings seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteCountReducer {
    count: u64,
}

impl ByteCountReducer {
    pub const fn new() -> Self {
        Self { count: 0 }
    }

    pub const fn count(&self) -> u64 {
        self.count
    }
}

impl Reducer<String> for ByteCountReducer {
    #[inline]
    fn reduce(&mut self, value: String) {
        self.count += value.len() as u64;
    }
}
