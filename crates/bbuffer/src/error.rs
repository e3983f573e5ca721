//! Error types for buffer operations.

use thiserror::Error;

/// Errors that can occur when building or using a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// `put` on a full sequential buffer.
    #[error("buffer is full")]
    Full,

    /// `get` on an empty sequential buffer, or `try_get` on any empty buffer.
    #[error("buffer is empty")]
    Empty,

    /// The requested capacity leaves no usable slot.
    #[error("invalid capacity {capacity}: at least 2 slots are required")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },

    /// A second thread entered `put` while another producer was inside it.
    #[error("concurrent producers on a single-producer buffer")]
    ProducerContended,

    /// A second thread entered `get` while another consumer was inside it.
    #[error("concurrent consumers on a single-consumer buffer")]
    ConsumerContended,
}

impl BufferError {
    /// Returns `true` if the error is a caller defect rather than a
    /// configuration problem.
    #[inline]
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, Self::InvalidCapacity { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_violation_classification() {
        assert!(BufferError::Full.is_contract_violation());
        assert!(BufferError::Empty.is_contract_violation());
        assert!(BufferError::ProducerContended.is_contract_violation());
        assert!(!BufferError::InvalidCapacity { capacity: 1 }.is_contract_violation());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            BufferError::InvalidCapacity { capacity: 1 }.to_string(),
            "invalid capacity 1: at least 2 slots are required"
        );
        assert_eq!(BufferError::Full.to_string(), "buffer is full");
    }
}
