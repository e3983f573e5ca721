use std::hint;

/// Spin-only backoff (Crossbeam-style, minus the yield phase).
///
/// Each step issues `2^step` PAUSE hints, capped at `2^SPIN_LIMIT`. It never
/// hands the processor back to the scheduler: spinning is the whole point of
/// the buffer that uses it.
#[derive(Debug)]
pub struct Backoff {
    step: u32,
}

impl Backoff {
    const SPIN_LIMIT: u32 = 6; // 2^6 = 64 spins per step at most

    /// Creates a new backoff instance.
    #[inline]
    pub fn new() -> Self {
        Self { step: 0 }
    }

    /// Spin with PAUSE hints, growing the burst until the cap.
    #[inline]
    pub fn spin(&mut self) {
        for _ in 0..1u32 << self.step {
            hint::spin_loop();
        }
        if self.step < Self::SPIN_LIMIT {
            self.step += 1;
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_progression() {
        let mut b = Backoff::new();
        assert_eq!(b.step, 0);

        b.spin();
        assert_eq!(b.step, 1);

        for _ in 1..Backoff::SPIN_LIMIT {
            b.spin();
        }
        assert_eq!(b.step, Backoff::SPIN_LIMIT);

        // Further spins stay at the cap
        b.spin();
        assert_eq!(b.step, Backoff::SPIN_LIMIT);
    }
}
