//! Monotonic clock abstraction
//!
//! Provides a trait for reading a free-running timestamp that never goes
//! backwards. Board implementations usually wrap a hardware timer.

use core::time::Duration;

/// Monotonic time source
///
/// Implementations must never return a smaller value than a previous call.
/// Wrapping is not expected: a `u64` microsecond counter lasts long enough.
pub trait MonotonicClock {
    /// Microseconds since an arbitrary fixed epoch
    fn now_micros(&self) -> u64;

    /// Time elapsed since an earlier timestamp
    ///
    /// Saturates at zero if `earlier_us` lies in the future.
    fn elapsed_since(&self, earlier_us: u64) -> Duration {
        Duration::from_micros(self.now_micros().saturating_sub(earlier_us))
    }
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for &T {
    fn now_micros(&self) -> u64 {
        (**self).now_micros()
    }
}

/// Host clock backed by `std::time::Instant`
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    epoch: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Create a clock whose epoch is now
    pub fn new() -> Self {
        Self {
            epoch: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl MonotonicClock for StdClock {
    fn now_micros(&self) -> u64 {
        self.epoch.elapsed().as_micros() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct FixedClock(Cell<u64>);

    impl MonotonicClock for FixedClock {
        fn now_micros(&self) -> u64 {
            self.0.get()
        }
    }

    #[test]
    fn test_elapsed_since() {
        let clock = FixedClock(Cell::new(1_500));
        assert_eq!(clock.elapsed_since(500), Duration::from_micros(1_000));

        clock.0.set(2_000);
        assert_eq!(clock.elapsed_since(500), Duration::from_micros(1_500));
    }

    #[test]
    fn test_elapsed_since_future_saturates() {
        let clock = FixedClock(Cell::new(100));
        assert_eq!(clock.elapsed_since(200), Duration::ZERO);
    }

    #[test]
    fn test_reference_forwards() {
        let clock = FixedClock(Cell::new(42));
        let by_ref = &clock;
        assert_eq!(by_ref.now_micros(), 42);
    }
}
