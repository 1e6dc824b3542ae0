//! Tick pacing
//!
//! Guarantees a minimum wall-clock spacing between simulation steps. The
//! spacing is a lower bound only: a slow step or a late driver makes the
//! interval longer, never shorter.

use core::time::Duration;

use grainfall_hal::{DelayNs, MonotonicClock};

/// Blocks the caller until the next tick may run
pub trait Pacer {
    /// Wait until at least `min_interval` has passed since the previous tick
    ///
    /// Records the new tick time and returns the actual interval.
    fn wait(&mut self, min_interval: Duration) -> Duration;
}

/// Pacer built from a monotonic clock and a blocking delay
///
/// The delay is only a hint: after sleeping, the clock is read again and the
/// pacer keeps waiting until the interval really has elapsed.
#[derive(Debug)]
pub struct TickPacer<K, D> {
    clock: K,
    delay: D,
    /// Timestamp of the previous tick (microseconds)
    last_tick_us: u64,
}

impl<K: MonotonicClock, D: DelayNs> TickPacer<K, D> {
    /// Create a pacer; the first interval is measured from now
    pub fn new(clock: K, delay: D) -> Self {
        let last_tick_us = clock.now_micros();
        Self {
            clock,
            delay,
            last_tick_us,
        }
    }

    /// Timestamp of the previous tick (microseconds)
    pub fn last_tick_us(&self) -> u64 {
        self.last_tick_us
    }
}

impl<K: MonotonicClock, D: DelayNs> Pacer for TickPacer<K, D> {
    fn wait(&mut self, min_interval: Duration) -> Duration {
        loop {
            let elapsed = self.clock.elapsed_since(self.last_tick_us);
            if elapsed >= min_interval {
                self.last_tick_us += elapsed.as_micros() as u64;
                return elapsed;
            }

            let remaining = (min_interval - elapsed).as_nanos().min(u32::MAX as u128) as u32;
            self.delay.delay_ns(remaining);
        }
    }
}

/// Pacer that never waits
///
/// For drivers that already run on a fixed-rate timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unpaced;

impl Pacer for Unpaced {
    fn wait(&mut self, _min_interval: Duration) -> Duration {
        Duration::ZERO
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use core::cell::Cell;

    /// Clock reading a shared counter
    #[derive(Clone, Copy)]
    pub(crate) struct FakeClock<'a>(pub &'a Cell<u64>);

    impl MonotonicClock for FakeClock<'_> {
        fn now_micros(&self) -> u64 {
            self.0.get()
        }
    }

    /// Delay that advances the shared counter instead of sleeping
    ///
    /// `overshoot_us` is added to each delay to model a sluggish timer;
    /// `wake_early` makes every delay return after half the requested time.
    pub(crate) struct FakeDelay<'a> {
        pub now: &'a Cell<u64>,
        pub overshoot_us: u64,
        pub wake_early: bool,
        pub calls: u32,
    }

    impl<'a> FakeDelay<'a> {
        pub(crate) fn new(now: &'a Cell<u64>) -> Self {
            Self {
                now,
                overshoot_us: 0,
                wake_early: false,
                calls: 0,
            }
        }
    }

    impl DelayNs for FakeDelay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            self.calls += 1;
            let mut us = (ns as u64 + 999) / 1000;
            if self.wake_early {
                us /= 2;
            }
            self.now.set(self.now.get() + (us + self.overshoot_us).max(1));
        }
    }

    #[test]
    fn test_waits_for_minimum_interval() {
        let now = Cell::new(1_000);
        let mut pacer = TickPacer::new(FakeClock(&now), FakeDelay::new(&now));

        let elapsed = pacer.wait(Duration::from_millis(100));
        assert_eq!(elapsed, Duration::from_millis(100));
        assert_eq!(now.get(), 101_000);
        assert_eq!(pacer.last_tick_us(), 101_000);
    }

    #[test]
    fn test_no_wait_when_interval_already_passed() {
        let now = Cell::new(0);
        let mut pacer = TickPacer::new(FakeClock(&now), FakeDelay::new(&now));

        now.set(250_000);
        let elapsed = pacer.wait(Duration::from_millis(100));
        assert_eq!(elapsed, Duration::from_millis(250));
        assert_eq!(now.get(), 250_000);
    }

    #[test]
    fn test_early_wakeup_keeps_waiting() {
        let now = Cell::new(0);
        let mut delay = FakeDelay::new(&now);
        delay.wake_early = true;
        let mut pacer = TickPacer::new(FakeClock(&now), delay);

        let elapsed = pacer.wait(Duration::from_millis(100));
        assert!(elapsed >= Duration::from_millis(100));
        assert!(pacer.delay.calls > 1);
    }

    #[test]
    fn test_interval_is_lower_bound() {
        let now = Cell::new(0);
        let mut delay = FakeDelay::new(&now);
        delay.overshoot_us = 7_000;
        let mut pacer = TickPacer::new(FakeClock(&now), delay);

        for _ in 0..5 {
            let elapsed = pacer.wait(Duration::from_millis(10));
            assert!(elapsed >= Duration::from_millis(10));
            assert_eq!(elapsed, Duration::from_millis(17));
        }
    }

    #[test]
    fn test_clock_behind_last_tick() {
        let now = Cell::new(5_000);
        let mut pacer = TickPacer::new(FakeClock(&now), FakeDelay::new(&now));

        // A zero interval never waits, even if the clock reads earlier
        now.set(4_000);
        assert_eq!(pacer.wait(Duration::ZERO), Duration::ZERO);
        assert_eq!(pacer.last_tick_us(), 5_000);

        // Waiting resumes from the recorded tick, not from the stale reading
        let elapsed = pacer.wait(Duration::from_millis(2));
        assert_eq!(elapsed, Duration::from_millis(2));
        assert_eq!(pacer.last_tick_us(), 7_000);
    }

    #[test]
    fn test_sub_microsecond_remainder() {
        let now = Cell::new(0);
        let mut pacer = TickPacer::new(FakeClock(&now), FakeDelay::new(&now));

        let elapsed = pacer.wait(Duration::from_nanos(2_500));
        assert_eq!(elapsed, Duration::from_micros(3));
        assert_eq!(pacer.last_tick_us(), 3);
    }

    #[test]
    fn test_unpaced_never_waits() {
        let mut pacer = Unpaced;
        assert_eq!(pacer.wait(Duration::from_secs(5)), Duration::ZERO);
    }
}
