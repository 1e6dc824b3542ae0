//! Blocking delay abstraction
//!
//! Boards already expose `embedded_hal::delay::DelayNs`, so the trait is
//! re-exported instead of redefined.

pub use embedded_hal::delay::DelayNs;

/// Host delay backed by `std::thread::sleep`
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }
}
