//! Grainfall Hardware Abstraction Layer
//!
//! This crate defines the time abstractions the simulation needs from the
//! board it runs on. The same simulation code runs on the handheld and on a
//! host machine (tests, desktop preview).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  grainfall-core (simulation, pacing)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  grainfall-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ board timer   │       │  std (host)   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`clock::MonotonicClock`] - Monotonic microsecond timestamps
//! - [`delay::DelayNs`] - Blocking delays (re-exported from `embedded-hal`)

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod delay;

// Re-export key traits at crate root for convenience
pub use clock::MonotonicClock;
pub use delay::DelayNs;

#[cfg(feature = "std")]
pub use clock::StdClock;
#[cfg(feature = "std")]
pub use delay::StdDelay;
