//! Tick pacing
//!
//! Spaces simulation steps at least a minimum interval apart.

pub mod pacer;

pub use pacer::{Pacer, TickPacer, Unpaced};
