//! Sand simulation
//!
//! Grains fall under a gravity vector that changes direction now and then,
//! colliding with each other and with the canvas edges.

pub mod collision;
pub mod footprint;
pub mod grain;
pub mod gravity;
pub mod placement;
pub mod world;

pub use footprint::{Footprint, Point, Velocity};
pub use grain::Grain;
pub use gravity::{Gravity, MAX_DIRECTION};
pub use world::{TickReport, World};
