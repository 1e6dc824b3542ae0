//! Board-agnostic sand toy simulation for the Grainfall handheld
//!
//! This crate contains everything that does not depend on specific
//! hardware:
//!
//! - Sand simulation (grains, gravity, collisions, placement)
//! - Tick pacing on top of the `grainfall-hal` clock and delay traits
//! - Configuration types, TOML loading and persistent storage
//!
//! Grains are drawn on a [`grainfall_display::Canvas`], which is also what
//! the simulation reads to decide whether a pixel is free.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod pacing;
pub mod sim;

pub use config::{ConfigError, SandConfig, VelocityClamp};
pub use pacing::{Pacer, TickPacer, Unpaced};
pub use sim::{Grain, Gravity, Point, TickReport, Velocity, World};
