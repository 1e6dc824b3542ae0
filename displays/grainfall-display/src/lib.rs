//! Pixel canvas abstraction and framebuffer for Grainfall
//!
//! This crate provides:
//! - `Canvas` trait: random access to a grid of pixel values with bounds
//!   checking
//! - `Bitmap`: a packed 1-bit-per-pixel framebuffer implementing `Canvas`
//!
//! # Architecture
//!
//! The simulation draws grains straight into a `Canvas` and reads it back to
//! detect collisions, so the canvas is both the picture and the occupancy
//! map. A display driver (outside this workspace) pushes the changed rows of
//! the `Bitmap` to the panel after each tick.
//!
//! ## Supported Display Types
//!
//! - **Memory LCDs** (e.g., Sharp 144x168): line-addressed, so only dirty
//!   rows are sent. Use [`SharpBitmap`].
//! - **Anything else**: implement [`Canvas`] over the driver's own buffer.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bitmap;
pub mod canvas;

// Re-export key types
pub use bitmap::{Bitmap, SharpBitmap, SHARP_HEIGHT, SHARP_WIDTH};
pub use canvas::{Canvas, CanvasError};
