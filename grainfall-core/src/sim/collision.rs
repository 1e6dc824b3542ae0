//! Collision probing against the canvas
//!
//! The canvas is the only occupancy map: a pixel is taken when it holds
//! anything other than the background value, and pixels off the canvas are
//! always taken.

use heapless::Vec;

use grainfall_display::Canvas;

use super::footprint::{Footprint, Point};
use crate::config::MAX_FOOTPRINT_PIXELS;

/// Blocked pixels found by a probe
pub type BlockedPixels = Vec<Point, MAX_FOOTPRINT_PIXELS>;

/// Check whether a canvas pixel is unavailable
pub fn is_blocked<C: Canvas>(canvas: &C, p: Point, background: u8) -> bool {
    match canvas.get(p.x, p.y) {
        Ok(value) => value != background,
        Err(_) => true,
    }
}

/// Pixels of `candidate` that are blocked
///
/// Pixels inside `current` (the grain's own footprint) are skipped: a grain
/// never collides with itself.
pub fn blocked_pixels<C: Canvas>(
    canvas: &C,
    current: Option<&Footprint>,
    candidate: &Footprint,
    background: u8,
) -> BlockedPixels {
    let mut blocked = BlockedPixels::new();
    for p in candidate.pixels() {
        if current.is_some_and(|own| own.contains(p)) {
            continue;
        }
        if is_blocked(canvas, p, background) {
            // A footprint never exceeds MAX_FOOTPRINT_PIXELS
            let _ = blocked.push(p);
        }
    }
    blocked
}

/// Per-axis side on which a grain is blocked
///
/// Each component is -1, 0 or +1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlockDirection {
    pub x: i8,
    pub y: i8,
}

/// Sign of the summed offsets from `origin` to the blocked pixels, per axis
///
/// Assumes a single step never blocks on both sides of the same axis: steps
/// are bounded by the terminal velocity, so the blocked pixels sit ahead of
/// the grain. If that does not hold the sums cancel and the axis reads 0.
pub fn block_direction(origin: Point, blocked: &[Point]) -> BlockDirection {
    let (dx, dy) = blocked.iter().fold((0i64, 0i64), |(sx, sy), p| {
        (
            sx + (p.x - origin.x) as i64,
            sy + (p.y - origin.y) as i64,
        )
    });
    BlockDirection {
        x: dx.signum() as i8,
        y: dy.signum() as i8,
    }
}
