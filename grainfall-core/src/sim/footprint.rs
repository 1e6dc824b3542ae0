//! Grid geometry
//!
//! Points, velocities and the square footprint a grain covers on the canvas.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer point, in grain-space or canvas-space depending on context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Convert a grain-space point to canvas-space
    ///
    /// Rounds toward negative infinity so that grain-space -1 lands on
    /// canvas column -1 (off the canvas) rather than column 0.
    pub const fn to_canvas(self, resolution: u8) -> Self {
        let r = resolution as i32;
        Self {
            x: self.x.div_euclid(r),
            y: self.y.div_euclid(r),
        }
    }

    /// Convert a canvas-space point to grain-space
    pub const fn to_grain(self, resolution: u8) -> Self {
        let r = resolution as i32;
        Self {
            x: self.x * r,
            y: self.y * r,
        }
    }
}

/// Velocity in grain-space units per tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// Square block of canvas pixels centred on a point
///
/// Covers `center ± size` on both axes, inclusive: `(2 * size + 1)²` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Footprint {
    center: Point,
    size: u8,
}

impl Footprint {
    pub const fn new(center: Point, size: u8) -> Self {
        Self { center, size }
    }

    /// Canvas-space centre
    pub const fn center(&self) -> Point {
        self.center
    }

    /// Half-width
    pub const fn size(&self) -> u8 {
        self.size
    }

    /// Top-left corner (inclusive)
    pub const fn min(&self) -> Point {
        Point::new(
            self.center.x - self.size as i32,
            self.center.y - self.size as i32,
        )
    }

    /// Bottom-right corner (inclusive)
    pub const fn max(&self) -> Point {
        Point::new(
            self.center.x + self.size as i32,
            self.center.y + self.size as i32,
        )
    }

    /// Number of pixels covered
    pub const fn area(&self) -> usize {
        let side = 2 * self.size as usize + 1;
        side * side
    }

    /// Check whether a pixel is covered
    pub fn contains(&self, p: Point) -> bool {
        let (min, max) = (self.min(), self.max());
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }

    /// Check whether two footprints share a pixel
    pub fn overlaps(&self, other: &Footprint) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x <= b_max.x && b_min.x <= a_max.x && a_min.y <= b_max.y && b_min.y <= a_max.y
    }

    /// Check whether every pixel lies within a `width` x `height` canvas
    pub fn fits(&self, dimensions: (u16, u16)) -> bool {
        let (min, max) = (self.min(), self.max());
        min.x >= 0 && min.y >= 0 && max.x < dimensions.0 as i32 && max.y < dimensions.1 as i32
    }

    /// Covered pixels in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = Point> {
        let (min, max) = (self.min(), self.max());
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| Point::new(x, y)))
    }
}
