//! Gravity vector
//!
//! Gravity has a fixed magnitude and a direction angle. Now and then the
//! direction jumps to a new random angle, which is what keeps the sand
//! moving.

use rand::Rng;
use rand_core::RngCore;

/// Largest direction index drawn on a change
///
/// Directions are the integers `0..=MAX_DIRECTION` used directly as radians,
/// so they cover roughly 0° to 344° in uneven steps.
pub const MAX_DIRECTION: u8 = 6;

/// Gravity vector derived from a direction angle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gravity {
    /// Direction in radians (0 = up the screen, π = down)
    direction: f32,
    magnitude: f32,
    x: f32,
    y: f32,
}

impl Gravity {
    pub fn new(direction: f32, magnitude: f32) -> Self {
        let mut gravity = Self {
            direction,
            magnitude,
            x: 0.0,
            y: 0.0,
        };
        gravity.set_direction(direction);
        gravity
    }

    /// Point gravity along `direction` radians
    ///
    /// `(x, y) = (-sin(direction), -cos(direction)) * magnitude`
    pub fn set_direction(&mut self, direction: f32) {
        self.direction = direction;
        self.x = -libm::sinf(direction) * self.magnitude;
        self.y = -libm::cosf(direction) * self.magnitude;
    }

    /// Maybe pick a new direction
    ///
    /// With `change_percent` percent probability a direction index is drawn
    /// uniformly from `0..=MAX_DIRECTION`. Returns true if the direction was
    /// redrawn (it may land on the same angle). No random numbers are drawn
    /// when `change_percent` is zero.
    pub fn maybe_rotate<R: RngCore>(&mut self, rng: &mut R, change_percent: u8) -> bool {
        if change_percent == 0 || rng.gen_range(0..100u8) >= change_percent {
            return false;
        }
        let index = rng.gen_range(0..=MAX_DIRECTION);
        self.set_direction(index as f32);
        true
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    /// Horizontal component (positive = right)
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component (positive = down the screen)
    pub fn y(&self) -> f32 {
        self.y
    }
}
