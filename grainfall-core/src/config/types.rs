//! Configuration type definitions
//!
//! Tuning for the sand simulation. Everything the simulation reads at runtime
//! comes from a [`SandConfig`] passed in at construction; there is no global
//! state.

use core::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum grains per world
pub const MAX_GRAINS: usize = 256;

/// Maximum footprint half-width
pub const MAX_GRAIN_SIZE: u8 = 7;

/// Pixels covered by the largest possible footprint
pub const MAX_FOOTPRINT_PIXELS: usize = (2 * MAX_GRAIN_SIZE as usize + 1).pow(2);

/// Largest value accepted for `gravity_change_percent`
pub const MAX_PERCENT: u8 = 100;

/// Configuration errors
///
/// Reported synchronously when a world is built; a world is never created
/// from an invalid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Grain count is zero
    NoGrains,
    /// Grain count exceeds `MAX_GRAINS`
    TooManyGrains,
    /// Grain size exceeds `MAX_GRAIN_SIZE`
    GrainTooLarge,
    /// Canvas not larger than a grain footprint in both directions
    CanvasTooSmall,
    /// Resolution is zero
    InvalidResolution,
    /// Gravity, bounce or terminal velocity out of range (or not finite)
    InvalidPhysics,
    /// Foreground and background colors are equal
    InvalidColors,
    /// Gravity change probability above 100%
    InvalidProbability,
    /// Not enough free cells to place every grain
    PlacementExhausted,
    /// An explicit grain position puts its footprint off the canvas
    GrainOutOfBounds,
    /// Two explicit grain positions have overlapping footprints
    GrainsOverlap,
}

/// How the per-axis velocity limit is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VelocityClamp {
    /// Limit the magnitude of each component: `-t <= v <= t`
    #[default]
    Symmetric,
    /// Only cap each component from above: `v <= t`
    ///
    /// Matches the first handheld build, where negative components could
    /// grow without bound while gravity pointed up or left.
    CeilingOnly,
}

impl VelocityClamp {
    /// Apply the limit to a single component
    pub fn apply(self, value: f32, terminal: f32) -> f32 {
        match self {
            VelocityClamp::Symmetric => value.clamp(-terminal, terminal),
            VelocityClamp::CeilingOnly => value.min(terminal),
        }
    }
}

/// Sand simulation configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SandConfig {
    /// Number of grains placed at start
    pub grain_count: u16,
    /// Footprint half-width in pixels (0 = single pixel)
    pub grain_size: u8,
    /// Grain-space units per canvas pixel
    pub resolution: u8,
    /// Length of the gravity vector (grain-space units per tick²)
    pub gravity_magnitude: f32,
    /// Rebound scaling after a collision
    pub bounce_factor: f32,
    /// Per-axis velocity limit (grain-space units per tick)
    pub terminal_velocity: f32,
    /// Chance per tick, in percent, of picking a new gravity direction
    pub gravity_change_percent: u8,
    /// Gravity direction before the first change (radians, π = down)
    pub initial_direction: f32,
    /// Velocity limit mode
    pub velocity_clamp: VelocityClamp,
    /// Canvas value for empty pixels
    pub background: u8,
    /// Canvas value for grain pixels
    pub foreground: u8,
}

impl Default for SandConfig {
    fn default() -> Self {
        Self {
            grain_count: 10,
            grain_size: 2,
            resolution: 2,
            gravity_magnitude: 4.0,
            bounce_factor: 0.5,
            terminal_velocity: 8.0,
            gravity_change_percent: 10,
            initial_direction: PI,
            velocity_clamp: VelocityClamp::Symmetric,
            background: 0,
            foreground: 1,
        }
    }
}

impl SandConfig {
    /// Check the configuration on its own, without a canvas
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grain_count == 0 {
            return Err(ConfigError::NoGrains);
        }
        if self.grain_count as usize > MAX_GRAINS {
            return Err(ConfigError::TooManyGrains);
        }
        if self.grain_size > MAX_GRAIN_SIZE {
            return Err(ConfigError::GrainTooLarge);
        }
        if self.resolution == 0 {
            return Err(ConfigError::InvalidResolution);
        }
        let physics_ok = self.gravity_magnitude.is_finite()
            && self.gravity_magnitude >= 0.0
            && self.bounce_factor.is_finite()
            && self.bounce_factor >= 0.0
            && self.terminal_velocity.is_finite()
            && self.terminal_velocity > 0.0
            && self.initial_direction.is_finite();
        if !physics_ok {
            return Err(ConfigError::InvalidPhysics);
        }
        if self.gravity_change_percent > MAX_PERCENT {
            return Err(ConfigError::InvalidProbability);
        }
        if self.foreground == self.background {
            return Err(ConfigError::InvalidColors);
        }
        Ok(())
    }

    /// Check the configuration against canvas dimensions
    ///
    /// Both dimensions must exceed the footprint width `2 * grain_size`.
    pub fn validate_for(&self, dimensions: (u16, u16)) -> Result<(), ConfigError> {
        self.validate()?;
        let span = 2 * self.grain_size as u16;
        let (width, height) = dimensions;
        if width <= span || height <= span {
            return Err(ConfigError::CanvasTooSmall);
        }
        Ok(())
    }

    /// Number of distinct canvas cells a grain centre may start on
    pub fn placement_cells(&self, dimensions: (u16, u16)) -> u32 {
        let span = 2 * self.grain_size as u32;
        let (width, height) = dimensions;
        (width as u32).saturating_sub(span) * (height as u32).saturating_sub(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SandConfig::default();
        assert_eq!(config.validate(), Ok(()));
        // Device tuning: gravity is twice the resolution
        assert_eq!(config.gravity_magnitude, 2.0 * config.resolution as f32);
    }

    #[test]
    fn test_grain_count_bounds() {
        let mut config = SandConfig {
            grain_count: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoGrains));

        config.grain_count = MAX_GRAINS as u16 + 1;
        assert_eq!(config.validate(), Err(ConfigError::TooManyGrains));

        config.grain_count = MAX_GRAINS as u16;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_physics_bounds() {
        let base = SandConfig::default();

        let config = SandConfig {
            terminal_velocity: 0.0,
            ..base
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidPhysics));

        let config = SandConfig {
            bounce_factor: -0.1,
            ..base
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidPhysics));

        let config = SandConfig {
            gravity_magnitude: f32::NAN,
            ..base
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidPhysics));

        let config = SandConfig {
            gravity_magnitude: 0.0,
            ..base
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_other_bounds() {
        let base = SandConfig::default();
        assert_eq!(
            SandConfig { resolution: 0, ..base }.validate(),
            Err(ConfigError::InvalidResolution)
        );
        assert_eq!(
            SandConfig { grain_size: MAX_GRAIN_SIZE + 1, ..base }.validate(),
            Err(ConfigError::GrainTooLarge)
        );
        assert_eq!(
            SandConfig { gravity_change_percent: 101, ..base }.validate(),
            Err(ConfigError::InvalidProbability)
        );
        assert_eq!(
            SandConfig { foreground: 0, ..base }.validate(),
            Err(ConfigError::InvalidColors)
        );
    }

    #[test]
    fn test_validate_for_canvas() {
        let config = SandConfig {
            grain_size: 2,
            ..Default::default()
        };
        assert_eq!(config.validate_for((4, 10)), Err(ConfigError::CanvasTooSmall));
        assert_eq!(config.validate_for((10, 4)), Err(ConfigError::CanvasTooSmall));
        assert_eq!(config.validate_for((5, 5)), Ok(()));
        assert_eq!(config.placement_cells((5, 5)), 1);
        assert_eq!(config.placement_cells((10, 8)), 24);
    }

    #[test]
    fn test_velocity_clamp_modes() {
        assert_eq!(VelocityClamp::Symmetric.apply(12.0, 8.0), 8.0);
        assert_eq!(VelocityClamp::Symmetric.apply(-12.0, 8.0), -8.0);
        assert_eq!(VelocityClamp::Symmetric.apply(3.0, 8.0), 3.0);

        assert_eq!(VelocityClamp::CeilingOnly.apply(12.0, 8.0), 8.0);
        // The ceiling never limits negative components
        assert_eq!(VelocityClamp::CeilingOnly.apply(-12.0, 8.0), -12.0);
    }
}
