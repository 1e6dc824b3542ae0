//! Sand world
//!
//! Owns the grains, the gravity vector and the canvas they are drawn on.
//! The canvas doubles as the occupancy map: a grain may only move into
//! pixels that hold the background value.
//!
//! ```text
//!   driver ──tick(min)──► Pacer::wait ──► maybe rotate gravity
//!                                             │
//!                          ┌──────────────────┘
//!                          ▼
//!            for each grain (insertion order):
//!              accelerate ─► probe candidate ─► bounce blocked axes
//!                                   │                  │
//!                                   ▼                  ▼
//!                             erase old footprint, draw new one
//! ```

use core::time::Duration;

use heapless::Vec;
use rand_core::RngCore;

use grainfall_display::Canvas;

use super::collision::{block_direction, blocked_pixels};
use super::footprint::{Point, Velocity};
use super::grain::Grain;
use super::gravity::Gravity;
use super::placement::{check_positions, place_grains};
use crate::config::{ConfigError, SandConfig, MAX_GRAINS};
use crate::pacing::Pacer;

/// Summary of one simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Gravity direction was redrawn this step
    pub gravity_changed: bool,
    /// Grains whose grain-space position changed
    pub moved: u16,
    /// Grains that hit another grain or the canvas edge
    pub blocked: u16,
    /// Time since the previous tick (zero for unpaced steps)
    pub interval: Duration,
}

/// What happened to a single grain during a step
struct Motion {
    moved: bool,
    blocked: bool,
}

/// Sand simulation over a canvas
pub struct World<C, P, R> {
    canvas: C,
    pacer: P,
    rng: R,
    config: SandConfig,
    grains: Vec<Grain, MAX_GRAINS>,
    gravity: Gravity,
}

impl<C: Canvas, P: Pacer, R: RngCore> World<C, P, R> {
    /// Build a world with `config.grain_count` grains at random positions
    ///
    /// The canvas is cleared to the background color first. Fails if the
    /// configuration is invalid, does not suit the canvas, or asks for more
    /// grains than there are centre cells.
    pub fn new(canvas: C, config: SandConfig, pacer: P, rng: R) -> Result<Self, ConfigError> {
        let mut world = Self::empty(canvas, config, pacer, rng)?;
        world.restart()?;
        Ok(world)
    }

    /// Build a world with grains at the given grain-space positions
    ///
    /// The grain count is taken from `positions`; `config.grain_count` is
    /// replaced. Grains are stepped in the order given.
    pub fn with_grains(
        canvas: C,
        config: SandConfig,
        pacer: P,
        rng: R,
        positions: &[Point],
    ) -> Result<Self, ConfigError> {
        if positions.is_empty() {
            return Err(ConfigError::NoGrains);
        }
        if positions.len() > MAX_GRAINS {
            return Err(ConfigError::TooManyGrains);
        }
        let config = SandConfig {
            grain_count: positions.len() as u16,
            ..config
        };

        let mut world = Self::empty(canvas, config, pacer, rng)?;
        check_positions(&world.config, world.canvas.dimensions(), positions)?;
        world.populate(positions);
        Ok(world)
    }

    /// Validate, clear the canvas and set up gravity, with no grains yet
    fn empty(mut canvas: C, config: SandConfig, pacer: P, rng: R) -> Result<Self, ConfigError> {
        config.validate_for(canvas.dimensions())?;

        // Both colors must be storable or occupancy checks would misread
        canvas
            .fill(config.foreground)
            .and_then(|_| canvas.fill(config.background))
            .map_err(|_| ConfigError::InvalidColors)?;

        Ok(Self {
            canvas,
            pacer,
            rng,
            gravity: Gravity::new(config.initial_direction, config.gravity_magnitude),
            config,
            grains: Vec::new(),
        })
    }

    /// Replace all grains and draw them on a cleared canvas
    fn populate(&mut self, positions: &[Point]) {
        // Background was accepted when the world was built
        let _ = self.canvas.fill(self.config.background);
        self.grains.clear();

        for &position in positions {
            let mut grain = Grain::new(position, self.config.grain_size);
            // Positions are checked to lie on the canvas
            let _ = grain.render(
                &mut self.canvas,
                self.config.foreground,
                self.config.resolution,
            );
            let _ = self.grains.push(grain);
        }
    }

    /// Scatter a fresh set of grains at rest
    ///
    /// Gravity keeps its current direction. On failure the grains are left
    /// as they were.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        let positions = place_grains(&mut self.rng, &self.config, self.canvas.dimensions())?;
        self.populate(&positions);

        #[cfg(feature = "defmt")]
        defmt::info!("Sand restarted with {} grains", self.grains.len());

        Ok(())
    }

    /// Wait for the pacer, then run one step
    pub fn tick(&mut self, min_interval: Duration) -> TickReport {
        let interval = self.pacer.wait(min_interval);
        TickReport {
            interval,
            ..self.step()
        }
    }

    /// Run one step immediately: maybe rotate gravity, then move every grain
    pub fn step(&mut self) -> TickReport {
        let gravity_changed = self
            .gravity
            .maybe_rotate(&mut self.rng, self.config.gravity_change_percent);

        #[cfg(feature = "defmt")]
        {
            if gravity_changed {
                defmt::debug!("Gravity now points at {} rad", self.gravity.direction());
            }
        }

        let mut report = TickReport {
            gravity_changed,
            ..TickReport::default()
        };
        for grain in self.grains.iter_mut() {
            let motion = advance(grain, &mut self.canvas, &self.gravity, &self.config);
            report.moved += motion.moved as u16;
            report.blocked += motion.blocked as u16;
        }
        report
    }

    /// Grains in step order
    pub fn grains(&self) -> &[Grain] {
        &self.grains
    }

    pub fn grain(&self, index: usize) -> Option<&Grain> {
        self.grains.get(index)
    }

    /// Override a grain's velocity; false if there is no such grain
    ///
    /// The terminal velocity is applied on the next step.
    pub fn set_velocity(&mut self, index: usize, velocity: Velocity) -> bool {
        match self.grains.get_mut(index) {
            Some(grain) => {
                grain.set_velocity(velocity);
                true
            }
            None => false,
        }
    }

    pub fn gravity(&self) -> &Gravity {
        &self.gravity
    }

    /// Gravity direction in radians
    pub fn direction(&self) -> f32 {
        self.gravity.direction()
    }

    /// Point gravity along `direction` radians
    pub fn set_direction(&mut self, direction: f32) {
        self.gravity.set_direction(direction);
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn config(&self) -> &SandConfig {
        &self.config
    }

    /// Tear down the world, handing back the canvas, pacer and RNG
    pub fn into_parts(self) -> (C, P, R) {
        (self.canvas, self.pacer, self.rng)
    }
}

/// Apply gravity to one grain, resolve collisions and redraw it
fn advance<C: Canvas>(
    grain: &mut Grain,
    canvas: &mut C,
    gravity: &Gravity,
    config: &SandConfig,
) -> Motion {
    let clamp = config.velocity_clamp;
    let terminal = config.terminal_velocity;
    let resolution = config.resolution;

    let mut velocity = grain.velocity();
    velocity.x = clamp.apply(velocity.x + gravity.x(), terminal);
    velocity.y = clamp.apply(velocity.y + gravity.y(), terminal);

    let position = grain.position();
    let mut candidate = Point::new(
        (position.x as f32 + velocity.x) as i32,
        (position.y as f32 + velocity.y) as i32,
    );

    let mut blocked = false;
    if candidate != position {
        let probe = grain.probe_footprint(candidate, resolution);
        let hits = blocked_pixels(canvas, grain.footprint(), &probe, config.background);

        if !hits.is_empty() {
            blocked = true;
            let side = block_direction(grain.canvas_position(resolution), &hits);
            let rebound = gravity.magnitude() * config.bounce_factor;

            if side.x != 0 {
                candidate.x = position.x;
                let bounced = libm::roundf(velocity.x / side.x as f32 * rebound);
                velocity.x = clamp.apply(bounced, terminal);
            }
            if side.y != 0 {
                candidate.y = position.y;
                let bounced = libm::roundf(velocity.y / side.y as f32 * rebound);
                velocity.y = clamp.apply(bounced, terminal);
            }

            // The remaining axis may still run into something
            if candidate != position {
                let probe = grain.probe_footprint(candidate, resolution);
                if !blocked_pixels(canvas, grain.footprint(), &probe, config.background).is_empty() {
                    candidate = position;
                }
            }
        }
    }

    grain.set_velocity(velocity);
    // Only unblocked, in-bounds footprints are drawn
    let _ = grain.move_and_render(
        canvas,
        candidate,
        config.background,
        config.foreground,
        resolution,
    );

    Motion {
        moved: candidate != position,
        blocked,
    }
}
