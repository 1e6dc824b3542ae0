//! A single sand grain
//!
//! Position and velocity live in grain-space; the footprint is drawn in
//! canvas-space at `position / resolution`.

use grainfall_display::{Canvas, CanvasError};

use super::footprint::{Footprint, Point, Velocity};

/// Sand grain
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Grain {
    /// Grain-space position
    position: Point,
    /// Grain-space units per tick
    velocity: Velocity,
    /// Footprint half-width
    size: u8,
    /// Pixels covered by the last render (None until first rendered)
    footprint: Option<Footprint>,
}

impl Grain {
    /// Create a resting grain that has not been drawn yet
    pub const fn new(position: Point, size: u8) -> Self {
        Self {
            position,
            velocity: Velocity::zero(),
            size,
            footprint: None,
        }
    }

    pub const fn position(&self) -> Point {
        self.position
    }

    pub const fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub const fn size(&self) -> u8 {
        self.size
    }

    /// Pixels covered by the last render
    pub const fn footprint(&self) -> Option<&Footprint> {
        self.footprint.as_ref()
    }

    /// Canvas-space centre
    pub const fn canvas_position(&self, resolution: u8) -> Point {
        self.position.to_canvas(resolution)
    }

    /// Replace the velocity (no limit applied)
    pub fn set_velocity(&mut self, velocity: Velocity) {
        self.velocity = velocity;
    }

    /// Footprint the grain would cover at `candidate` (grain-space)
    ///
    /// Pure: neither the canvas nor the cached footprint is touched.
    pub const fn probe_footprint(&self, candidate: Point, resolution: u8) -> Footprint {
        Footprint::new(candidate.to_canvas(resolution), self.size)
    }

    /// Write `color` into every pixel of the footprint at the current position
    ///
    /// The footprint is recorded even if a write fails, so a later erase
    /// covers the same pixels.
    pub fn render<C: Canvas>(
        &mut self,
        canvas: &mut C,
        color: u8,
        resolution: u8,
    ) -> Result<(), CanvasError> {
        let footprint = self.probe_footprint(self.position, resolution);
        self.footprint = Some(footprint);

        let mut result = Ok(());
        for p in footprint.pixels() {
            if let Err(e) = canvas.set(p.x, p.y, color) {
                result = Err(e);
            }
        }
        result
    }

    /// Erase at the old position, move, draw at the new position
    ///
    /// The old footprint is cleared before the new one is drawn, so a grain
    /// never appears twice on the canvas.
    pub(crate) fn move_and_render<C: Canvas>(
        &mut self,
        canvas: &mut C,
        to: Point,
        background: u8,
        foreground: u8,
        resolution: u8,
    ) -> Result<(), CanvasError> {
        self.render(canvas, background, resolution)?;
        self.position = to;
        self.render(canvas, foreground, resolution)
    }
}
