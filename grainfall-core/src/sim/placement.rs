//! Initial grain placement
//!
//! Grains start at random canvas cells far enough from the edges that the
//! whole footprint is on the canvas. Footprints are kept apart while there
//! is room; once the canvas is too crowded for that, grains only need
//! distinct centre cells and may start overlapping.

use heapless::Vec;
use rand::Rng;
use rand_core::RngCore;

use super::footprint::{Footprint, Point};
use crate::config::{ConfigError, SandConfig, MAX_GRAINS};

/// Random samples tried per grain before scanning for a free cell
pub const ATTEMPTS_PER_GRAIN: u32 = 64;

/// Grain-space starting positions
pub type Positions = Vec<Point, MAX_GRAINS>;

/// Canvas-space rectangle of legal grain centres
#[derive(Debug, Clone, Copy)]
struct CentreArea {
    min: Point,
    max: Point,
    size: u8,
}

impl CentreArea {
    fn new(config: &SandConfig, dimensions: (u16, u16)) -> Self {
        let size = config.grain_size as i32;
        Self {
            min: Point::new(size, size),
            max: Point::new(dimensions.0 as i32 - 1 - size, dimensions.1 as i32 - 1 - size),
            size: config.grain_size,
        }
    }

    fn sample<R: RngCore>(&self, rng: &mut R) -> Footprint {
        let x = rng.gen_range(self.min.x..=self.max.x);
        let y = rng.gen_range(self.min.y..=self.max.y);
        Footprint::new(Point::new(x, y), self.size)
    }

    /// Every legal footprint in row-major order
    fn footprints(&self) -> impl Iterator<Item = Footprint> + Clone {
        let (min, max, size) = (self.min, self.max, self.size);
        (min.y..=max.y).flat_map(move |y| {
            (min.x..=max.x).map(move |x| Footprint::new(Point::new(x, y), size))
        })
    }

    /// Uniform pick among the footprints no placed grain conflicts with
    fn pick_free<R, F>(&self, rng: &mut R, placed: &[Footprint], conflicts: F) -> Option<Footprint>
    where
        R: RngCore,
        F: Fn(&Footprint, &Footprint) -> bool,
    {
        let mut free = self
            .footprints()
            .filter(|fp| !placed.iter().any(|other| conflicts(fp, other)));
        let available = free.clone().count();
        if available == 0 {
            return None;
        }
        free.nth(rng.gen_range(0..available))
    }
}

/// Pick `config.grain_count` random starting positions
///
/// Centres are drawn in canvas-space from
/// `[size, width-1-size] × [size, height-1-size]` and returned in grain-space.
/// Each grain goes where its footprint overlaps no earlier grain when such a
/// cell exists: random samples first, then a uniform pick among the cells
/// still clear. Failing that it takes any unused centre cell. Only fails with
/// `PlacementExhausted` when there are fewer centre cells than grains.
pub fn place_grains<R: RngCore>(
    rng: &mut R,
    config: &SandConfig,
    dimensions: (u16, u16),
) -> Result<Positions, ConfigError> {
    config.validate_for(dimensions)?;

    let count = config.grain_count as usize;
    if count as u32 > config.placement_cells(dimensions) {
        return Err(ConfigError::PlacementExhausted);
    }

    let area = CentreArea::new(config, dimensions);
    let mut placed: Vec<Footprint, MAX_GRAINS> = Vec::new();
    let mut crowded = 0u16;

    while placed.len() < count {
        let sampled = (0..ATTEMPTS_PER_GRAIN)
            .map(|_| area.sample(rng))
            .find(|fp| !placed.iter().any(|other| other.overlaps(fp)));

        let footprint = match sampled {
            Some(fp) => fp,
            None => match area.pick_free(rng, &placed, |a, b| a.overlaps(b)) {
                Some(fp) => fp,
                None => {
                    crowded += 1;
                    area.pick_free(rng, &placed, |a, b| a.center() == b.center())
                        .ok_or(ConfigError::PlacementExhausted)?
                }
            },
        };
        // At most grain_count <= MAX_GRAINS entries
        let _ = placed.push(footprint);
    }

    #[cfg(feature = "defmt")]
    {
        if crowded > 0 {
            defmt::warn!("{} of {} grains start overlapping", crowded, count);
        }
    }
    #[cfg(not(feature = "defmt"))]
    let _ = crowded;

    Ok(placed
        .iter()
        .map(|fp| fp.center().to_grain(config.resolution))
        .collect())
}

/// Check caller-supplied grain-space positions
///
/// Every footprint must lie on the canvas and no two may overlap.
pub fn check_positions(
    config: &SandConfig,
    dimensions: (u16, u16),
    positions: &[Point],
) -> Result<(), ConfigError> {
    let footprints = positions
        .iter()
        .map(|p| Footprint::new(p.to_canvas(config.resolution), config.grain_size));

    for (i, footprint) in footprints.clone().enumerate() {
        if !footprint.fits(dimensions) {
            return Err(ConfigError::GrainOutOfBounds);
        }
        if footprints.clone().skip(i + 1).any(|other| other.overlaps(&footprint)) {
            return Err(ConfigError::GrainsOverlap);
        }
    }
    Ok(())
}
