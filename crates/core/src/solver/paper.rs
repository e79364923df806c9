//! Paper fibre density initializer
//!
//! Generates the starting sheet: every cell gets the same value in `fuel` and
//! `reference_fuel`, and starts cold. Runs once per sheet, before the first
//! kernel pass.
//!
//! The density is fractal noise sampled over the sheet in normalized device
//! coordinates (`[-1, 1]` on both axes, so the pattern stretches with the
//! aspect ratio), inverted and pushed through a power curve so thin fibres
//! and dense clumps both show up instead of smooth blobs.

use super::fields::CellField;
use super::noise::NoiseGenerator;
use crate::config::{validate_dimensions, NoiseConfig};
use crate::core_types::{Cell, Vec2};
use crate::error::SimError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Builds fuel fields for a given noise configuration and random offset.
#[derive(Clone, Debug)]
pub struct PaperGenerator {
    noise: NoiseGenerator,
    config: NoiseConfig,
    offset: Vec2,
}

impl PaperGenerator {
    /// Seeded generator; the sheet offset is drawn from `[-1, 1)^2`.
    #[must_use]
    pub fn new(config: NoiseConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let offset = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
        Self::with_offset(config, seed, offset)
    }

    /// Generator with an explicit sheet offset.
    #[must_use]
    pub fn with_offset(config: NoiseConfig, seed: u64, offset: Vec2) -> Self {
        Self {
            noise: NoiseGenerator::new(seed, &config),
            config,
            offset,
        }
    }

    /// Offset that decorrelates this sheet from others
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Fibre density at a sample position in normalized device coordinates.
    ///
    /// Always in `[0, 1]`: negative noise would push the curve above 1, so
    /// the result saturates at fully dense paper.
    #[must_use]
    pub fn density_at_ndc(&self, ndc: Vec2) -> f32 {
        let p = ndc * self.config.base_scale + self.offset * self.config.offset_scale;
        let s = self.noise.sample(p.x, p.y);
        (1.0 - s)
            .max(0.0)
            .powf(self.config.contrast_exponent)
            .min(1.0)
    }

    /// Fibre density for cell `(x, y)` of a `width` x `height` grid, sampled at
    /// the cell centre.
    #[must_use]
    pub fn density_at(&self, x: usize, y: usize, width: usize, height: usize) -> f32 {
        let ndc = Vec2::new(
            2.0 * (x as f32 + 0.5) / width as f32 - 1.0,
            2.0 * (y as f32 + 0.5) / height as f32 - 1.0,
        );
        self.density_at_ndc(ndc)
    }

    /// Produce a fresh, cold sheet.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidDimensions`] for a zero or oversized grid.
    pub fn generate(&self, width: usize, height: usize) -> Result<CellField, SimError> {
        validate_dimensions(width, height)?;

        let mut field = CellField::new(width, height);
        field
            .as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    *cell = Cell::paper(self.density_at(x, y, width, height));
                }
            });
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_is_cold_and_unburned() {
        let generator = PaperGenerator::new(NoiseConfig::default(), 42);
        let field = generator.generate(32, 24).unwrap();

        for cell in field.as_slice() {
            assert_eq!(cell.temperature, 0.0);
            assert_eq!(cell.fuel, cell.reference_fuel);
            assert!((0.0..=1.0).contains(&cell.fuel), "density {}", cell.fuel);
        }
    }

    #[test]
    fn test_sheet_is_not_uniform() {
        let generator = PaperGenerator::new(NoiseConfig::default(), 7);
        let field = generator.generate(64, 64).unwrap();
        let first = field.as_slice()[0].fuel;
        assert!(field.as_slice().iter().any(|c| c.fuel != first));
    }

    #[test]
    fn test_same_seed_same_sheet() {
        let a = PaperGenerator::new(NoiseConfig::default(), 5).generate(16, 16).unwrap();
        let b = PaperGenerator::new(NoiseConfig::default(), 5).generate(16, 16).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_dimensions_fail() {
        let generator = PaperGenerator::new(NoiseConfig::default(), 1);
        assert!(matches!(
            generator.generate(0, 8),
            Err(SimError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_noise_zero_means_full_density() {
        // At the offset origin with zero scale every octave samples the same
        // lattice points, where gradient noise is exactly zero.
        let config = NoiseConfig {
            base_scale: 1.0,
            octave_shift: 0.0,
            ..NoiseConfig::default()
        };
        let generator = PaperGenerator::with_offset(config, 3, Vec2::zeros());
        assert_eq!(generator.density_at_ndc(Vec2::zeros()), 1.0);
    }
}
