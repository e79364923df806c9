//! Gradient noise generator for paper fibre density.
//!
//! Implements multi-octave gradient noise (fractal Brownian motion). Each
//! octave doubles the frequency, halves the amplitude and shifts the sample
//! domain so octaves do not line up on the same lattice points.
//!
//! # Implementation
//!
//! Perlin-style gradient noise on an integer lattice with a seeded
//! permutation table and quintic fade curve.

use crate::config::NoiseConfig;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Permutation table size (must be power of 2).
const PERM_SIZE: usize = 256;

/// Noise octave configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseOctave {
    /// Spatial frequency (higher = finer detail).
    pub frequency: f32,

    /// Amplitude contribution weight.
    pub amplitude: f32,

    /// Domain shift added to the sample position before scaling.
    pub shift: f32,
}

impl NoiseOctave {
    /// Create a new noise octave.
    #[must_use]
    pub fn new(frequency: f32, amplitude: f32, shift: f32) -> Self {
        Self {
            frequency,
            amplitude,
            shift,
        }
    }
}

/// Multi-octave gradient noise generator.
///
/// Deterministic given a seed, so the same seed always yields the same sheet.
#[derive(Clone, Debug)]
pub struct NoiseGenerator {
    /// Random seed for reproducibility.
    pub seed: u64,

    /// Octave configuration for multi-scale noise.
    pub octaves: Vec<NoiseOctave>,

    /// Permutation table for gradient selection (doubled).
    perm: Vec<u8>,

    /// Gradient vectors for 2D noise (8 directions).
    gradients: [(f32, f32); 8],
}

impl NoiseGenerator {
    /// Create generator with the fibre octave ladder from `config`.
    ///
    /// Octave `i` has frequency `2^i`, amplitude `0.5^i` and shift
    /// `i * config.octave_shift`.
    #[must_use]
    pub fn new(seed: u64, config: &NoiseConfig) -> Self {
        let mut frequency = 1.0_f32;
        let mut amplitude = 1.0_f32;
        let mut shift = 0.0_f32;
        let mut octaves = Vec::with_capacity(config.octaves as usize);
        for _ in 0..config.octaves {
            octaves.push(NoiseOctave::new(frequency, amplitude, shift));
            frequency *= 2.0;
            amplitude *= 0.5;
            shift += config.octave_shift;
        }
        Self::with_octaves(seed, octaves)
    }

    /// Create generator with custom octaves.
    #[must_use]
    pub fn with_octaves(seed: u64, octaves: Vec<NoiseOctave>) -> Self {
        Self {
            seed,
            octaves,
            perm: Self::generate_permutation(seed),
            gradients: Self::generate_gradients(),
        }
    }

    /// Shuffle 0..=255 with a seeded RNG, then double the table to avoid
    /// modulo operations during hashing.
    fn generate_permutation(seed: u64) -> Vec<u8> {
        let mut perm: Vec<u8> = (0..=255).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        perm.shuffle(&mut rng);

        let mut doubled = Vec::with_capacity(PERM_SIZE * 2);
        doubled.extend_from_slice(&perm);
        doubled.extend_from_slice(&perm);
        doubled
    }

    /// Unit vectors pointing in 8 equally-spaced directions.
    fn generate_gradients() -> [(f32, f32); 8] {
        use std::f32::consts::FRAC_1_SQRT_2;
        [
            (1.0, 0.0),
            (FRAC_1_SQRT_2, FRAC_1_SQRT_2),
            (0.0, 1.0),
            (-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
            (-1.0, 0.0),
            (-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
            (0.0, -1.0),
            (FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
        ]
    }

    /// Sample noise at a position, returns value in range [-1, 1].
    ///
    /// Sum of all octaves divided by total amplitude.
    #[must_use]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        if self.octaves.is_empty() {
            return 0.0;
        }

        let mut total = 0.0_f32;
        let mut amplitude_sum = 0.0_f32;

        for octave in &self.octaves {
            let nx = (x + octave.shift) * octave.frequency;
            let ny = (y + octave.shift) * octave.frequency;
            total += self.gradient_noise_2d(nx, ny) * octave.amplitude;
            amplitude_sum += octave.amplitude;
        }

        if amplitude_sum > 0.0 {
            (total / amplitude_sum).clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    /// 2D gradient noise at a single point.
    fn gradient_noise_2d(&self, x: f32, y: f32) -> f32 {
        let x0 = x.floor() as i32;
        let y0 = y.floor() as i32;
        let x1 = x0.wrapping_add(1);
        let y1 = y0.wrapping_add(1);

        let fx = x - x.floor();
        let fy = y - y.floor();

        let sx = Self::fade(fx);
        let sy = Self::fade(fy);

        let n00 = self.gradient_dot(x0, y0, fx, fy);
        let n10 = self.gradient_dot(x1, y0, fx - 1.0, fy);
        let n01 = self.gradient_dot(x0, y1, fx, fy - 1.0);
        let n11 = self.gradient_dot(x1, y1, fx - 1.0, fy - 1.0);

        let nx0 = Self::lerp(n00, n10, sx);
        let nx1 = Self::lerp(n01, n11, sx);
        Self::lerp(nx0, nx1, sy)
    }

    fn gradient_dot(&self, ix: i32, iy: i32, dx: f32, dy: f32) -> f32 {
        let grad = self.gradients[self.hash(ix, iy)];
        grad.0 * dx + grad.1 * dy
    }

    /// Hash lattice coordinates to a gradient index.
    fn hash(&self, x: i32, y: i32) -> usize {
        let px = (x & 0xFF) as usize;
        let py = (y & 0xFF) as usize;
        (self.perm[self.perm[px] as usize + py] as usize) & 0x07
    }

    /// Quintic fade curve 6t^5 - 15t^4 + 10t^3 (C2 continuous).
    #[inline]
    fn fade(t: f32) -> f32 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    #[inline]
    fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + t * (b - a)
    }
}
