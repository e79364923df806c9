//! Simulation configuration
//!
//! All tuning constants of the burn model live here with their reference
//! values as defaults. Every constructor in the crate validates its config
//! before allocating anything.

use crate::error::SimError;
use serde::{Deserialize, Serialize};

/// Largest grid edge accepted. Keeps `width * height` and GPU dispatch sizes
/// comfortably inside `u32`.
pub const MAX_GRID_DIMENSION: usize = 16384;

/// Combustion and heat-transfer constants for the burn kernel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnParams {
    /// Ignition threshold: cells hotter than this burn
    pub burn_temp: f32,
    /// Ceiling temperature of an actively burning cell
    pub max_temp: f32,
    /// Fraction of `burn_temp` where unburned paper is fully brown
    pub brown_fraction: f32,
    /// Per-step temperature growth while burning
    pub growth_rate: f32,
    /// Per-step fuel multiplier while burning
    pub fuel_decay: f32,
    /// Fuel below this is treated as spent
    pub extinguish_fuel: f32,
    /// Stencil half-width in cells
    pub neighborhood_radius: u32,
    /// Conduction coefficient for hot neighbours
    pub conduction: f32,
    /// Peak heat added by a spark per step
    pub spark_gain: f32,
    /// Exponential falloff of spark heat per cell of distance
    pub spark_falloff: f32,
    /// Exponent applied to reference fuel when scaling spark heat
    pub spark_fuel_exponent: f32,
}

impl Default for BurnParams {
    fn default() -> Self {
        Self {
            burn_temp: 506.0,
            max_temp: 1089.0,
            brown_fraction: 0.6,
            growth_rate: 1.001,
            fuel_decay: 0.9899,
            extinguish_fuel: 0.001,
            neighborhood_radius: 3,
            conduction: 0.02,
            spark_gain: 64.0,
            spark_falloff: 0.04,
            spark_fuel_exponent: 0.25,
        }
    }
}

impl BurnParams {
    /// Temperature where unburned paper turns fully brown
    #[inline]
    #[must_use]
    pub fn brown_temp(&self) -> f32 {
        self.brown_fraction * self.burn_temp
    }

    /// Midpoint between ignition and ceiling, where embers turn to flame
    #[inline]
    #[must_use]
    pub fn red_temp(&self) -> f32 {
        0.5 * (self.burn_temp + self.max_temp)
    }

    /// Check every constant is finite and inside its physical range.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SimError> {
        let finite = [
            ("burn_temp", self.burn_temp),
            ("max_temp", self.max_temp),
            ("brown_fraction", self.brown_fraction),
            ("growth_rate", self.growth_rate),
            ("fuel_decay", self.fuel_decay),
            ("extinguish_fuel", self.extinguish_fuel),
            ("conduction", self.conduction),
            ("spark_gain", self.spark_gain),
            ("spark_falloff", self.spark_falloff),
            ("spark_fuel_exponent", self.spark_fuel_exponent),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SimError::invalid_parameter(
                    name,
                    format!("must be finite, got {value}"),
                ));
            }
        }

        if self.burn_temp <= 0.0 {
            return Err(SimError::invalid_parameter(
                "burn_temp",
                format!("must be positive, got {}", self.burn_temp),
            ));
        }
        if self.max_temp <= self.burn_temp {
            return Err(SimError::invalid_parameter(
                "max_temp",
                format!(
                    "must exceed burn_temp ({}), got {}",
                    self.burn_temp, self.max_temp
                ),
            ));
        }
        if self.brown_fraction <= 0.0 || self.brown_fraction >= 1.0 {
            return Err(SimError::invalid_parameter(
                "brown_fraction",
                format!("must be in (0, 1), got {}", self.brown_fraction),
            ));
        }
        if self.growth_rate < 1.0 {
            return Err(SimError::invalid_parameter(
                "growth_rate",
                format!("must be at least 1, got {}", self.growth_rate),
            ));
        }
        if self.fuel_decay <= 0.0 || self.fuel_decay >= 1.0 {
            return Err(SimError::invalid_parameter(
                "fuel_decay",
                format!("must be in (0, 1), got {}", self.fuel_decay),
            ));
        }
        if self.extinguish_fuel < 0.0 {
            return Err(SimError::invalid_parameter(
                "extinguish_fuel",
                format!("must not be negative, got {}", self.extinguish_fuel),
            ));
        }
        if self.neighborhood_radius == 0 {
            return Err(SimError::invalid_parameter(
                "neighborhood_radius",
                "must be at least 1",
            ));
        }
        if self.conduction < 0.0 || self.spark_gain < 0.0 || self.spark_falloff < 0.0 {
            return Err(SimError::invalid_parameter(
                "conduction",
                "heat coefficients must not be negative",
            ));
        }
        Ok(())
    }
}

/// Fractal noise settings for the paper fibre density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Number of octaves, each half the amplitude and twice the frequency
    pub octaves: u32,
    /// Frequency of the first octave across the sheet
    pub base_scale: f32,
    /// Scale applied to the random offset, decorrelates sheets
    pub offset_scale: f32,
    /// Domain shift between octaves
    pub octave_shift: f32,
    /// Contrast power curve applied to the inverted noise
    pub contrast_exponent: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 9,
            base_scale: 3.0,
            offset_scale: 1000.0,
            octave_shift: 2.0,
            contrast_exponent: 4.0,
        }
    }
}

impl NoiseConfig {
    /// Minimum octave count that still looks like paper fibre
    pub const MIN_OCTAVES: u32 = 8;

    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] for too few octaves or a
    /// non-positive scale or exponent.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.octaves < Self::MIN_OCTAVES {
            return Err(SimError::invalid_parameter(
                "octaves",
                format!("need at least {}, got {}", Self::MIN_OCTAVES, self.octaves),
            ));
        }
        for (name, value) in [
            ("base_scale", self.base_scale),
            ("offset_scale", self.offset_scale),
            ("contrast_exponent", self.contrast_exponent),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::invalid_parameter(
                    name,
                    format!("must be finite and positive, got {value}"),
                ));
            }
        }
        if !self.octave_shift.is_finite() {
            return Err(SimError::invalid_parameter(
                "octave_shift",
                format!("must be finite, got {}", self.octave_shift),
            ));
        }
        Ok(())
    }
}

/// Which compute backend to run the kernel on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BackendPreference {
    /// GPU when available, CPU otherwise
    #[default]
    Auto,
    /// Always the rayon CPU backend
    Cpu,
    /// GPU or fail
    Gpu,
}

/// Complete configuration for one paper sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Grid width in cells (surface width in pixels)
    pub width: usize,
    /// Grid height in cells (surface height in pixels)
    pub height: usize,
    /// Seed for the paper offset and permutation; `None` draws from entropy
    #[serde(default)]
    pub seed: Option<u64>,
    /// Kernel passes per rendered frame
    #[serde(default = "default_steps_per_frame")]
    pub steps_per_frame: u32,
    #[serde(default)]
    pub backend: BackendPreference,
    #[serde(default)]
    pub burn: BurnParams,
    #[serde(default)]
    pub noise: NoiseConfig,
}

fn default_steps_per_frame() -> u32 {
    1
}

impl SimConfig {
    /// Reference configuration for a `width` x `height` surface.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            seed: None,
            steps_per_frame: default_steps_per_frame(),
            backend: BackendPreference::Auto,
            burn: BurnParams::default(),
            noise: NoiseConfig::default(),
        }
    }

    /// Fix the seed for reproducible paper.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_backend(mut self, backend: BackendPreference) -> Self {
        self.backend = backend;
        self
    }

    /// Validate dimensions and every parameter block.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidDimensions`] for a zero or oversized grid and
    /// [`SimError::InvalidParameter`] for bad tuning values.
    pub fn validate(&self) -> Result<(), SimError> {
        validate_dimensions(self.width, self.height)?;
        if self.steps_per_frame == 0 {
            return Err(SimError::invalid_parameter(
                "steps_per_frame",
                "must be at least 1",
            ));
        }
        self.burn.validate()?;
        self.noise.validate()
    }
}

/// Reject zero or oversized grids.
///
/// # Errors
///
/// Returns [`SimError::InvalidDimensions`].
pub fn validate_dimensions(width: usize, height: usize) -> Result<(), SimError> {
    if width == 0 || height == 0 || width > MAX_GRID_DIMENSION || height > MAX_GRID_DIMENSION {
        return Err(SimError::InvalidDimensions { width, height });
    }
    Ok(())
}
