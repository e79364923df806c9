//! Per-cell simulation state
//!
//! A cell is stored as four `f32` channels so a whole grid maps directly onto
//! an RGBA float texture or a `array<vec4<f32>>` storage buffer.

use serde::{Deserialize, Serialize};

/// One element of the paper grid.
///
/// Channel layout matches the GPU buffers: `x = fuel`, `y = temperature`,
/// `z = reference_fuel`, `w = reserved`.
///
/// `reference_fuel` is written once when the paper is generated and never
/// changes afterwards. `fuel <= reference_fuel` holds for every cell from then on.
#[repr(C)]
#[cfg_attr(feature = "gpu", derive(bytemuck::Pod, bytemuck::Zeroable))]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Remaining combustible material (0-1)
    pub fuel: f32,
    /// Local thermal energy (>= 0)
    pub temperature: f32,
    /// Fuel assigned at creation time (0-1, immutable)
    pub reference_fuel: f32,
    /// Unused fourth channel, kept for the RGBA layout
    pub reserved: f32,
}

impl Cell {
    /// Fresh, cold paper with the given density.
    #[must_use]
    pub const fn paper(density: f32) -> Self {
        Self {
            fuel: density,
            temperature: 0.0,
            reference_fuel: density,
            reserved: 0.0,
        }
    }

    /// Create a cell with explicit channel values.
    #[must_use]
    pub const fn new(fuel: f32, temperature: f32, reference_fuel: f32) -> Self {
        Self {
            fuel,
            temperature,
            reference_fuel,
            reserved: 0.0,
        }
    }

    /// True while the cell has not lost any fuel.
    ///
    /// Exact comparison on purpose: fuel only ever moves away from the
    /// reference value through multiplication or the extinguish guard.
    #[inline]
    #[must_use]
    pub fn is_unburned(&self) -> bool {
        self.fuel == self.reference_fuel
    }

    /// True when the channels are in range for upload.
    ///
    /// Requires `0 <= fuel <= reference_fuel <= 1` and a finite, non-negative
    /// temperature. NaN in any checked channel fails.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (0.0..=self.reference_fuel).contains(&self.fuel)
            && self.reference_fuel <= 1.0
            && self.temperature.is_finite()
            && self.temperature >= 0.0
    }

    /// True once the extinguish guard has zeroed a cell that once had fuel.
    #[inline]
    #[must_use]
    pub fn is_spent(&self) -> bool {
        self.fuel == 0.0 && self.temperature == 0.0 && self.reference_fuel > 0.0
    }
}
