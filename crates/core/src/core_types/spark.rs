//! External heat input
//!
//! The pointer collaborator reports normalized positions with the origin at the
//! bottom-left corner. The frame driver samples it once per frame and hands the
//! result to the kernel as an immutable [`Spark`].

use super::vec2::Vec2;
use serde::{Deserialize, Serialize};

/// Far-away stand-in used by kernels that take a plain position.
///
/// `exp(-0.04 * distance)` from here is zero in `f32` for any realistic grid.
pub const SPARK_SENTINEL: [f32; 2] = [-10000.0, -10000.0];

/// One sample from the pointer device.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerSample {
    /// Whether heat is being applied
    pub active: bool,
    /// Horizontal position (0 = left, 1 = right)
    pub x: f32,
    /// Vertical position (0 = bottom, 1 = top)
    pub y: f32,
}

/// Heat source for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Spark {
    /// No heat injection this frame
    #[default]
    None,
    /// Heat centred on a normalized position (origin bottom-left)
    At(Vec2),
}

impl Spark {
    /// Build a spark from normalized coordinates.
    #[must_use]
    pub fn at(x: f32, y: f32) -> Self {
        Self::At(Vec2::new(x, y))
    }

    /// Convert a pointer sample into this frame's spark.
    #[must_use]
    pub fn from_sample(sample: PointerSample) -> Self {
        if sample.active {
            Self::at(sample.x, sample.y)
        } else {
            Self::None
        }
    }

    /// Whether this spark contributes heat.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::At(_))
    }

    /// Position in cell space (`normalized * resolution`), if active.
    #[must_use]
    pub fn cell_position(&self, width: usize, height: usize) -> Option<Vec2> {
        match self {
            Self::None => None,
            Self::At(p) => Some(Vec2::new(p.x * width as f32, p.y * height as f32)),
        }
    }

    /// Cell-space position, or [`SPARK_SENTINEL`] when inactive.
    ///
    /// Used to feed kernels that cannot branch on an enum (GPU uniforms).
    #[must_use]
    pub fn cell_position_or_sentinel(&self, width: usize, height: usize) -> [f32; 2] {
        self.cell_position(width, height)
            .map_or(SPARK_SENTINEL, |p| [p.x, p.y])
    }
}
