//! Vector type alias for 2D positions and offsets.

use nalgebra::Vector2;

/// 2D vector type for cell-space positions and stencil offsets.
///
/// This is a simple alias for `nalgebra::Vector2<f32>`, used for spark
/// positions and neighbour distances in the burn kernel.
pub type Vec2 = Vector2<f32>;
