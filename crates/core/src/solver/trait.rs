//! Burn solver trait definition
//!
//! Backend-agnostic interface over the double-buffered burn grid. The CPU
//! and GPU backends both implement it and produce the same update rule.

use crate::core_types::{Cell, FrameImage, Spark};
use crate::error::SimError;
use std::borrow::Cow;

/// Backend-agnostic interface for the paper burn simulation
///
/// A solver owns both cell buffers. Every call to [`BurnSolver::step`] reads
/// the current front buffer, writes the back buffer and then swaps them, so
/// readers only ever observe a completed step.
pub trait BurnSolver: Send + Sync {
    /// Advance the grid by one kernel pass
    ///
    /// # Arguments
    ///
    /// * `spark` - Pointer spark in normalized `[0, 1]^2` coordinates with the
    ///   origin at the bottom-left, or [`Spark::None`]
    fn step(&mut self, spark: Spark);

    /// Color the current front buffer into `image`
    ///
    /// The image is resized to the grid if needed. Row 0 of the image is the
    /// top of the sheet.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ReadbackFailed`] if the pixels could not be copied
    /// back from the device. `image` keeps its previous contents.
    fn render(&mut self, image: &mut FrameImage) -> Result<(), SimError>;

    /// Read the current front buffer in row-major order
    ///
    /// CPU backend returns a borrowed slice, GPU backend returns an owned Vec.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ReadbackFailed`] if the cells could not be copied
    /// back from the device.
    fn read_cells(&self) -> Result<Cow<'_, [Cell]>, SimError>;

    /// Replace the front buffer
    ///
    /// # Errors
    ///
    /// Returns [`SimError::BufferSizeMismatch`] if `cells` does not hold
    /// exactly `width * height` entries, or [`SimError::InvalidParameter`]
    /// if any cell fails [`Cell::is_valid`].
    fn write_cells(&mut self, cells: &[Cell]) -> Result<(), SimError>;

    /// Grid dimensions `(width, height)` in cells
    fn dimensions(&self) -> (usize, usize);

    /// Check if this solver is GPU-accelerated
    fn is_gpu_accelerated(&self) -> bool;
}
