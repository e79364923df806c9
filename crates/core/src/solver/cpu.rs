//! CPU-based burn solver implementation
//!
//! This module provides a CPU implementation of the `BurnSolver` trait using
//! a pair of `Vec<Cell>` buffers and Rayon for parallelism. This backend is
//! always available and serves as a fallback when GPU acceleration is not.

use super::combustion::{step_burn_cpu, Stencil};
use super::fields::CellField;
use super::flame::render_cpu;
use super::grid_state::GridState;
use super::BurnSolver;
use crate::config::BurnParams;
use crate::core_types::{Cell, FrameImage, Spark};
use crate::error::SimError;
use std::borrow::Cow;

/// CPU-based burn solver using Rayon for parallelism
///
/// Rows of the back buffer are updated on the Rayon pool, then the buffers
/// are swapped. Produces the same results as the GPU solver up to float
/// rounding.
pub struct CpuBurnSolver {
    grid: GridState,
    stencil: Stencil,
    params: BurnParams,
}

impl CpuBurnSolver {
    /// Create a new CPU burn solver
    ///
    /// # Arguments
    ///
    /// * `initial` - Starting sheet, usually from [`super::PaperGenerator`]
    /// * `params` - Kernel constants; assumed already validated
    #[must_use]
    pub fn new(initial: CellField, params: BurnParams) -> Self {
        Self {
            grid: GridState::new(initial),
            stencil: Stencil::new(params.neighborhood_radius),
            params,
        }
    }

    /// Current front buffer
    #[must_use]
    pub fn field(&self) -> &CellField {
        self.grid.front()
    }

    /// Kernel constants in use
    #[must_use]
    pub fn params(&self) -> &BurnParams {
        &self.params
    }
}

impl BurnSolver for CpuBurnSolver {
    fn step(&mut self, spark: Spark) {
        let spark = spark.cell_position(self.grid.width(), self.grid.height());
        self.grid.clear_back();
        let (front, back) = self.grid.front_and_back();
        step_burn_cpu(front, back, spark, &self.stencil, &self.params);
        self.grid.swap();
    }

    fn render(&mut self, image: &mut FrameImage) -> Result<(), SimError> {
        let (width, height) = self.dimensions();
        if image.width() != width || image.height() != height {
            image.resize(width, height);
        }
        render_cpu(self.grid.front(), &self.params, image);
        Ok(())
    }

    fn read_cells(&self) -> Result<Cow<'_, [Cell]>, SimError> {
        Ok(Cow::Borrowed(self.grid.front().as_slice()))
    }

    fn write_cells(&mut self, cells: &[Cell]) -> Result<(), SimError> {
        let (width, height) = self.dimensions();
        let field = CellField::from_cells(width, height, cells.to_vec())?;
        self.grid.reset(field);
        Ok(())
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.grid.width(), self.grid.height())
    }

    fn is_gpu_accelerated(&self) -> bool {
        false
    }
}
