//! Grid storage for the CPU backend
//!
//! A [`CellField`] is one full grid of [`Cell`]s stored row-major, row 0 at
//! the bottom of the sheet (the pointer and GPU framebuffer convention).

use crate::core_types::Cell;
use crate::error::SimError;

/// One grid buffer
///
/// Stores 2D cell data as a flat `Vec<Cell>` in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct CellField {
    /// Cells in row-major order (y * width + x)
    pub data: Vec<Cell>,
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
}

impl CellField {
    /// Create a new field with given dimensions, every channel zero
    ///
    /// # Arguments
    ///
    /// * `width` - Grid width in cells
    /// * `height` - Grid height in cells
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![Cell::default(); width * height],
            width,
            height,
        }
    }

    /// Wrap existing cells
    ///
    /// # Errors
    ///
    /// Returns [`SimError::BufferSizeMismatch`] when `cells.len() != width * height`
    /// and [`SimError::InvalidParameter`] when a cell fails [`Cell::is_valid`].
    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self, SimError> {
        if cells.len() != width * height {
            return Err(SimError::BufferSizeMismatch {
                expected: width * height,
                actual: cells.len(),
            });
        }
        validate_cells(&cells)?;
        Ok(Self {
            data: cells,
            width,
            height,
        })
    }

    /// Get reference to cell data
    #[must_use]
    pub fn as_slice(&self) -> &[Cell] {
        &self.data
    }

    /// Get mutable reference to cell data
    pub fn as_mut_slice(&mut self) -> &mut [Cell] {
        &mut self.data
    }

    /// Get cell at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        assert!(
            x < self.width && y < self.height,
            "Coordinates out of bounds"
        );
        self.data[y * self.width + x]
    }

    /// Get cell at a possibly out-of-range position, clamped to the nearest
    /// edge cell. Never wraps.
    #[inline]
    #[must_use]
    pub fn get_clamped(&self, x: isize, y: isize) -> Cell {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        self.data[cy * self.width + cx]
    }

    /// Set cell at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        assert!(
            x < self.width && y < self.height,
            "Coordinates out of bounds"
        );
        self.data[y * self.width + x] = cell;
    }

    /// Fill entire field with a cell value
    pub fn fill(&mut self, cell: Cell) {
        self.data.fill(cell);
    }
}

/// Reject host-supplied cells outside the fuel and temperature bounds
pub(crate) fn validate_cells(cells: &[Cell]) -> Result<(), SimError> {
    match cells.iter().position(|cell| !cell.is_valid()) {
        None => Ok(()),
        Some(index) => Err(SimError::invalid_parameter(
            "cells",
            format!("cell {index} is out of range: {:?}", cells[index]),
        )),
    }
}
