//! Double-buffered grid ownership
//!
//! [`GridState`] owns both grids and the index of the readable one. Each
//! frame the kernel gets a read view of the front and a write view of the
//! back, never both on the same buffer; [`GridState::swap`] flips the roles
//! once the pass has completed.

use super::fields::CellField;
use crate::core_types::Cell;

/// Front/back pair of equally sized grids.
#[derive(Debug, Clone)]
pub struct GridState {
    buffers: [CellField; 2],
    front: usize,
}

impl GridState {
    /// Both buffers start with the same contents.
    #[must_use]
    pub fn new(initial: CellField) -> Self {
        let back = initial.clone();
        Self {
            buffers: [initial, back],
            front: 0,
        }
    }

    /// Grid width in cells
    #[must_use]
    pub fn width(&self) -> usize {
        self.buffers[0].width
    }

    /// Grid height in cells
    #[must_use]
    pub fn height(&self) -> usize {
        self.buffers[0].height
    }

    /// Index (0 or 1) of the readable buffer
    #[must_use]
    pub fn front_index(&self) -> usize {
        self.front
    }

    /// Read view of the current state
    #[must_use]
    pub fn front(&self) -> &CellField {
        &self.buffers[self.front]
    }

    /// Split borrow: read the front while writing the back.
    pub fn front_and_back(&mut self) -> (&CellField, &mut CellField) {
        let [a, b] = &mut self.buffers;
        if self.front == 0 {
            (&*a, b)
        } else {
            (&*b, a)
        }
    }

    /// Zero the back buffer before it is written.
    pub fn clear_back(&mut self) {
        let (_, back) = self.front_and_back();
        back.fill(Cell::default());
    }

    /// Make the back buffer readable. Call once per completed kernel pass.
    pub fn swap(&mut self) {
        self.front = 1 - self.front;
    }

    /// Replace both buffers, e.g. when the host uploads a new sheet.
    pub fn reset(&mut self, initial: CellField) {
        self.buffers = [initial.clone(), initial];
        self.front = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_flips_roles() {
        let mut state = GridState::new(CellField::new(2, 2));
        assert_eq!(state.front_index(), 0);

        {
            let (front, back) = state.front_and_back();
            assert_eq!(front.get(0, 0), Cell::default());
            back.set(0, 0, Cell::paper(0.5));
        }
        // Writes to the back are invisible until the swap
        assert_eq!(state.front().get(0, 0), Cell::default());

        state.swap();
        assert_eq!(state.front_index(), 1);
        assert_eq!(state.front().get(0, 0), Cell::paper(0.5));
    }

    #[test]
    fn test_clear_back_leaves_front_alone() {
        let mut state = GridState::new(CellField::from_cells(1, 1, vec![Cell::paper(1.0)]).unwrap());
        state.clear_back();
        assert_eq!(state.front().get(0, 0), Cell::paper(1.0));
        state.swap();
        assert_eq!(state.front().get(0, 0), Cell::default());
    }
}
