//! Whole-sheet burn statistics

use crate::config::BurnParams;
use crate::core_types::Cell;
use serde::{Deserialize, Serialize};

/// Cell counts by burn stage plus fuel totals.
///
/// Every cell falls into exactly one stage:
/// - `unburned`: no fuel lost and still cold
/// - `scorched`: no fuel lost but heated
/// - `burning`: has lost fuel and is above the ignition threshold
/// - `charred`: has lost fuel, still holds some, and has cooled
/// - `spent`: extinguished, no fuel left
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BurnStats {
    pub unburned: usize,
    pub scorched: usize,
    pub burning: usize,
    pub charred: usize,
    pub spent: usize,
    /// Sum of remaining fuel
    pub total_fuel: f64,
    /// Sum of fuel at initialization
    pub total_reference_fuel: f64,
}

impl BurnStats {
    /// Classify every cell.
    #[must_use]
    pub fn from_cells(cells: &[Cell], params: &BurnParams) -> Self {
        let mut stats = Self::default();
        for cell in cells {
            stats.total_fuel += f64::from(cell.fuel);
            stats.total_reference_fuel += f64::from(cell.reference_fuel);

            if cell.is_unburned() {
                if cell.temperature > 0.0 {
                    stats.scorched += 1;
                } else {
                    stats.unburned += 1;
                }
            } else if cell.is_spent() {
                stats.spent += 1;
            } else if cell.temperature > params.burn_temp {
                stats.burning += 1;
            } else {
                stats.charred += 1;
            }
        }
        stats
    }

    /// Number of cells classified.
    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.unburned + self.scorched + self.burning + self.charred + self.spent
    }

    /// Fraction of the initial fuel consumed, 0 for a blank sheet.
    #[must_use]
    pub fn consumed_fraction(&self) -> f64 {
        if self.total_reference_fuel > 0.0 {
            1.0 - self.total_fuel / self.total_reference_fuel
        } else {
            0.0
        }
    }

    /// True once nothing is burning.
    #[must_use]
    pub fn is_quiescent(&self) -> bool {
        self.burning == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_stage_is_counted_once() {
        let params = BurnParams::default();
        let cells = [
            Cell::paper(0.8),
            Cell::new(0.8, 120.0, 0.8),
            Cell::new(0.5, 900.0, 0.8),
            Cell::new(0.5, 0.0, 0.8),
            Cell::new(0.0, 0.0, 0.8),
        ];
        let stats = BurnStats::from_cells(&cells, &params);
        assert_eq!(stats.unburned, 1);
        assert_eq!(stats.scorched, 1);
        assert_eq!(stats.burning, 1);
        assert_eq!(stats.charred, 1);
        assert_eq!(stats.spent, 1);
        assert_eq!(stats.total_cells(), cells.len());
        assert!(!stats.is_quiescent());
    }

    #[test]
    fn test_consumed_fraction() {
        let params = BurnParams::default();
        let cells = [Cell::new(0.25, 0.0, 0.5), Cell::paper(0.5)];
        let stats = BurnStats::from_cells(&cells, &params);
        assert!((stats.consumed_fraction() - 0.25).abs() < 1e-9);

        let blank = BurnStats::from_cells(&[Cell::paper(0.0)], &params);
        assert_eq!(blank.consumed_fraction(), 0.0);
    }
}
