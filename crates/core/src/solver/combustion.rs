//! Combustion kernel
//!
//! Advances one cell by one step from the previous frame's grid. Everything
//! read comes from the front buffer, everything written goes to the back
//! buffer, so cells can be processed in any order and in parallel.
//!
//! # Update rule
//!
//! 1. **Conduction**: sum the temperatures of neighbours in a square window
//!    that are at or above `burn_temp`, each weighted by `exp(-distance)`.
//! 2. **Spark**: add `z^0.25 * 64 * exp(-0.04 * d)` where `d` is the
//!    cell-space distance from the cell centre to the spark.
//! 3. **Diffusion**: add `0.02 * z * tn`.
//! 4. **Combustion**: above `burn_temp`, temperature grows by 0.1% up to
//!    `max_temp` and is scaled by the fuel fraction `n / z` held at the start
//!    of the step. Fuel then decays by `0.9899`.
//! 5. **Extinguish**: fuel below `0.001` zeroes fuel and temperature for good.
//!
//! Here `n` is fuel, `t` temperature and `z` reference fuel. The constants
//! above are the [`BurnParams`] defaults.

use super::fields::CellField;
use crate::config::BurnParams;
use crate::core_types::{Cell, Vec2};
use rayon::prelude::*;

/// Precomputed neighbour offsets and conduction weights.
///
/// A `(2r + 1)^2` window without the centre cell, so radius 3 gives 48 taps.
#[derive(Debug, Clone, PartialEq)]
pub struct Stencil {
    taps: Vec<(isize, isize, f32)>,
}

impl Stencil {
    /// Square window of half-width `radius`.
    #[must_use]
    pub fn new(radius: u32) -> Self {
        let r = radius as isize;
        let mut taps = Vec::with_capacity(((2 * r + 1) * (2 * r + 1) - 1) as usize);
        for dx in -r..=r {
            for dy in -r..=r {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let distance = Vec2::new(dx as f32, dy as f32).norm();
                taps.push((dx, dy, (-distance).exp()));
            }
        }
        Self { taps }
    }

    /// Number of neighbours sampled per cell
    #[must_use]
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// `(dx, dy, weight)` for every neighbour
    #[must_use]
    pub fn taps(&self) -> &[(isize, isize, f32)] {
        &self.taps
    }
}

/// Heat arriving from neighbours hot enough to be burning.
///
/// Out-of-grid taps read the nearest edge cell.
#[inline]
#[must_use]
pub fn neighbor_heat(
    front: &CellField,
    x: usize,
    y: usize,
    stencil: &Stencil,
    burn_temp: f32,
) -> f32 {
    let (x, y) = (x as isize, y as isize);
    stencil
        .taps()
        .iter()
        .map(|&(dx, dy, weight)| {
            let txy = front.get_clamped(x + dx, y + dy).temperature;
            if txy >= burn_temp {
                txy * weight
            } else {
                0.0
            }
        })
        .sum()
}

/// Apply heating, combustion and extinguishing to one cell.
///
/// `tn` is the conduction sum from [`neighbor_heat`]; `spark_distance` the
/// cell-space distance to an active spark. Reference fuel passes through.
#[inline]
#[must_use]
pub fn advance_cell(cell: Cell, tn: f32, spark_distance: Option<f32>, params: &BurnParams) -> Cell {
    let z = cell.reference_fuel;
    let mut n = cell.fuel;
    let mut t = cell.temperature;

    if let Some(d) = spark_distance {
        t += z.powf(params.spark_fuel_exponent)
            * params.spark_gain
            * (-params.spark_falloff * d).exp();
    }

    t += params.conduction * z * tn;

    if t > params.burn_temp {
        // Scaled by the fuel present before this step's decay
        t = if z > 0.0 {
            (t * params.growth_rate).min(params.max_temp) * (n / z)
        } else {
            // No reference fuel means nothing to burn; avoid 0/0
            0.0
        };
        n *= params.fuel_decay;
    }

    if n < params.extinguish_fuel {
        n = 0.0;
        t = 0.0;
    }

    Cell {
        fuel: n,
        temperature: t,
        reference_fuel: z,
        reserved: cell.reserved,
    }
}

/// Full update of cell `(x, y)`.
///
/// `spark` is the spark position in cell space, `None` when no pointer is down.
#[inline]
#[must_use]
pub fn burn_cell(
    front: &CellField,
    x: usize,
    y: usize,
    spark: Option<Vec2>,
    stencil: &Stencil,
    params: &BurnParams,
) -> Cell {
    let cell = front.get(x, y);
    let tn = neighbor_heat(front, x, y, stencil, params.burn_temp);
    let centre = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
    let spark_distance = spark.map(|p| (centre - p).norm());
    advance_cell(cell, tn, spark_distance, params)
}

/// CPU implementation of one kernel pass, front -> back.
///
/// Rows of the back buffer are written in parallel; no row reads the back
/// buffer, so there is no ordering between cells within a pass.
///
/// # Panics
///
/// Panics if the two buffers differ in size.
pub fn step_burn_cpu(
    front: &CellField,
    back: &mut CellField,
    spark: Option<Vec2>,
    stencil: &Stencil,
    params: &BurnParams,
) {
    assert_eq!(
        (front.width, front.height),
        (back.width, back.height),
        "front and back buffers must match"
    );
    let width = front.width;

    back.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                *out = burn_cell(front, x, y, spark, stencil, params);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn single(cell: Cell) -> CellField {
        CellField::from_cells(1, 1, vec![cell]).unwrap()
    }

    #[test]
    fn test_stencil_has_48_taps_for_radius_3() {
        let stencil = Stencil::new(3);
        assert_eq!(stencil.len(), 48);
        assert!(stencil.taps().iter().all(|&(dx, dy, _)| dx != 0 || dy != 0));

        let nearest = stencil
            .taps()
            .iter()
            .find(|&&(dx, dy, _)| dx == 1 && dy == 0)
            .unwrap();
        assert_relative_eq!(nearest.2, (-1.0_f32).exp());
    }

    #[test]
    fn test_cold_neighbors_contribute_nothing() {
        let mut field = CellField::new(5, 5);
        field.fill(Cell::new(1.0, 505.0, 1.0));
        let heat = neighbor_heat(&field, 2, 2, &Stencil::new(3), 506.0);
        assert_eq!(heat, 0.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut field = CellField::new(3, 1);
        field.set(0, 0, Cell::new(1.0, 506.0, 1.0));
        let heat = neighbor_heat(&field, 1, 0, &Stencil::new(1), 506.0);
        // Clamped taps at y = +-1 also read row 0, so the left column counts 3 times
        let w1 = (-1.0_f32).exp();
        let w2 = (-(2.0_f32).sqrt()).exp();
        assert_relative_eq!(heat, 506.0 * (w1 + 2.0 * w2), max_relative = 1e-6);
    }

    #[test]
    fn test_burning_scenario() {
        let params = BurnParams::default();
        let next = advance_cell(Cell::new(1.0, 520.0, 1.0), 0.0, None, &params);
        assert_relative_eq!(next.fuel, 0.9899, max_relative = 1e-6);
        // Full fuel going in, so no rescale on the first burning step
        assert_relative_eq!(next.temperature, 520.52, max_relative = 1e-6);
        assert_eq!(next.reference_fuel, 1.0);

        // Second step scales by the fuel left after the first
        let after = advance_cell(next, 0.0, None, &params);
        assert_relative_eq!(after.temperature, 520.52 * 1.001 * 0.9899, max_relative = 1e-5);
        assert_relative_eq!(after.fuel, 0.9899 * 0.9899, max_relative = 1e-6);
    }

    #[test]
    fn test_marginal_ignition_keeps_burning() {
        let params = BurnParams::default();
        let next = advance_cell(Cell::new(1.0, 507.0, 1.0), 0.0, None, &params);
        assert_relative_eq!(next.temperature, 507.507, max_relative = 1e-6);
        assert!(next.temperature > params.burn_temp);

        let after = advance_cell(next, 0.0, None, &params);
        assert!(after.fuel < next.fuel);
    }

    #[test]
    fn test_temperature_capped_at_max() {
        let params = BurnParams::default();
        let next = advance_cell(Cell::new(1.0, 1089.0, 1.0), 0.0, None, &params);
        assert_eq!(next.temperature, 1089.0);

        let partial = advance_cell(Cell::new(0.5, 1089.0, 1.0), 0.0, None, &params);
        assert_relative_eq!(partial.temperature, 1089.0 * 0.5, max_relative = 1e-6);
    }

    #[test]
    fn test_diffusion_scales_with_reference_fuel() {
        let params = BurnParams::default();
        let tn = 2000.0;

        let dense = advance_cell(Cell::new(1.0, 100.0, 1.0), tn, None, &params);
        assert_relative_eq!(dense.temperature, 100.0 + 0.02 * 1.0 * tn, max_relative = 1e-6);
        assert_eq!(dense.fuel, 1.0);

        let thin = advance_cell(Cell::new(0.25, 100.0, 0.25), tn, None, &params);
        assert_relative_eq!(thin.temperature, 100.0 + 0.02 * 0.25 * tn, max_relative = 1e-6);
        assert_relative_eq!(
            dense.temperature - 100.0,
            4.0 * (thin.temperature - 100.0),
            max_relative = 1e-5
        );

        let blank = advance_cell(Cell::paper(0.0), tn, None, &params);
        assert_eq!(blank.temperature, 0.0);
    }

    #[test]
    fn test_below_epsilon_is_extinguished() {
        let params = BurnParams::default();
        for t in [0.0, 300.0, 900.0] {
            let next = advance_cell(Cell::new(0.0009, t, 0.8), 5000.0, Some(0.0), &params);
            assert_eq!(next.fuel, 0.0);
            assert_eq!(next.temperature, 0.0);
            assert_eq!(next.reference_fuel, 0.8);
        }
    }

    #[test]
    fn test_zero_reference_fuel_stays_finite() {
        let params = BurnParams::default();
        let next = advance_cell(Cell::new(0.0, 900.0, 0.0), 0.0, None, &params);
        assert!(next.temperature.is_finite());
        assert_eq!(next.temperature, 0.0);
        assert_eq!(next.fuel, 0.0);
    }

    #[test]
    fn test_isolated_cell_is_steady() {
        let params = BurnParams::default();
        let cell = Cell::new(0.6, 400.0, 0.6);
        let field = single(cell);
        let next = burn_cell(&field, 0, 0, None, &Stencil::new(3), &params);
        assert_eq!(next, cell);
    }

    #[test]
    fn test_spark_heats_richer_fuel_more() {
        let params = BurnParams::default();
        let thin = advance_cell(Cell::paper(0.1), 0.0, Some(0.0), &params);
        let dense = advance_cell(Cell::paper(1.0), 0.0, Some(0.0), &params);
        assert_relative_eq!(dense.temperature, 64.0);
        assert_relative_eq!(thin.temperature, 64.0 * 0.1_f32.powf(0.25), max_relative = 1e-6);
        assert!(dense.temperature > thin.temperature);
    }

    #[test]
    fn test_spark_falls_off_with_distance() {
        let params = BurnParams::default();
        let near = advance_cell(Cell::paper(1.0), 0.0, Some(1.0), &params);
        let far = advance_cell(Cell::paper(1.0), 0.0, Some(100.0), &params);
        assert!(near.temperature > far.temperature);
        assert_relative_eq!(far.temperature, 64.0 * (-4.0_f32).exp(), max_relative = 1e-5);
    }

    #[test]
    fn test_corner_cell_is_finite() {
        let params = BurnParams::default();
        let mut field = CellField::new(4, 4);
        field.fill(Cell::new(1.0, 900.0, 1.0));
        let next = burn_cell(&field, 0, 0, Some(Vec2::new(0.5, 0.5)), &Stencil::new(3), &params);
        assert!(next.fuel.is_finite() && next.temperature.is_finite());
        assert!(next.fuel < 1.0);
    }

    #[test]
    fn test_step_writes_every_cell() {
        let params = BurnParams::default();
        let mut front = CellField::new(8, 6);
        front.fill(Cell::paper(0.5));
        let mut back = CellField::new(8, 6);
        back.fill(Cell::new(9.0, 9.0, 9.0));

        step_burn_cpu(&front, &mut back, None, &Stencil::new(3), &params);
        assert_eq!(back, front);
    }
}
