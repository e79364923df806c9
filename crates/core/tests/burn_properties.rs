//! Kernel invariants checked through the solver API
//!
//! Run tests with: cargo test --test `burn_properties`

mod common;

use approx::assert_relative_eq;
use paper_burn_core::{
    BurnParams, BurnSolver, Cell, CellField, CpuBurnSolver, PaperGenerator, NoiseConfig, Spark,
};

fn paper_solver(width: usize, height: usize, seed: u64) -> CpuBurnSolver {
    let sheet = PaperGenerator::new(NoiseConfig::default(), seed)
        .generate(width, height)
        .unwrap();
    CpuBurnSolver::new(sheet, BurnParams::default())
}

#[test]
fn test_fuel_never_increases_and_reference_is_fixed() {
    let mut solver = paper_solver(48, 40, 3);
    let initial = solver.read_cells().unwrap().into_owned();
    let mut previous = initial.clone();

    for frame in 0..150 {
        let spark = if frame < 40 {
            Spark::at(0.4, 0.6)
        } else {
            Spark::None
        };
        solver.step(spark);

        let current = solver.read_cells().unwrap();
        for ((now, before), origin) in current.iter().zip(&previous).zip(&initial) {
            assert!(now.fuel <= before.fuel, "fuel grew at frame {frame}");
            assert!(now.fuel <= now.reference_fuel);
            assert_eq!(now.reference_fuel.to_bits(), origin.reference_fuel.to_bits());
            assert!(now.temperature.is_finite() && now.temperature >= 0.0);
        }
        previous = current.into_owned();
    }
}

#[test]
fn test_spent_cells_stay_spent() {
    let mut field = CellField::new(9, 9);
    field.fill(Cell::new(1.0, 900.0, 1.0));
    for &(x, y) in &[(0, 0), (4, 4), (8, 3)] {
        field.set(x, y, Cell::new(0.0009, 600.0, 1.0));
    }
    let mut solver = CpuBurnSolver::new(field, BurnParams::default());
    solver.step(Spark::at(0.5, 0.5));

    let spent: Vec<usize> = solver
        .read_cells().unwrap()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_spent())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(spent, vec![0, 3 * 9 + 8, 4 * 9 + 4]);

    // Hot neighbours and a direct spark cannot revive them
    for _ in 0..30 {
        solver.step(Spark::at(0.5, 0.5));
        let cells = solver.read_cells().unwrap();
        for &i in &spent {
            assert_eq!(cells[i].fuel, 0.0);
            assert_eq!(cells[i].temperature, 0.0);
        }
    }
}

#[test]
fn test_just_below_ignition_never_burns() {
    let params = BurnParams::default();
    let held = params.burn_temp - 0.01;
    let mut solver = common::uniform_solver(1, 1, Cell::new(0.7, held, 0.7));

    for _ in 0..100 {
        solver.step(Spark::None);
    }
    let cell = solver.read_cells().unwrap()[0];
    assert_eq!(cell.fuel, 0.7);
    assert_eq!(cell.temperature, held);
}

#[test]
fn test_corner_cell_is_finite() {
    let mut solver = common::uniform_solver(7, 7, Cell::new(1.0, 1000.0, 1.0));
    solver.step(Spark::at(0.0, 0.0));
    let corner = solver.read_cells().unwrap()[0];
    assert!(corner.fuel.is_finite());
    assert!(corner.temperature.is_finite());
}

#[test]
fn test_burning_cell_scenario() {
    let mut solver = common::uniform_solver(3, 3, Cell::paper(1.0));
    let mut cells = vec![Cell::paper(1.0); 9];
    cells[4] = Cell::new(1.0, 520.0, 1.0);
    solver.write_cells(&cells).unwrap();

    // Neighbours are cold, so the centre evolves on its own for one step
    solver.step(Spark::None);
    let centre = solver.read_cells().unwrap()[4];
    assert_relative_eq!(centre.fuel, 0.9899, max_relative = 1e-6);
    assert_relative_eq!(centre.temperature, 520.52, max_relative = 1e-6);
    assert_eq!(centre.reference_fuel, 1.0);
}

#[test]
fn test_marginally_ignited_cell_stays_lit() {
    let params = BurnParams::default();
    let mut solver = common::uniform_solver(7, 7, Cell::paper(1.0));
    let mut cells = vec![Cell::paper(1.0); 49];
    cells[3 * 7 + 3] = Cell::new(1.0, 507.0, 1.0);
    solver.write_cells(&cells).unwrap();

    solver.step(Spark::None);
    let centre = solver.read_cells().unwrap()[3 * 7 + 3];
    assert!(centre.temperature > params.burn_temp, "cooled to {}", centre.temperature);
    assert_relative_eq!(centre.temperature, 507.507, max_relative = 1e-6);

    // Still above ignition going into the second step, so it keeps consuming fuel
    solver.step(Spark::None);
    let centre = solver.read_cells().unwrap()[3 * 7 + 3];
    assert_relative_eq!(centre.fuel, 0.9899 * 0.9899, max_relative = 1e-6);
}

#[test]
fn test_out_of_range_upload_is_rejected() {
    let mut solver = common::uniform_solver(2, 2, Cell::paper(1.0));
    let mut cells = vec![Cell::paper(0.25); 4];
    cells[1] = Cell::new(1.0, 600.0, 0.25);
    assert!(solver.write_cells(&cells).is_err());

    // Nothing was uploaded, so nothing can run past the temperature cap
    for _ in 0..20 {
        solver.step(Spark::at(0.5, 0.5));
    }
    let params = BurnParams::default();
    for cell in solver.read_cells().unwrap().iter() {
        assert!(cell.fuel <= cell.reference_fuel);
        assert!(cell.temperature <= params.max_temp);
    }
}

#[test]
fn test_below_epsilon_cell_is_extinguished() {
    let mut field = CellField::new(5, 5);
    field.fill(Cell::new(1.0, 900.0, 1.0));
    field.set(2, 2, Cell::new(0.0009, 700.0, 1.0));
    let mut solver = CpuBurnSolver::new(field, BurnParams::default());

    solver.step(Spark::at(0.5, 0.5));
    let cell = solver.read_cells().unwrap()[2 * 5 + 2];
    assert_eq!(cell.fuel, 0.0);
    assert_eq!(cell.temperature, 0.0);
}

#[test]
fn test_isolated_cell_is_steady() {
    let mut field = CellField::new(9, 9);
    field.set(4, 4, Cell::new(0.6, 250.0, 0.6));
    let mut solver = CpuBurnSolver::new(field, BurnParams::default());

    for _ in 0..10 {
        solver.step(Spark::None);
    }
    assert_eq!(solver.read_cells().unwrap()[4 * 9 + 4], Cell::new(0.6, 250.0, 0.6));
}

#[test]
fn test_cold_sheet_without_spark_is_unchanged() {
    let mut solver = paper_solver(32, 24, 5);
    let before = solver.read_cells().unwrap().into_owned();
    for _ in 0..50 {
        solver.step(Spark::None);
    }
    assert_eq!(solver.read_cells().unwrap().as_ref(), before.as_slice());
}

#[test]
fn test_spark_ignites_the_sheet() {
    let mut solver = common::uniform_solver(64, 64, Cell::paper(1.0));
    for _ in 0..20 {
        solver.step(Spark::at(0.5, 0.5));
    }
    let cells = solver.read_cells().unwrap();
    let centre = cells[32 * 64 + 32];
    assert!(centre.fuel < centre.reference_fuel, "centre should be burning");
    assert!(cells.iter().any(|c| c.is_unburned()));
}
