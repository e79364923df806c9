//! Shared setup for integration tests
#![allow(dead_code)]

use paper_burn_core::{BackendPreference, BurnParams, Cell, CellField, CpuBurnSolver, SimConfig};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Deterministic CPU-only configuration.
pub fn cpu_config(width: usize, height: usize, seed: u64) -> SimConfig {
    SimConfig::new(width, height)
        .with_seed(seed)
        .with_backend(BackendPreference::Cpu)
}

/// CPU solver over a grid filled with one cell value.
pub fn uniform_solver(width: usize, height: usize, cell: Cell) -> CpuBurnSolver {
    let mut field = CellField::new(width, height);
    field.fill(cell);
    CpuBurnSolver::new(field, BurnParams::default())
}
