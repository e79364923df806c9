//! Frame driver and whole-sheet statistics

mod paper_simulation;
mod stats;

pub use paper_simulation::PaperSimulation;
pub use stats::BurnStats;
