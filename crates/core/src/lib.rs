//! Paper Burn Simulation Core Library
//!
//! A cellular simulation of a sheet of paper catching fire. Every cell carries
//! fuel and temperature; a double-buffered stencil kernel spreads heat from
//! burning neighbours, consumes fuel and extinguishes spent cells, and a
//! colour stage renders the sheet scorching brown before it glows and chars.
//!
//! ## Pipeline
//!
//! - [`solver::PaperGenerator`] seeds fuel density from multi-octave noise
//! - [`solver::BurnSolver`] runs the kernel on the CPU (Rayon) or GPU (wgpu)
//! - [`solver::flame`] maps each cell to a display colour
//! - [`PaperSimulation`] drives one step and one render per frame from
//!   pointer input

// Core types and utilities
pub mod config;
pub mod core_types;
pub mod error;

// Backends and the frame driver
pub mod simulation;
pub mod solver;

// Re-export core types
pub use config::{BackendPreference, BurnParams, NoiseConfig, SimConfig};
pub use core_types::{Cell, FrameImage, PointerSample, Rgba, Spark, Vec2};
pub use error::SimError;

// Re-export the driver and backend entry points
pub use simulation::{BurnStats, PaperSimulation};
pub use solver::{create_burn_solver, BurnSolver, CellField, CpuBurnSolver, PaperGenerator};
