//! Burn solver module
//!
//! This module provides a unified GPU/CPU abstraction over the double-buffered
//! burn grid. The core abstraction is the `BurnSolver` trait, which has both
//! CPU and GPU implementations producing the same update rule.
//!
//! # Feature Flags
//!
//! - `gpu` (default): Enables GPU acceleration via wgpu. Disable with `--no-default-features`
//!   for environments without GPU access.
//!
//! # Backend Selection
//!
//! With [`BackendPreference::Auto`] the best available backend is used:
//! 1. Try GPU (if `gpu` feature enabled and hardware available)
//! 2. Fall back to CPU (always available)
//!
//! [`BackendPreference::Gpu`] reports [`SimError::GpuUnavailable`] instead of
//! falling back.
//!
//! # Example
//!
//! ```rust,ignore
//! use paper_burn_core::solver::{create_burn_solver, PaperGenerator};
//! use paper_burn_core::SimConfig;
//!
//! let config = SimConfig::new(512, 512).with_seed(7);
//! let sheet = PaperGenerator::new(config.noise, 7).generate(512, 512)?;
//! let solver = create_burn_solver(&config, sheet)?;
//! ```

pub mod combustion;
mod context;
mod cpu;
mod fields;
pub mod flame;
mod grid_state;
pub mod noise;
pub mod paper;
pub mod profiler;
#[allow(clippy::module_name_repetitions)]
mod r#trait;

#[cfg(feature = "gpu")]
mod gpu;

// Re-exports
pub use combustion::{burn_cell, step_burn_cpu, Stencil};
pub use context::GpuInitResult;
pub use cpu::CpuBurnSolver;
pub use fields::CellField;
pub use flame::{flame_color, render_cpu, stretch};
pub use grid_state::GridState;
pub use noise::{NoiseGenerator, NoiseOctave};
pub use paper::PaperGenerator;
pub use profiler::{FrameTimer, ProfilerScope};
pub use r#trait::BurnSolver;

#[cfg(feature = "gpu")]
pub use context::GpuContext;
#[cfg(feature = "gpu")]
pub use gpu::GpuBurnSolver;

use crate::config::{BackendPreference, SimConfig};
use crate::error::SimError;
use tracing::info;

#[cfg(feature = "gpu")]
use tracing::warn;

/// Create a burn solver for `initial` using the configured backend
///
/// # Arguments
///
/// * `config` - Simulation configuration (backend preference and kernel constants)
/// * `initial` - Starting sheet
///
/// # Errors
///
/// Returns [`SimError::GpuUnavailable`] when the GPU backend was explicitly
/// requested and cannot be created.
pub fn create_burn_solver(
    config: &SimConfig,
    initial: CellField,
) -> Result<Box<dyn BurnSolver>, SimError> {
    let (width, height) = (initial.width, initial.height);

    if config.backend == BackendPreference::Cpu {
        info!("CPU backend requested ({}x{} grid)", width, height);
        return Ok(Box::new(CpuBurnSolver::new(initial, config.burn)));
    }

    #[cfg(feature = "gpu")]
    {
        let reason = match GpuContext::new() {
            GpuInitResult::Success(gpu_context) => {
                if gpu_context.can_allocate(width, height) {
                    info!(
                        "Using GPU backend: {} ({}x{} grid)",
                        gpu_context.adapter_name(),
                        width,
                        height
                    );
                    return Ok(Box::new(GpuBurnSolver::new(gpu_context, &initial, config.burn)));
                }
                warn!(
                    "GPU has insufficient memory for {}x{} grid, falling back to CPU",
                    width, height
                );
                format!("insufficient GPU memory for a {width}x{height} grid")
            }
            GpuInitResult::NoGpuFound => {
                info!("No GPU found, using CPU backend");
                "no compatible GPU adapter".to_string()
            }
            GpuInitResult::InitFailed {
                adapter_name,
                error,
            } => {
                warn!(
                    "GPU '{}' found but failed to initialize: {}. Falling back to CPU.",
                    adapter_name, error
                );
                format!("adapter '{adapter_name}' failed to initialize: {error}")
            }
        };
        if config.backend == BackendPreference::Gpu {
            return Err(SimError::GpuUnavailable(reason));
        }
    }

    #[cfg(not(feature = "gpu"))]
    {
        if config.backend == BackendPreference::Gpu {
            return Err(SimError::GpuUnavailable(
                "built without the `gpu` feature".to_string(),
            ));
        }
        info!("GPU feature disabled, using CPU backend");
    }

    Ok(Box::new(CpuBurnSolver::new(initial, config.burn)))
}
