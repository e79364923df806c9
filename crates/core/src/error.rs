//! Error type for simulation setup
//!
//! Construction, host-facing buffer exchange and GPU readback can fail. The
//! per-cell kernel and the flame pass are total functions.

use std::{error::Error, fmt};

/// Errors reported by solver and simulation constructors.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Grid dimensions are zero or too large to address
    InvalidDimensions { width: usize, height: usize },
    /// A tuning parameter is out of its valid range
    InvalidParameter { name: &'static str, reason: String },
    /// A host-supplied buffer does not match the grid
    BufferSizeMismatch { expected: usize, actual: usize },
    /// GPU backend was explicitly requested but could not be created
    GpuUnavailable(String),
    /// Copying a GPU buffer back to the host failed
    ReadbackFailed(String),
}

impl SimError {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions {width}x{height}: both must be positive")
            }
            SimError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter {name}: {reason}")
            }
            SimError::BufferSizeMismatch { expected, actual } => {
                write!(f, "buffer holds {actual} elements, grid needs {expected}")
            }
            SimError::GpuUnavailable(reason) => write!(f, "GPU backend unavailable: {reason}"),
            SimError::ReadbackFailed(reason) => write!(f, "GPU readback failed: {reason}"),
        }
    }
}

impl Error for SimError {}
