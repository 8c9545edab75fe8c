//! Error handling for PlanKit
//!
//! Provides the shared error type used across the survey, render, and export
//! layers. Geometry and identifier errors are deterministic: callers must fix
//! the input rather than retry.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Core error type
///
/// Represents failures in plot lookup, boundary validation, and the
/// filesystem operations shared by every export path.
#[derive(Error, Debug)]
pub enum PlanError {
    /// The requested plot does not exist in the collaborating store
    #[error("Plot {plot_id} not found")]
    NotFound {
        /// The missing plot identifier.
        plot_id: i64,
    },

    /// The boundary ring is unusable for traverse computation
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry {
        /// Why the ring was rejected.
        reason: String,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl PlanError {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        PlanError::Other(msg.into())
    }

    /// Create an `InvalidGeometry` error with the given reason
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        PlanError::InvalidGeometry {
            reason: reason.into(),
        }
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlanError::NotFound { .. })
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, PlanError::InvalidGeometry { .. })
    }
}

/// Result type using PlanError
pub type Result<T> = std::result::Result<T, PlanError>;
