//! Unified error type for the facade.

use thiserror::Error;

/// Any failure an export request can surface.
#[derive(Error, Debug)]
pub enum Error {
    /// Lookup, geometry, or shared I/O error.
    #[error(transparent)]
    Plan(#[from] plankit_core::PlanError),

    /// Page rendering error.
    #[error(transparent)]
    Render(#[from] plankit_render::RenderError),

    /// Document serialization error.
    #[error(transparent)]
    Export(#[from] plankit_export::ExportError),
}

impl Error {
    /// Whether the failure was a missing plot id.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Plan(plankit_core::PlanError::NotFound { .. })
        )
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
