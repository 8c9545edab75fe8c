//! Error types for the render crate.

use thiserror::Error;

/// Errors that can occur while composing or rasterizing a plan page.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Core model or geometry error.
    #[error(transparent)]
    Plan(#[from] plankit_core::PlanError),

    /// The drawing surface could not be created or converted.
    #[error("Canvas error: {0}")]
    Canvas(String),

    /// PNG encoding/decoding failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error writing an artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    pub fn canvas(msg: impl Into<String>) -> Self {
        RenderError::Canvas(msg.into())
    }
}

/// Result type using RenderError
pub type Result<T> = std::result::Result<T, RenderError>;
