//! Error types for the export crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while producing an output artifact.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Core model or geometry error.
    #[error(transparent)]
    Plan(#[from] plankit_core::PlanError),

    /// Upstream rendering failed.
    #[error(transparent)]
    Render(#[from] plankit_render::RenderError),

    /// PDF document assembly failed.
    #[error("PDF error: {0}")]
    Pdf(#[from] printpdf::Error),

    /// DXF serialization failed.
    #[error("DXF error: {0}")]
    Dxf(#[from] dxf::DxfError),

    /// The embedded map image could not be decoded.
    #[error("Image error: {0}")]
    Image(#[from] printpdf::image_crate::ImageError),

    /// An intermediate raster was empty or too small to embed; refusing to
    /// produce a corrupt document.
    #[error("Render integrity failure: {path} is {size} bytes")]
    RenderIntegrity {
        /// The suspect intermediate file.
        path: PathBuf,
        /// Its observed size in bytes.
        size: u64,
    },

    /// I/O error writing the artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type using ExportError
pub type Result<T> = std::result::Result<T, ExportError>;
