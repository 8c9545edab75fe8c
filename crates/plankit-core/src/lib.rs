//! # PlanKit Core
//!
//! Core types, errors, and page-unit constants for PlanKit.
//! Provides the data model shared by the survey, render, and export layers.

pub mod error;
pub mod model;
pub mod units;

pub use error::{PlanError, Result};
pub use model::{
    DetectedFeature, FeatureKind, FeatureLocation, FeatureSummary, PlanMetadata, Plot,
};
pub use units::{MapWindow, PageSize, A4_LANDSCAPE, A4_PORTRAIT, INCH_TO_M, RENDER_DPI};
