//! # PlanKit
//!
//! A cadastral survey-plan toolkit: given a plot boundary and the features
//! an external spatial store has classified around it, PlanKit back-computes
//! the closed traverse (bearings, distances, closure check) and renders a
//! true-scale plan as a PNG preview, a paginated report PDF, a landscape
//! back-computation table, and a layered DXF.
//!
//! ## Architecture
//!
//! ```text
//! PlotStore (external spatial store)
//!   └── PlanService (paths, orchestration)
//!         ├── plankit-survey  (projection, traverse, scale planning)
//!         ├── plankit-render  (page layout, map window, PNG)
//!         └── plankit-export  (report PDF, traverse PDF, DXF)
//! ```
//!
//! Each export call is synchronous, CPU-bound, and owns its render model;
//! nothing is shared between concurrent exports except the deterministic
//! output paths.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use plankit::{MemoryPlotStore, PlanService};
//! use plankit_core::{PlanMetadata, Plot};
//!
//! let mut store = MemoryPlotStore::new();
//! store.insert_plot(plot);
//!
//! let service = PlanService::new(store, "reports");
//! service.export_report_pdf(1, PlanMetadata::default())?;
//! service.export_dxf(1)?;
//! ```

pub mod error;
pub mod service;
pub mod store;

pub use error::{Error, Result};
pub use service::{ArtifactKind, PlanService};
pub use store::{MemoryPlotStore, PlotStore};

pub use plankit_core::{
    DetectedFeature, FeatureKind, FeatureLocation, FeatureSummary, PlanError, PlanMetadata, Plot,
};
pub use plankit_export::{ExportError, ReportData};
pub use plankit_render::{ImageryProvider, RenderError, RenderModel};
pub use plankit_survey::{
    compute_traverse, nice_grid_step, normalize_plot, parse_scale_ratio, ClosureSummary, Dms,
    ScalePlan, Traverse, TraverseRow,
};
