//! # PlanKit Survey
//!
//! Survey mathematics for PlanKit: geometry normalization to planar meters,
//! traverse back-computation with closure checking, and true-scale view
//! planning.
//!
//! The crate is pure computation: no drawing, no I/O. Inputs come from the
//! external spatial store via `plankit-core` types; outputs feed the render
//! and export layers.

pub mod projection;
pub mod scale;
pub mod traverse;

pub use projection::{normalize_plot, project_coord, project_geometry, NormalizedPlot};
pub use scale::{
    nice_grid_step, parse_scale_ratio, plan_scale, scale_bar_length_m, ScalePlan, ViewExtent,
    FALLBACK_SCALE_RATIO,
};
pub use traverse::{
    bearing_deg, compute_traverse, station_label, ClosureSummary, Dms, Traverse, TraverseRow,
};
