//! # PlanKit Export
//!
//! Document exporters for PlanKit: the two-page report PDF, the landscape
//! back-computation table PDF, and the layered DXF vector file. All three
//! consume the same [`RenderModel`](plankit_render::RenderModel), so
//! bearings, area, and feature counts agree across formats for one plot.

pub mod dxf_export;
pub mod error;
pub mod report_pdf;
pub mod traverse_pdf;

pub use dxf_export::export_survey_dxf;
pub use error::{ExportError, Result};
pub use report_pdf::{write_image_pdf, write_report_pdf, ReportData};
pub use traverse_pdf::write_traverse_pdf;
