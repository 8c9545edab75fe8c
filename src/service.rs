//! Export orchestration.
//!
//! One [`PlanService`] call produces one artifact: it fetches the plot from
//! the store (failing with `NotFound` before anything is written), assembles
//! the per-request [`RenderModel`], creates the output directory on demand,
//! and hands off to the matching renderer or exporter. Calls are synchronous
//! and CPU-bound; callers wanting bounded latency should dispatch them on a
//! worker thread. Output paths are deterministic per (plot id, artifact
//! kind), so concurrent exports of the same pair race on the file — callers
//! serialize those or write to a temporary name and rename.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use plankit_core::{FeatureSummary, MapWindow, PlanMetadata};
use plankit_export::{
    export_survey_dxf, write_image_pdf, write_report_pdf, write_traverse_pdf, ReportData,
};
use plankit_render::{
    render_orthophoto_png, render_plan_png, ImageryProvider, RenderModel,
};

use crate::error::Result;
use crate::store::{require_plot, PlotStore};

/// The artifacts a plot can be exported as.
///
/// Each kind owns a deterministic path under the output root, mirroring the
/// directory layout report consumers already expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Survey-plan PNG preview.
    PlanPreview,
    /// Intermediate map PNG embedded in the report.
    MapImage,
    /// Two-page report PDF.
    ReportPdf,
    /// Landscape back-computation table PDF.
    TraversePdf,
    /// Layered CAD vector file.
    SurveyDxf,
    /// Orthophoto PNG preview.
    OrthophotoPreview,
    /// Intermediate orthophoto PNG for the PDF wrapper.
    OrthophotoImage,
    /// Single-page orthophoto PDF.
    OrthophotoPdf,
}

impl ArtifactKind {
    /// Path relative to the output root.
    pub fn rel_path(&self, plot_id: i64) -> PathBuf {
        match self {
            ArtifactKind::PlanPreview => {
                PathBuf::from("previews").join(format!("plot_{plot_id}_preview.png"))
            }
            ArtifactKind::MapImage => {
                PathBuf::from("maps").join(format!("plot_{plot_id}_map.png"))
            }
            ArtifactKind::ReportPdf => PathBuf::from(format!("plot_{plot_id}_report.pdf")),
            ArtifactKind::TraversePdf => {
                PathBuf::from(format!("plot_{plot_id}_back_computation.pdf"))
            }
            ArtifactKind::SurveyDxf => {
                PathBuf::from("dwg").join(format!("plot_{plot_id}_survey_plan.dxf"))
            }
            ArtifactKind::OrthophotoPreview => {
                PathBuf::from("orthophoto").join(format!("plot_{plot_id}_orthophoto_preview.png"))
            }
            ArtifactKind::OrthophotoImage => {
                PathBuf::from("orthophoto").join(format!("plot_{plot_id}_orthophoto.png"))
            }
            ArtifactKind::OrthophotoPdf => {
                PathBuf::from("orthophoto").join(format!("plot_{plot_id}_orthophoto.pdf"))
            }
        }
    }
}

/// Produces plot artifacts from a [`PlotStore`] into an output directory.
pub struct PlanService<S: PlotStore> {
    store: S,
    output_root: PathBuf,
}

impl<S: PlotStore> PlanService<S> {
    pub fn new(store: S, output_root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            output_root: output_root.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve an artifact path, creating its directory on demand.
    /// Directory creation failure is fatal for the request.
    pub fn artifact_path(&self, kind: ArtifactKind, plot_id: i64) -> Result<PathBuf> {
        let path = self.output_root.join(kind.rel_path(plot_id));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(plankit_core::PlanError::Io)?;
        }
        Ok(path)
    }

    /// Feature counts inside and within the buffer, for report consumers.
    pub fn feature_summary(&self, plot_id: i64) -> Result<FeatureSummary> {
        require_plot(&self.store, plot_id)?;
        let features = self.store.features(plot_id)?;
        Ok(FeatureSummary::from_features(plot_id, &features))
    }

    /// Assemble the render model for one export request.
    fn model(&self, plot_id: i64, metadata: PlanMetadata, window: MapWindow) -> Result<RenderModel> {
        let plot = require_plot(&self.store, plot_id)?;
        let features = self.store.features(plot_id)?;
        let buffer = self.store.buffer(plot_id)?;
        debug!(plot_id, features = features.len(), "assembling render model");
        Ok(RenderModel::build(
            &plot,
            &features,
            buffer.as_ref(),
            metadata,
            window,
        )?)
    }

    /// Survey-plan PNG preview.
    pub fn render_plan_preview(&self, plot_id: i64, metadata: PlanMetadata) -> Result<PathBuf> {
        let model = self.model(plot_id, metadata, MapWindow::PLAN)?;
        let path = self.artifact_path(ArtifactKind::PlanPreview, plot_id)?;
        render_plan_png(&model, &path)?;
        info!(plot_id, path = %path.display(), "plan preview exported");
        Ok(path)
    }

    /// Two-page report PDF (renders the map image first, then embeds it).
    pub fn export_report_pdf(&self, plot_id: i64, metadata: PlanMetadata) -> Result<PathBuf> {
        let model = self.model(plot_id, metadata, MapWindow::PLAN)?;
        let map_path = self.artifact_path(ArtifactKind::MapImage, plot_id)?;
        render_plan_png(&model, &map_path)?;

        let report = ReportData {
            plot_id,
            area_m2: model.area_m2,
            summary: self.feature_summary(plot_id)?,
        };
        let path = self.artifact_path(ArtifactKind::ReportPdf, plot_id)?;
        write_report_pdf(&report, &map_path, &path)?;
        info!(plot_id, path = %path.display(), "report PDF exported");
        Ok(path)
    }

    /// Landscape back-computation table PDF.
    pub fn export_traverse_pdf(&self, plot_id: i64) -> Result<PathBuf> {
        let model = self.model(plot_id, PlanMetadata::default(), MapWindow::PLAN)?;
        let path = self.artifact_path(ArtifactKind::TraversePdf, plot_id)?;
        write_traverse_pdf(&model.traverse, model.area_m2, plot_id, &path)?;
        info!(plot_id, path = %path.display(), "traverse table PDF exported");
        Ok(path)
    }

    /// Layered CAD vector file.
    pub fn export_dxf(&self, plot_id: i64) -> Result<PathBuf> {
        let model = self.model(plot_id, PlanMetadata::default(), MapWindow::PLAN)?;
        let path = self.artifact_path(ArtifactKind::SurveyDxf, plot_id)?;
        export_survey_dxf(&model, &path)?;
        info!(plot_id, path = %path.display(), "survey DXF exported");
        Ok(path)
    }

    /// Orthophoto PNG preview; imagery failure degrades to vector-only.
    pub fn render_orthophoto_preview(
        &self,
        plot_id: i64,
        metadata: PlanMetadata,
        provider: &dyn ImageryProvider,
    ) -> Result<PathBuf> {
        let model = self.model(plot_id, metadata, MapWindow::ORTHOPHOTO)?;
        let path = self.artifact_path(ArtifactKind::OrthophotoPreview, plot_id)?;
        render_orthophoto_png(&model, provider, &path)?;
        info!(plot_id, path = %path.display(), "orthophoto preview exported");
        Ok(path)
    }

    /// Orthophoto PDF: render the PNG, then wrap it in a single-page PDF.
    pub fn export_orthophoto_pdf(
        &self,
        plot_id: i64,
        metadata: PlanMetadata,
        provider: &dyn ImageryProvider,
    ) -> Result<PathBuf> {
        let model = self.model(plot_id, metadata, MapWindow::ORTHOPHOTO)?;
        let png_path = self.artifact_path(ArtifactKind::OrthophotoImage, plot_id)?;
        render_orthophoto_png(&model, provider, &png_path)?;

        let path = self.artifact_path(ArtifactKind::OrthophotoPdf, plot_id)?;
        write_image_pdf(&png_path, &path)?;
        info!(plot_id, path = %path.display(), "orthophoto PDF exported");
        Ok(path)
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }
}
