//! Per-export render model.
//!
//! A [`RenderModel`] is assembled once per export request from the plot, its
//! detected features, and the layout metadata, then handed to whichever
//! exporter was asked for. It is exclusively owned by that request and
//! discarded afterwards; all formats therefore agree on bearings, area, and
//! feature counts.

use geo::{BoundingRect, Geometry, MapCoords, Polygon, Rect};
use tracing::debug;

use plankit_core::{
    DetectedFeature, FeatureKind, MapWindow, PlanMetadata, Plot, Result, A4_PORTRAIT,
};
use plankit_survey::{
    compute_traverse, normalize_plot, parse_scale_ratio, plan_scale, project_geometry, ScalePlan,
    Traverse,
};

/// Everything the renderers and exporters need for one plot.
#[derive(Debug, Clone)]
pub struct RenderModel {
    pub plot_id: i64,
    /// Boundary polygon, planar meters.
    pub boundary: Polygon<f64>,
    /// Buffer polygon, planar meters. Influences the view extent only;
    /// never drawn.
    pub buffer: Option<Polygon<f64>>,
    /// Feature geometries in draw order buckets, planar meters.
    pub rivers: Vec<Geometry<f64>>,
    pub roads: Vec<Geometry<f64>>,
    pub buildings: Vec<Geometry<f64>>,
    pub area_m2: f64,
    pub traverse: Traverse,
    pub scale_plan: ScalePlan,
    pub metadata: PlanMetadata,
}

impl RenderModel {
    /// Build the model for one export request.
    ///
    /// Validates and projects the boundary, projects and groups the feature
    /// geometries, back-computes the traverse, and plans the true-scale view
    /// for the given map window on an A4 portrait page.
    pub fn build(
        plot: &Plot,
        features: &[DetectedFeature],
        buffer: Option<&Polygon<f64>>,
        metadata: PlanMetadata,
        window: MapWindow,
    ) -> Result<Self> {
        let normalized = normalize_plot(&plot.boundary)?;

        let mut rivers = Vec::new();
        let mut roads = Vec::new();
        let mut buildings = Vec::new();
        for feature in features {
            let projected = project_geometry(&feature.geometry);
            match feature.kind {
                FeatureKind::River => rivers.push(projected),
                FeatureKind::Road => roads.push(projected),
                FeatureKind::Building => buildings.push(projected),
            }
        }
        debug!(
            plot_id = plot.id,
            rivers = rivers.len(),
            roads = roads.len(),
            buildings = buildings.len(),
            "grouped detected features"
        );

        let buffer = buffer.map(|b| b.map_coords(plankit_survey::project_coord));
        let extent_bounds = match buffer.as_ref().and_then(|b| b.bounding_rect()) {
            Some(buffer_bounds) => merge_bounds(normalized.bounds, buffer_bounds),
            None => normalized.bounds,
        };

        let ratio = parse_scale_ratio(&metadata.scale_text);
        let (window_w_in, window_h_in) = window.size_in(A4_PORTRAIT);
        let scale_plan = plan_scale(
            extent_bounds,
            normalized.centroid,
            ratio,
            window_w_in,
            window_h_in,
        );

        let traverse = compute_traverse(&normalized.polygon, &metadata.station_names);

        Ok(Self {
            plot_id: plot.id,
            boundary: normalized.polygon,
            buffer,
            rivers,
            roads,
            buildings,
            area_m2: normalized.area_m2,
            traverse,
            scale_plan,
            metadata,
        })
    }

    /// Counts used by the legend: (rivers, roads, buildings).
    pub fn feature_counts(&self) -> (usize, usize, usize) {
        (self.rivers.len(), self.roads.len(), self.buildings.len())
    }
}

fn merge_bounds(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        geo::coord! {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        geo::coord! {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        },
    )
}
