//! Data model shared by the survey, render, and export layers.
//!
//! A [`Plot`] and its [`DetectedFeature`] rows are supplied by an external
//! spatial store; the toolkit never performs spatial joins itself. Everything
//! here is read-only input to the pipeline.

use std::collections::BTreeMap;
use std::fmt;

use geo::{Geometry, Polygon};
use serde::{Deserialize, Serialize};

/// A land plot with its boundary ring in geographic coordinates (lon/lat).
///
/// The exterior ring must be closed (first and last vertex coincide) and
/// contain at least 3 distinct vertices. Interior rings are ignored.
#[derive(Debug, Clone)]
pub struct Plot {
    /// Plot identifier, as assigned by the store.
    pub id: i64,
    /// Boundary polygon, geographic CRS (EPSG:4326), exterior ring only.
    pub boundary: Polygon<f64>,
}

impl Plot {
    pub fn new(id: i64, boundary: Polygon<f64>) -> Self {
        Self { id, boundary }
    }
}

/// Classification of a detected feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Building,
    Road,
    River,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Building => write!(f, "building"),
            Self::Road => write!(f, "road"),
            Self::River => write!(f, "river"),
        }
    }
}

/// Where a feature sits relative to the plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureLocation {
    /// Intersects the plot polygon itself.
    Inside,
    /// Intersects only the fixed-distance buffer around the plot.
    Buffer,
}

impl fmt::Display for FeatureLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inside => write!(f, "inside"),
            Self::Buffer => write!(f, "buffer"),
        }
    }
}

/// A nearby feature classified by the external spatial store.
#[derive(Debug, Clone)]
pub struct DetectedFeature {
    pub id: i64,
    pub plot_id: i64,
    pub kind: FeatureKind,
    pub location: FeatureLocation,
    /// Polygon or line geometry, geographic CRS.
    pub geometry: Geometry<f64>,
}

/// Per-kind feature counts, split by location.
///
/// Feeds page 1 of the report document and is serializable for API callers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub plot_id: i64,
    pub inside: BTreeMap<String, usize>,
    pub buffer: BTreeMap<String, usize>,
}

impl FeatureSummary {
    /// Tally features into inside/buffer buckets keyed by kind name.
    pub fn from_features(plot_id: i64, features: &[DetectedFeature]) -> Self {
        let mut summary = Self {
            plot_id,
            ..Default::default()
        };
        for feature in features {
            let bucket = match feature.location {
                FeatureLocation::Inside => &mut summary.inside,
                FeatureLocation::Buffer => &mut summary.buffer,
            };
            *bucket.entry(feature.kind.to_string()).or_insert(0) += 1;
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.inside.values().sum::<usize>() + self.buffer.values().sum::<usize>()
    }
}

/// Text fields for the page layout: title block, footer, and station naming.
///
/// Every field has a rendering default so a plan can be produced from a bare
/// plot id; callers override what they know.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanMetadata {
    /// Plan title, centered at the top of the title block.
    pub title: String,
    /// Reference station line ("STATION: ...").
    pub station: String,
    /// Location line ("LOCATED AT: ...").
    pub location: String,
    /// First administrative-area line.
    pub district: String,
    /// Second administrative-area line.
    pub state: String,
    /// Human-entered map scale ratio, e.g. "1 : 1000".
    pub scale_text: String,
    /// Surveyor name for the footer.
    pub surveyor_name: String,
    /// Surveyor rank for the footer.
    pub surveyor_rank: String,
    /// CRS/origin attribution, bottom-left footer line.
    pub crs_note: String,
    /// Data source attribution, bottom-right footer line.
    pub source_note: String,
    /// Explicit station names; when empty, stations cycle A..Z.
    pub station_names: Vec<String>,
}

impl Default for PlanMetadata {
    fn default() -> Self {
        Self {
            title: "SURVEY PLAN".to_string(),
            station: String::new(),
            location: String::new(),
            district: String::new(),
            state: String::new(),
            scale_text: "1 : 1000".to_string(),
            surveyor_name: String::new(),
            surveyor_rank: String::new(),
            crs_note: "ORIGIN: WGS84 (WEB MERCATOR PROJECTION)".to_string(),
            source_note: "SOURCE: PLANKIT".to_string(),
            station_names: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, polygon};

    fn feature(kind: FeatureKind, location: FeatureLocation) -> DetectedFeature {
        DetectedFeature {
            id: 0,
            plot_id: 7,
            kind,
            location,
            geometry: Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)]),
        }
    }

    #[test]
    fn summary_counts_by_kind_and_location() {
        let features = vec![
            feature(FeatureKind::Building, FeatureLocation::Inside),
            feature(FeatureKind::Building, FeatureLocation::Inside),
            feature(FeatureKind::Road, FeatureLocation::Buffer),
        ];
        let summary = FeatureSummary::from_features(7, &features);
        assert_eq!(summary.inside.get("building"), Some(&2));
        assert_eq!(summary.buffer.get("road"), Some(&1));
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn plot_holds_boundary() {
        let plot = Plot::new(
            1,
            polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0)],
        );
        assert_eq!(plot.id, 1);
        assert_eq!(plot.boundary.exterior().0.len(), 4);
    }
}
