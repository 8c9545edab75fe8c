//! End-to-end export flows against the in-memory store.

use geo::{line_string, polygon, Geometry, Polygon};
use plankit::{
    ArtifactKind, DetectedFeature, FeatureKind, FeatureLocation, ImageryProvider,
    MemoryPlotStore, PlanMetadata, PlanService, Plot,
};
use plankit_survey::ViewExtent;

const PLOT_ID: i64 = 11;

fn seeded_service(dir: &std::path::Path) -> PlanService<MemoryPlotStore> {
    let d = 0.0005_f64;
    let (x0, y0) = (7.48, 9.05);
    let boundary: Polygon<f64> = polygon![
        (x: x0, y: y0),
        (x: x0, y: y0 + d),
        (x: x0 + d, y: y0 + d),
        (x: x0 + d, y: y0),
        (x: x0, y: y0),
    ];

    let mut store = MemoryPlotStore::new();
    store.insert_plot(Plot::new(PLOT_ID, boundary));
    store.insert_feature(DetectedFeature {
        id: 1,
        plot_id: PLOT_ID,
        kind: FeatureKind::Building,
        location: FeatureLocation::Inside,
        geometry: Geometry::Polygon(polygon![
            (x: x0 + d * 0.2, y: y0 + d * 0.2),
            (x: x0 + d * 0.4, y: y0 + d * 0.2),
            (x: x0 + d * 0.4, y: y0 + d * 0.4),
            (x: x0 + d * 0.2, y: y0 + d * 0.2),
        ]),
    });
    store.insert_feature(DetectedFeature {
        id: 2,
        plot_id: PLOT_ID,
        kind: FeatureKind::River,
        location: FeatureLocation::Buffer,
        geometry: Geometry::LineString(
            line_string![(x: x0 - d, y: y0), (x: x0 + 2.0 * d, y: y0 + d)],
        ),
    });

    PlanService::new(store, dir)
}

#[test]
fn test_all_artifacts_for_one_plot() {
    let dir = tempfile::tempdir().unwrap();
    let service = seeded_service(dir.path());

    let metadata = PlanMetadata {
        title: "SURVEY PLAN".into(),
        station: "GPS 114".into(),
        location: "OKE-ARO".into(),
        surveyor_name: "A. SURVEYOR".into(),
        surveyor_rank: "PRINCIPAL".into(),
        ..PlanMetadata::default()
    };

    let preview = service
        .render_plan_preview(PLOT_ID, metadata.clone())
        .unwrap();
    let report = service.export_report_pdf(PLOT_ID, metadata).unwrap();
    let table = service.export_traverse_pdf(PLOT_ID).unwrap();
    let dxf = service.export_dxf(PLOT_ID).unwrap();

    for path in [&preview, &report, &table, &dxf] {
        assert!(path.exists(), "{} missing", path.display());
        assert!(std::fs::metadata(path).unwrap().len() > 0);
    }

    // Deterministic layout under the output root.
    assert!(preview.ends_with("previews/plot_11_preview.png"));
    assert!(report.ends_with("plot_11_report.pdf"));
    assert!(table.ends_with("plot_11_back_computation.pdf"));
    assert!(dxf.ends_with("dwg/plot_11_survey_plan.dxf"));
}

#[test]
fn test_unknown_plot_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let service = seeded_service(dir.path());

    let err = service.export_traverse_pdf(999).unwrap_err();
    assert!(err.is_not_found());

    let expected = dir
        .path()
        .join(ArtifactKind::TraversePdf.rel_path(999));
    assert!(!expected.exists());
}

#[test]
fn test_feature_summary_counts() {
    let dir = tempfile::tempdir().unwrap();
    let service = seeded_service(dir.path());

    let summary = service.feature_summary(PLOT_ID).unwrap();
    assert_eq!(summary.inside.get("building"), Some(&1));
    assert_eq!(summary.buffer.get("river"), Some(&1));
    assert_eq!(summary.total(), 2);
}

struct OfflineImagery;

impl ImageryProvider for OfflineImagery {
    fn fetch(
        &self,
        _extent: &ViewExtent,
        _width_px: u32,
        _height_px: u32,
    ) -> anyhow::Result<image::RgbaImage> {
        anyhow::bail!("no network")
    }
}

#[test]
fn test_orthophoto_pipeline_without_imagery() {
    // Imagery failure must not fail the export; the PDF still wraps a
    // vector-only page.
    let dir = tempfile::tempdir().unwrap();
    let service = seeded_service(dir.path());

    let pdf = service
        .export_orthophoto_pdf(PLOT_ID, PlanMetadata::default(), &OfflineImagery)
        .unwrap();
    assert!(pdf.exists());
    assert!(std::fs::metadata(&pdf).unwrap().len() > 1000);
}
