use geo::polygon;
use plankit_core::{FeatureSummary, MapWindow, PlanMetadata, Plot};
use plankit_export::{write_report_pdf, write_traverse_pdf, ExportError, ReportData};
use plankit_render::{render_plan_png, RenderModel};

fn test_model(vertices: usize) -> RenderModel {
    // Regular polygon with the requested number of vertices, ~50 m across.
    let d = 0.0005_f64;
    let (cx, cy) = (7.0_f64, 9.0_f64);
    let mut coords: Vec<(f64, f64)> = (0..vertices)
        .map(|i| {
            let theta = i as f64 / vertices as f64 * std::f64::consts::TAU;
            (cx + d * theta.cos(), cy + d * theta.sin())
        })
        .collect();
    coords.push(coords[0]);
    let plot = Plot::new(3, geo::Polygon::new(geo::LineString::from(coords), vec![]));
    RenderModel::build(&plot, &[], None, PlanMetadata::default(), MapWindow::PLAN).unwrap()
}

#[test]
fn test_report_pdf_requires_intact_map_png() {
    let dir = tempfile::tempdir().unwrap();
    let missing_map = dir.path().join("missing.png");
    let out = dir.path().join("report.pdf");

    let report = ReportData {
        plot_id: 3,
        area_m2: 2500.0,
        summary: FeatureSummary::default(),
    };
    let err = write_report_pdf(&report, &missing_map, &out).unwrap_err();
    assert!(matches!(err, ExportError::RenderIntegrity { .. }));
    assert!(!out.exists(), "no output may be written on integrity failure");
}

#[test]
fn test_report_pdf_embeds_rendered_map() {
    let dir = tempfile::tempdir().unwrap();
    let map_png = dir.path().join("plot_3_map.png");
    let out = dir.path().join("plot_3_report.pdf");

    let model = test_model(4);
    render_plan_png(&model, &map_png).unwrap();

    let report = ReportData {
        plot_id: 3,
        area_m2: model.area_m2,
        summary: FeatureSummary::default(),
    };
    write_report_pdf(&report, &map_png, &out).unwrap();

    let size = std::fs::metadata(&out).unwrap().len();
    // Page 2 embeds the PNG, so the PDF must dwarf a text-only document.
    assert!(size > 10_000, "report PDF is only {size} bytes");
}

#[test]
fn test_traverse_pdf_single_page() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("plot_3_back_computation.pdf");

    let model = test_model(4);
    write_traverse_pdf(&model.traverse, model.area_m2, 3, &out).unwrap();
    assert!(std::fs::metadata(&out).unwrap().len() > 500);
}

#[test]
fn test_traverse_pdf_paginates_long_rings() {
    let dir = tempfile::tempdir().unwrap();
    let short = dir.path().join("short.pdf");
    let long = dir.path().join("long.pdf");

    let small = test_model(4);
    write_traverse_pdf(&small.traverse, small.area_m2, 3, &short).unwrap();

    // 40 edges exceed one landscape page and must spill onto a second.
    let big = test_model(40);
    assert_eq!(big.traverse.rows.len(), 40);
    write_traverse_pdf(&big.traverse, big.area_m2, 3, &long).unwrap();

    let short_size = std::fs::metadata(&short).unwrap().len();
    let long_size = std::fs::metadata(&long).unwrap().len();
    assert!(long_size > short_size, "pagination produced no extra content");
}

#[test]
fn test_exports_agree_on_traverse() {
    // The same model feeds every exporter, so the numbers cannot diverge.
    let model = test_model(4);
    let sum_e = model.traverse.closure.sum_delta_e;
    let sum_n = model.traverse.closure.sum_delta_n;
    assert!(sum_e.abs() < 1e-6);
    assert!(sum_n.abs() < 1e-6);
    assert_eq!(model.traverse.rows.len(), 4);
}
