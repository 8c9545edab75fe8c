use std::collections::HashSet;

use dxf::entities::EntityType;
use dxf::Drawing;
use geo::{line_string, polygon, Geometry};
use plankit_core::{
    DetectedFeature, FeatureKind, FeatureLocation, MapWindow, PlanMetadata, Plot,
};
use plankit_export::export_survey_dxf;
use plankit_render::RenderModel;

fn square_plot() -> Plot {
    let d = 0.0005_f64;
    Plot::new(
        9,
        polygon![
            (x: 3.40, y: 6.45),
            (x: 3.40, y: 6.45 + d),
            (x: 3.40 + d, y: 6.45 + d),
            (x: 3.40 + d, y: 6.45),
            (x: 3.40, y: 6.45),
        ],
    )
}

fn build_model(features: Vec<DetectedFeature>) -> RenderModel {
    RenderModel::build(
        &square_plot(),
        &features,
        None,
        PlanMetadata::default(),
        MapWindow::PLAN,
    )
    .unwrap()
}

fn layers_with_entities(drawing: &Drawing) -> HashSet<String> {
    drawing
        .entities()
        .map(|e| e.common.layer.clone())
        .collect()
}

#[test]
fn test_zero_feature_plot_produces_valid_dxf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plot_9_survey_plan.dxf");
    export_survey_dxf(&build_model(vec![]), &path).unwrap();

    let mut file = std::fs::File::open(&path).unwrap();
    let drawing = Drawing::load(&mut file).unwrap();

    let declared: HashSet<String> = drawing.layers().map(|l| l.name.clone()).collect();
    for required in ["PLOT", "BUILDINGS", "ROADS", "RIVERS", "GRID", "COORDS", "TEXT"] {
        assert!(declared.contains(required), "missing layer {required}");
    }

    let used = layers_with_entities(&drawing);
    assert!(used.contains("PLOT"));
    assert!(used.contains("GRID"));
    assert!(used.contains("COORDS"));
    assert!(used.contains("TEXT"));
    assert!(!used.contains("BUILDINGS"));
    assert!(!used.contains("ROADS"));
    assert!(!used.contains("RIVERS"));
}

#[test]
fn test_boundary_becomes_line_entities_on_plot_layer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("boundary.dxf");
    export_survey_dxf(&build_model(vec![]), &path).unwrap();

    let mut file = std::fs::File::open(&path).unwrap();
    let drawing = Drawing::load(&mut file).unwrap();

    let boundary_lines = drawing
        .entities()
        .filter(|e| e.common.layer == "PLOT")
        .filter(|e| matches!(e.specific, EntityType::Line(_)))
        .count();
    // A closed square ring is four segments.
    assert_eq!(boundary_lines, 4);
}

#[test]
fn test_edge_annotations_are_rotated_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("text.dxf");
    export_survey_dxf(&build_model(vec![]), &path).unwrap();

    let mut file = std::fs::File::open(&path).unwrap();
    let drawing = Drawing::load(&mut file).unwrap();

    let texts: Vec<String> = drawing
        .entities()
        .filter(|e| e.common.layer == "TEXT")
        .filter_map(|e| match &e.specific {
            EntityType::Text(t) => Some(t.value.clone()),
            _ => None,
        })
        .collect();
    // Four edge annotations plus the centroid label.
    assert_eq!(texts.len(), 5);
    assert!(texts.iter().any(|t| t == "PLOT 9"));
    assert!(texts.iter().filter(|t| t.ends_with('m')).count() == 4);
}

#[test]
fn test_features_land_on_their_layers() {
    let road = DetectedFeature {
        id: 1,
        plot_id: 9,
        kind: FeatureKind::Road,
        location: FeatureLocation::Buffer,
        geometry: Geometry::LineString(
            line_string![(x: 3.3995, y: 6.4500), (x: 3.4010, y: 6.4509)],
        ),
    };
    let building = DetectedFeature {
        id: 2,
        plot_id: 9,
        kind: FeatureKind::Building,
        location: FeatureLocation::Inside,
        geometry: Geometry::Polygon(polygon![
            (x: 3.4001, y: 6.4501),
            (x: 3.4002, y: 6.4501),
            (x: 3.4002, y: 6.4502),
            (x: 3.4001, y: 6.4501),
        ]),
    };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("features.dxf");
    export_survey_dxf(&build_model(vec![road, building]), &path).unwrap();

    let mut file = std::fs::File::open(&path).unwrap();
    let drawing = Drawing::load(&mut file).unwrap();

    let used = layers_with_entities(&drawing);
    assert!(used.contains("ROADS"));
    assert!(used.contains("BUILDINGS"));
    assert!(!used.contains("RIVERS"));
}
