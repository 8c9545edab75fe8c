use geo::polygon;
use image::RgbaImage;
use plankit_core::{MapWindow, PlanMetadata, Plot, A4_PORTRAIT, RENDER_DPI};
use plankit_render::{
    render_orthophoto_image, render_plan_image, render_plan_png, ImageryProvider, RenderModel,
};
use plankit_survey::ViewExtent;

/// Roughly 60 m square plot near the equator, geographic coordinates.
fn test_plot() -> Plot {
    let d = 0.0005_f64;
    Plot::new(
        42,
        polygon![
            (x: 7.45, y: 6.50),
            (x: 7.45, y: 6.50 + d),
            (x: 7.45 + d, y: 6.50 + d),
            (x: 7.45 + d, y: 6.50),
            (x: 7.45, y: 6.50),
        ],
    )
}

fn test_model() -> RenderModel {
    RenderModel::build(
        &test_plot(),
        &[],
        None,
        PlanMetadata::default(),
        MapWindow::PLAN,
    )
    .unwrap()
}

#[test]
fn test_plan_page_has_a4_portrait_dimensions() {
    let img = render_plan_image(&test_model()).unwrap();
    let (w, h) = A4_PORTRAIT.pixels(RENDER_DPI);
    assert_eq!(img.width(), w);
    assert_eq!(img.height(), h);
}

#[test]
fn test_plan_page_is_not_blank() {
    let img = render_plan_image(&test_model()).unwrap();
    // The sheet frame and boundary must put non-white pixels on the page.
    let non_white = img
        .pixels()
        .filter(|p| p[0] != 255 || p[1] != 255 || p[2] != 255)
        .count();
    assert!(non_white > 1000, "only {non_white} non-white pixels");
}

#[test]
fn test_plan_png_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plot_42_preview.png");
    render_plan_png(&test_model(), &path).unwrap();
    let metadata = std::fs::metadata(&path).unwrap();
    assert!(metadata.len() > 2000, "png suspiciously small");
}

struct SolidImagery;

impl ImageryProvider for SolidImagery {
    fn fetch(
        &self,
        _extent: &ViewExtent,
        width_px: u32,
        height_px: u32,
    ) -> anyhow::Result<RgbaImage> {
        Ok(RgbaImage::from_pixel(
            width_px,
            height_px,
            image::Rgba([90, 120, 60, 255]),
        ))
    }
}

struct FailingImagery;

impl ImageryProvider for FailingImagery {
    fn fetch(&self, _: &ViewExtent, _: u32, _: u32) -> anyhow::Result<RgbaImage> {
        anyhow::bail!("tile service unreachable")
    }
}

#[test]
fn test_orthophoto_composites_provider_image() {
    let img = render_orthophoto_image(&test_model(), &SolidImagery).unwrap();
    // The imagery color must survive somewhere in the map window.
    let hit = img
        .pixels()
        .any(|p| p[0] == 90 && p[1] == 120 && p[2] == 60);
    assert!(hit, "imagery layer not found in output");
}

#[test]
fn test_orthophoto_survives_imagery_failure() {
    // Fetch failure is non-fatal: the page still renders, vector-only.
    let img = render_orthophoto_image(&test_model(), &FailingImagery).unwrap();
    let (w, h) = A4_PORTRAIT.pixels(RENDER_DPI);
    assert_eq!((img.width(), img.height()), (w, h));
}

#[test]
fn test_model_groups_features_by_kind() {
    use geo::{line_string, Geometry};
    use plankit_core::{DetectedFeature, FeatureKind, FeatureLocation};

    let road = DetectedFeature {
        id: 1,
        plot_id: 42,
        kind: FeatureKind::Road,
        location: FeatureLocation::Buffer,
        geometry: Geometry::LineString(
            line_string![(x: 7.4495, y: 6.5), (x: 7.451, y: 6.5009)],
        ),
    };
    let model = RenderModel::build(
        &test_plot(),
        &[road],
        None,
        PlanMetadata::default(),
        MapWindow::PLAN,
    )
    .unwrap();
    assert_eq!(model.feature_counts(), (0, 1, 0));
}

#[test]
fn test_traverse_agrees_with_boundary() {
    let model = test_model();
    assert_eq!(
        model.traverse.rows.len(),
        model.boundary.exterior().0.len() - 1
    );
    assert!(model.traverse.closure.is_closed(1e-6));
}
