//! Full-page raster rendering.
//!
//! Composes the page chrome and map window into an A4 portrait pixmap at the
//! fixed render DPI and encodes it as PNG. Two variants share the pipeline:
//! the survey plan (vector-only, masked grid, traverse annotations) and the
//! orthophoto preview (basemap imagery beneath an unmasked grid).

use std::path::Path;

use tracing::debug;

use plankit_core::{MapWindow, A4_PORTRAIT, RENDER_DPI};
use plankit_survey::scale_bar_length_m;

use crate::canvas::{MapTransform, PlanCanvas};
use crate::error::Result;
use crate::imagery::{composite_basemap, ImageryProvider};
use crate::layout::{self, LayoutVariant};
use crate::map;
use crate::model::RenderModel;

/// Render the survey-plan page to an RGBA image.
pub fn render_plan_image(model: &RenderModel) -> Result<image::RgbaImage> {
    let (width, height) = A4_PORTRAIT.pixels(RENDER_DPI);
    let mut canvas = PlanCanvas::new(width, height, RENDER_DPI)?;
    let tf = MapTransform::new(model.scale_plan.extent, MapWindow::PLAN, width, height);

    layout::draw_sheet_frame(&mut canvas);
    layout::draw_title_block(
        &mut canvas,
        &model.metadata,
        model.plot_id,
        model.area_m2,
        LayoutVariant::Plan,
    );
    layout::draw_footer(&mut canvas, &model.metadata, LayoutVariant::Plan);
    layout::draw_key_box(&mut canvas);

    map::draw_grid(
        &mut canvas,
        &tf,
        Some(&model.boundary),
        model.scale_plan.minor_step,
        model.scale_plan.major_step,
    );
    map::draw_coordinate_frame(&mut canvas, &tf, model.scale_plan.major_step);

    map::draw_features(&mut canvas, &tf, model);
    map::draw_boundary(&mut canvas, &tf, &model.boundary);
    map::annotate_stations(&mut canvas, &tf, model);

    map::draw_north_arrow(&mut canvas, &tf, 0.88, 0.80, 0.90);
    map::draw_scale_bar(
        &mut canvas,
        &tf,
        scale_bar_length_m(model.scale_plan.ratio),
        0.225,
        -0.15,
        0.55,
    );

    debug!(plot_id = model.plot_id, "survey plan page composed");
    canvas.into_image()
}

/// Render the orthophoto page: basemap imagery (when the provider delivers),
/// unmasked grid, coordinate frame, and the boundary on top.
pub fn render_orthophoto_image(
    model: &RenderModel,
    provider: &dyn ImageryProvider,
) -> Result<image::RgbaImage> {
    let (width, height) = A4_PORTRAIT.pixels(RENDER_DPI);
    let mut canvas = PlanCanvas::new(width, height, RENDER_DPI)?;
    let tf = MapTransform::new(model.scale_plan.extent, MapWindow::ORTHOPHOTO, width, height);

    let with_imagery = composite_basemap(&mut canvas, &tf, provider);
    debug!(plot_id = model.plot_id, with_imagery, "basemap stage done");

    map::draw_grid(
        &mut canvas,
        &tf,
        None,
        model.scale_plan.minor_step,
        model.scale_plan.major_step,
    );
    map::draw_coordinate_frame(&mut canvas, &tf, model.scale_plan.major_step);
    map::draw_boundary(&mut canvas, &tf, &model.boundary);

    layout::draw_sheet_frame(&mut canvas);
    layout::draw_title_block(
        &mut canvas,
        &model.metadata,
        model.plot_id,
        model.area_m2,
        LayoutVariant::Orthophoto,
    );
    layout::draw_footer(&mut canvas, &model.metadata, LayoutVariant::Orthophoto);

    map::draw_north_arrow(&mut canvas, &tf, 0.93, 0.80, 0.90);
    map::draw_scale_bar(
        &mut canvas,
        &tf,
        scale_bar_length_m(model.scale_plan.ratio),
        0.32,
        -0.12,
        0.25,
    );

    canvas.into_image()
}

/// Render the survey plan and write it as PNG.
pub fn render_plan_png(model: &RenderModel, path: &Path) -> Result<()> {
    let img = render_plan_image(model)?;
    img.save(path)?;
    debug!(path = %path.display(), "survey plan PNG written");
    Ok(())
}

/// Render the orthophoto page and write it as PNG.
pub fn render_orthophoto_png(
    model: &RenderModel,
    provider: &dyn ImageryProvider,
    path: &Path,
) -> Result<()> {
    let img = render_orthophoto_image(model, provider)?;
    img.save(path)?;
    debug!(path = %path.display(), "orthophoto PNG written");
    Ok(())
}
