//! Basemap imagery for the orthophoto variant.
//!
//! Tile fetching lives outside the core: a collaborator implements
//! [`ImageryProvider`] and hands back a ready image for the view extent.
//! Fetch failure is the one degradation path with built-in grace: the
//! renderer logs it and carries on with vector content only.

use image::RgbaImage;
use plankit_survey::ViewExtent;
use tracing::warn;

use crate::canvas::{MapTransform, PlanCanvas};

/// Supplies georeferenced basemap imagery covering a view extent.
///
/// Implementations typically wrap a tile service client; the renderer only
/// requires that the returned image depicts exactly the requested extent at
/// the requested pixel size.
pub trait ImageryProvider {
    fn fetch(
        &self,
        extent: &ViewExtent,
        width_px: u32,
        height_px: u32,
    ) -> anyhow::Result<RgbaImage>;
}

/// Composite basemap imagery beneath the vector layers.
///
/// Returns whether imagery was actually drawn. Errors from the provider are
/// logged and swallowed; the page renders without the layer.
pub fn composite_basemap(
    canvas: &mut PlanCanvas,
    tf: &MapTransform,
    provider: &dyn ImageryProvider,
) -> bool {
    let width_px = tf.window_width_px().round() as u32;
    let height_px = tf.window_height_px().round() as u32;

    match provider.fetch(&tf.extent, width_px, height_px) {
        Ok(mut img) => {
            if img.width() != width_px || img.height() != height_px {
                img = image::imageops::resize(
                    &img,
                    width_px.max(1),
                    height_px.max(1),
                    image::imageops::FilterType::Triangle,
                );
            }
            let (origin_x, origin_y) = tf.window_frac_to_px(0.0, 1.0);
            canvas.composite_image(&img, origin_x as i64, origin_y as i64);
            true
        }
        Err(err) => {
            warn!(error = %err, "basemap imagery fetch failed, rendering without imagery");
            false
        }
    }
}
