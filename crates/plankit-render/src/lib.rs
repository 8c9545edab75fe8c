//! # PlanKit Render
//!
//! True-scale page rendering for survey plans: page chrome (title block,
//! footer, key box, sheet frame), the map window (features, boundary,
//! masked coordinate grid, traverse annotations, north arrow, scale bar),
//! and PNG encoding at a fixed A4/200 DPI page.
//!
//! The drawing context is an explicit [`PlanCanvas`] value owned by one
//! export call; nothing here is process-global. Basemap imagery for the
//! orthophoto variant comes from an [`ImageryProvider`] collaborator and is
//! strictly optional at run time.

pub mod canvas;
pub mod error;
pub mod fonts;
pub mod imagery;
pub mod layout;
pub mod map;
pub mod model;
pub mod raster;

pub use canvas::{MapTransform, PlanCanvas, TextAlign};
pub use error::{RenderError, Result};
pub use imagery::{composite_basemap, ImageryProvider};
pub use layout::LayoutVariant;
pub use model::RenderModel;
pub use raster::{
    render_orthophoto_image, render_orthophoto_png, render_plan_image, render_plan_png,
};
