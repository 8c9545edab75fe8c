//! Page-unit constants and conversions.
//!
//! Physical page geometry is fixed: A4 sheets, a 200 DPI raster target, and
//! the fractional window the map occupies within the page. Ground units are
//! always meters.

use serde::{Deserialize, Serialize};

/// Meters per inch.
pub const INCH_TO_M: f64 = 0.0254;

/// Points per inch (PDF user space).
pub const PT_PER_INCH: f64 = 72.0;

/// Raster render resolution, dots per inch.
pub const RENDER_DPI: f64 = 200.0;

/// Physical page size in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_in: f64,
    pub height_in: f64,
}

/// A4 portrait, inches.
pub const A4_PORTRAIT: PageSize = PageSize {
    width_in: 8.27,
    height_in: 11.69,
};

/// A4 landscape, inches.
pub const A4_LANDSCAPE: PageSize = PageSize {
    width_in: 11.69,
    height_in: 8.27,
};

impl PageSize {
    /// Pixel dimensions at the given DPI, rounded.
    pub fn pixels(&self, dpi: f64) -> (u32, u32) {
        (
            (self.width_in * dpi).round() as u32,
            (self.height_in * dpi).round() as u32,
        )
    }

    /// Page size in PDF points.
    pub fn points(&self) -> (f64, f64) {
        (self.width_in * PT_PER_INCH, self.height_in * PT_PER_INCH)
    }

    /// Page size in millimeters.
    pub fn millimeters(&self) -> (f64, f64) {
        (self.width_in * 25.4, self.height_in * 25.4)
    }
}

/// The fractional region of the page the map occupies.
///
/// Fractions run left-to-right and bottom-to-top, matching the page layout
/// coordinate system used by the layout composer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapWindow {
    pub left: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl MapWindow {
    /// Map window for the survey-plan layout (leaves room for the key box).
    pub const PLAN: MapWindow = MapWindow {
        left: 0.10,
        bottom: 0.30,
        width: 0.80,
        height: 0.45,
    };

    /// Map window for the orthophoto layout (taller; no key box).
    pub const ORTHOPHOTO: MapWindow = MapWindow {
        left: 0.10,
        bottom: 0.24,
        width: 0.80,
        height: 0.52,
    };

    /// Physical size of the window on the given page, in inches.
    pub fn size_in(&self, page: PageSize) -> (f64, f64) {
        (page.width_in * self.width, page.height_in * self.height)
    }
}
