//! Scale planning: ratio parsing, true-scale extents, and grid spacing.
//!
//! A survey plan is drawn at a stated ratio (e.g. 1 : 1000): the ground
//! distance represented by the physical map window follows directly from the
//! window size and the ratio. The planner computes that extent, widens it
//! when the subject would not fit, and picks a round grid spacing for it.

use geo::{Point, Rect};
use serde::{Deserialize, Serialize};
use tracing::warn;

use plankit_core::INCH_TO_M;

/// Ratio substituted when the scale text cannot be parsed.
///
/// Deliberate legacy behavior: a plan is always produced, even from junk
/// input. The substitution is logged so operators can spot it.
pub const FALLBACK_SCALE_RATIO: u32 = 1000;

/// Ground extent of the map view, meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewExtent {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl ViewExtent {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Largest span of the extent, used for grid-step selection.
    pub fn max_span(&self) -> f64 {
        self.width().max(self.height())
    }
}

/// The view extent plus the grid spacing chosen for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalePlan {
    /// Denominator of the map ratio (1 : ratio).
    pub ratio: u32,
    pub extent: ViewExtent,
    /// Major grid-line spacing, meters.
    pub major_step: f64,
    /// Minor grid-line spacing, meters (major / 5).
    pub minor_step: f64,
}

/// Parse a human-entered scale ratio: "R", "1:R", or "1 : R".
///
/// Whitespace-insensitive. Any parse failure falls back to
/// [`FALLBACK_SCALE_RATIO`]; parsed values are clamped to at least 1.
pub fn parse_scale_ratio(scale_text: &str) -> u32 {
    let compact: String = scale_text.split_whitespace().collect();
    let denominator = if compact.contains(':') {
        let parts: Vec<&str> = compact.split(':').collect();
        if parts.len() == 2 {
            parts[1].parse::<i64>().ok()
        } else {
            None
        }
    } else {
        compact.parse::<i64>().ok()
    };

    match denominator {
        Some(value) => value.max(1) as u32,
        None => {
            warn!(
                scale_text,
                fallback = FALLBACK_SCALE_RATIO,
                "unparsable scale ratio, substituting fallback"
            );
            FALLBACK_SCALE_RATIO
        }
    }
}

/// Round grid spacing for a ground span.
///
/// Candidates are {0.02, 0.05, 0.1, 0.2, 0.5, 1.0} scaled by the span's
/// decade; the one closest to span/6 wins, giving 4-10 grid lines across the
/// extent. Non-positive spans get a safe default of 100 m.
pub fn nice_grid_step(span_m: f64) -> f64 {
    if span_m <= 0.0 {
        return 100.0;
    }
    let base = 10_f64.powf(span_m.log10().floor());
    let target = span_m / 6.0;
    [0.02, 0.05, 0.1, 0.2, 0.5, 1.0]
        .iter()
        .map(|m| m * base)
        .min_by(|a, b| {
            (a - target)
                .abs()
                .partial_cmp(&(b - target).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(100.0)
}

/// Compute the true-scale view extent for a subject geometry.
///
/// The view is centered on the subject's bounds and spans exactly
/// `window × 0.0254 × ratio` meters. If the subject is larger than that
/// span, the extent grows to the subject bounds plus a 10% margin per side
/// instead of cropping the boundary out of frame; the stated ratio is then
/// no longer honored, which is logged.
pub fn plan_scale(
    bounds: Rect<f64>,
    centroid: Point<f64>,
    ratio: u32,
    window_width_in: f64,
    window_height_in: f64,
) -> ScalePlan {
    let ground_w = window_width_in * INCH_TO_M * ratio as f64;
    let ground_h = window_height_in * INCH_TO_M * ratio as f64;

    let (mut cx, mut cy) = (centroid.x(), centroid.y());
    let mut half_w = ground_w / 2.0;
    let mut half_h = ground_h / 2.0;

    if bounds.width() > ground_w || bounds.height() > ground_h {
        warn!(
            ratio,
            bounds_w = bounds.width(),
            bounds_h = bounds.height(),
            "subject exceeds the true-scale window, widening extent"
        );
        // Re-center on the bounds and add a 10% margin per side.
        cx = (bounds.min().x + bounds.max().x) / 2.0;
        cy = (bounds.min().y + bounds.max().y) / 2.0;
        half_w = half_w.max(bounds.width() * 0.6);
        half_h = half_h.max(bounds.height() * 0.6);
    }

    let extent = ViewExtent {
        min_x: cx - half_w,
        max_x: cx + half_w,
        min_y: cy - half_h,
        max_y: cy + half_h,
    };
    let major_step = nice_grid_step(extent.max_span());

    ScalePlan {
        ratio,
        extent,
        major_step,
        minor_step: major_step / 5.0,
    }
}

/// Total scale-bar length for a map ratio, meters.
pub fn scale_bar_length_m(ratio: u32) -> f64 {
    match ratio {
        0..=500 => 50.0,
        501..=1000 => 100.0,
        1001..=2000 => 200.0,
        _ => 500.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn ratio_forms_are_equivalent() {
        assert_eq!(parse_scale_ratio("1 : 1000"), 1000);
        assert_eq!(parse_scale_ratio("1:1000"), 1000);
        assert_eq!(parse_scale_ratio("1000"), 1000);
        assert_eq!(parse_scale_ratio("  1 :2500 "), 2500);
    }

    #[test]
    fn unparsable_ratio_falls_back() {
        assert_eq!(parse_scale_ratio("garbage"), 1000);
        assert_eq!(parse_scale_ratio(""), 1000);
        assert_eq!(parse_scale_ratio("1:2:3"), 1000);
    }

    #[test]
    fn non_positive_ratio_clamps_to_one() {
        assert_eq!(parse_scale_ratio("0"), 1);
        assert_eq!(parse_scale_ratio("1:-50"), 1);
    }

    #[test]
    fn grid_step_for_kilometer_span() {
        let step = nice_grid_step(1000.0);
        assert!((100.0..=250.0).contains(&step), "got {step}");
    }

    #[test]
    fn grid_step_degenerate_span() {
        assert_eq!(nice_grid_step(0.0), 100.0);
        assert_eq!(nice_grid_step(-5.0), 100.0);
    }

    #[test]
    fn scale_bar_lookup() {
        assert_eq!(scale_bar_length_m(500), 50.0);
        assert_eq!(scale_bar_length_m(1000), 100.0);
        assert_eq!(scale_bar_length_m(2000), 200.0);
        assert_eq!(scale_bar_length_m(5000), 500.0);
    }

    #[test]
    fn true_scale_window_is_exact() {
        let bounds = Rect::new(coord! {x: 0.0, y: 0.0}, coord! {x: 50.0, y: 50.0});
        let plan = plan_scale(bounds, Point::new(25.0, 25.0), 1000, 6.616, 5.26);
        let expected_w = 6.616 * 0.0254 * 1000.0;
        assert!((plan.extent.width() - expected_w).abs() < 1e-9);
    }

    #[test]
    fn oversized_subject_widens_extent() {
        // A 1 km subject cannot fit a 1:100 window a few meters across.
        let bounds = Rect::new(coord! {x: 0.0, y: 0.0}, coord! {x: 1000.0, y: 800.0});
        let plan = plan_scale(bounds, Point::new(500.0, 400.0), 100, 6.616, 5.26);
        assert!(plan.extent.min_x <= 0.0 && plan.extent.max_x >= 1000.0);
        assert!(plan.extent.min_y <= 0.0 && plan.extent.max_y >= 800.0);
        // 10% margin per side.
        assert!((plan.extent.width() - 1200.0).abs() < 1e-9);
    }
}
