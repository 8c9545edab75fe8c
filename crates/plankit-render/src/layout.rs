//! Page-level chrome: sheet frame, title block, footer, and key box.
//!
//! Layout is independent of map content and parameterized only by the text
//! fields in [`PlanMetadata`]. Positions are figure fractions (y up from the
//! page bottom); the same field set and ordering is shared by every export
//! variant, with small placement differences between the survey-plan page
//! and the orthophoto page.

use chrono::Local;
use tiny_skia::Color;

use plankit_core::PlanMetadata;

use crate::canvas::{PlanCanvas, TextAlign};

/// Which page variant is being composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutVariant {
    /// Survey plan: carries the area line and the key box.
    Plan,
    /// Orthophoto preview: no area line, no key box, tighter footer.
    Orthophoto,
}

fn black() -> Color {
    Color::from_rgba8(0, 0, 0, 255)
}

fn red() -> Color {
    Color::from_rgba8(220, 0, 0, 255)
}

fn blue() -> Color {
    Color::from_rgba8(0, 0, 200, 255)
}

/// Double sheet border just inside the page edge.
pub fn draw_sheet_frame(canvas: &mut PlanCanvas) {
    let (x0, y0) = canvas.frac_to_px(0.02, 0.98);
    let (x1, y1) = canvas.frac_to_px(0.98, 0.02);
    canvas.stroke_rect(x0, y0, x1 - x0, y1 - y0, black(), canvas.pt(2.0));

    let (x0, y0) = canvas.frac_to_px(0.03, 0.97);
    let (x1, y1) = canvas.frac_to_px(0.97, 0.03);
    canvas.stroke_rect(x0, y0, x1 - x0, y1 - y0, black(), canvas.pt(0.8));
}

/// Centered title block at the top of the sheet.
pub fn draw_title_block(
    canvas: &mut PlanCanvas,
    metadata: &PlanMetadata,
    plot_id: i64,
    area_m2: f64,
    variant: LayoutVariant,
) {
    let y = 0.955;
    let center = 0.5;
    let line = |canvas: &mut PlanCanvas, text: &str, dy: f64, size: f32, color: Color, bold| {
        let (px, py) = canvas.frac_to_px(center, y - dy);
        canvas.draw_text(text, px, py, size, color, TextAlign::Center, bold);
    };

    line(canvas, &metadata.title, 0.0, 12.0, black(), true);
    line(canvas, &format!("OF PLOT {plot_id}"), 0.025, 10.0, black(), false);
    line(
        canvas,
        &format!("STATION: {}", metadata.station),
        0.055,
        9.0,
        black(),
        false,
    );
    line(
        canvas,
        &format!("LOCATED AT: {}", metadata.location),
        0.075,
        9.0,
        black(),
        false,
    );
    line(canvas, &metadata.district, 0.095, 9.0, black(), false);
    line(canvas, &metadata.state, 0.115, 9.0, black(), false);

    match variant {
        LayoutVariant::Plan => {
            line(
                canvas,
                &format!("AREA = {:.4} HA.", area_m2 / 10_000.0),
                0.145,
                9.0,
                red(),
                false,
            );
            line(
                canvas,
                &format!("SCALE  {}", metadata.scale_text),
                0.165,
                9.0,
                black(),
                false,
            );
        }
        LayoutVariant::Orthophoto => {
            line(
                canvas,
                &format!("SCALE {}", metadata.scale_text),
                0.145,
                9.0,
                black(),
                false,
            );
        }
    }
}

/// Surveyor block and attribution lines at the bottom of the sheet.
pub fn draw_footer(canvas: &mut PlanCanvas, metadata: &PlanMetadata, variant: LayoutVariant) {
    let (y_top, y_bottom, size) = match variant {
        LayoutVariant::Plan => (0.185, 0.055, 9.0),
        LayoutVariant::Orthophoto => (0.155, 0.05, 8.0),
    };
    let printed = Local::now().format("%Y-%m-%d %H:%M").to_string();

    let line = |canvas: &mut PlanCanvas, text: &str, fy: f64, size: f32, color: Color| {
        let (px, py) = canvas.frac_to_px(0.06, fy);
        canvas.draw_text(text, px, py, size, color, TextAlign::Left, false);
    };

    line(
        canvas,
        &format!("SURVEYOR: {}", metadata.surveyor_name),
        y_top,
        size,
        black(),
    );
    line(
        canvas,
        &format!("RANK: {}", metadata.surveyor_rank),
        y_top - 0.025,
        size,
        black(),
    );
    line(
        canvas,
        "SIGNATURE: ____________________",
        y_top - 0.050,
        size,
        black(),
    );
    line(
        canvas,
        &format!("DATE PRINTED: {printed}"),
        y_top - 0.075,
        size,
        black(),
    );

    line(canvas, &metadata.crs_note, y_bottom, 8.0, blue());
    let (px, py) = canvas.frac_to_px(0.94, y_bottom);
    canvas.draw_text(
        &metadata.source_note,
        px,
        py,
        8.0,
        black(),
        TextAlign::Right,
        false,
    );
}

/// Legend box between the map and the footer, listing the plotted
/// categories with their line styles.
pub fn draw_key_box(canvas: &mut PlanCanvas) {
    let (w, h) = (0.28, 0.11);
    let (x, y) = (0.50 - w / 2.0, 0.08);

    let (px, py) = canvas.frac_to_px(x, y + h);
    let (px1, py1) = canvas.frac_to_px(x + w, y);
    canvas.stroke_rect(px, py, px1 - px, py1 - py, black(), canvas.pt(0.9));

    let (hx, hy) = canvas.frac_to_px(x + w / 2.0, y + h - 0.02);
    canvas.draw_text("KEY", hx, hy, 8.0, black(), TextAlign::Center, true);

    let items: [(&str, Color, f32); 4] = [
        ("PERIMETER (Plot)", red(), 2.0),
        ("BUILDINGS", black(), 1.0),
        ("ROADS", Color::from_rgba8(105, 105, 105, 255), 1.0),
        ("RIVERS", Color::from_rgba8(0, 0, 255, 255), 1.0),
    ];

    let mut yy = y + h - 0.045;
    for (label, color, lw) in items {
        let (sx, sy) = canvas.frac_to_px(x + 0.03, yy);
        let (ex, _) = canvas.frac_to_px(x + 0.10, yy);
        canvas.stroke_polyline(&[(sx, sy), (ex, sy)], color, canvas.pt(lw));
        let (tx, ty) = canvas.frac_to_px(x + 0.12, yy);
        canvas.draw_text(label, tx, ty, 7.0, black(), TextAlign::Left, false);
        yy -= 0.02;
    }
}
