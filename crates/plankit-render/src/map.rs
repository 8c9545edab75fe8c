//! Map-window drawing: features, boundary, grid, frame, annotations,
//! north arrow, and scale bar.
//!
//! Everything here draws through an explicit [`PlanCanvas`] and
//! [`MapTransform`]; draw order is the caller's responsibility (features
//! under boundary, boundary under annotations).

use geo::{BooleanOps, Centroid, Geometry, LineString, MultiLineString, Polygon};
use tiny_skia::Color;

use crate::canvas::{MapTransform, PlanCanvas, TextAlign};
use crate::model::RenderModel;

fn boundary_color() -> Color {
    Color::from_rgba8(220, 0, 0, 255)
}

fn building_color() -> Color {
    Color::from_rgba8(0, 0, 0, 255)
}

fn road_color() -> Color {
    Color::from_rgba8(105, 105, 105, 255)
}

fn river_color() -> Color {
    Color::from_rgba8(0, 0, 255, 255)
}

fn grid_color(alpha: u8) -> Color {
    Color::from_rgba8(0, 0, 255, alpha)
}

fn label_color() -> Color {
    Color::from_rgba8(0, 0, 200, 255)
}

fn ring_to_px(tf: &MapTransform, ring: &LineString<f64>) -> Vec<(f32, f32)> {
    ring.0.iter().map(|c| tf.to_px(c.x, c.y)).collect()
}

/// Stroke one feature geometry: lines as polylines, polygons as ring
/// outlines. Points and collections are ignored; the store never sends them.
fn draw_geometry(
    canvas: &mut PlanCanvas,
    tf: &MapTransform,
    geometry: &Geometry<f64>,
    color: Color,
    width_px: f32,
) {
    match geometry {
        Geometry::LineString(line) => {
            canvas.stroke_polyline(&ring_to_px(tf, line), color, width_px);
        }
        Geometry::MultiLineString(lines) => {
            for line in &lines.0 {
                canvas.stroke_polyline(&ring_to_px(tf, line), color, width_px);
            }
        }
        Geometry::Polygon(poly) => {
            canvas.stroke_ring(&ring_to_px(tf, poly.exterior()), color, width_px);
        }
        Geometry::MultiPolygon(polys) => {
            for poly in &polys.0 {
                canvas.stroke_ring(&ring_to_px(tf, poly.exterior()), color, width_px);
            }
        }
        _ => {}
    }
}

/// Classified features in fixed draw order: rivers, then roads, then
/// buildings. The plot boundary goes on top of all of them.
pub fn draw_features(canvas: &mut PlanCanvas, tf: &MapTransform, model: &RenderModel) {
    let lw = canvas.pt(1.2);
    for river in &model.rivers {
        draw_geometry(canvas, tf, river, river_color(), lw);
    }
    for road in &model.roads {
        draw_geometry(canvas, tf, road, road_color(), lw);
    }
    let lw = canvas.pt(1.0);
    for building in &model.buildings {
        draw_geometry(canvas, tf, building, building_color(), lw);
    }
}

/// Plot boundary, always drawn last among map layers.
pub fn draw_boundary(canvas: &mut PlanCanvas, tf: &MapTransform, boundary: &Polygon<f64>) {
    canvas.stroke_ring(
        &ring_to_px(tf, boundary.exterior()),
        boundary_color(),
        canvas.pt(2.0),
    );
}

fn grid_lines(tf: &MapTransform, step: f64) -> MultiLineString<f64> {
    let e = &tf.extent;
    let mut lines = Vec::new();
    let mut x = (e.min_x / step).floor() * step;
    while x <= e.max_x {
        lines.push(LineString::from(vec![(x, e.min_y), (x, e.max_y)]));
        x += step;
    }
    let mut y = (e.min_y / step).floor() * step;
    while y <= e.max_y {
        lines.push(LineString::from(vec![(e.min_x, y), (e.max_x, y)]));
        y += step;
    }
    MultiLineString::new(lines)
}

/// Coordinate grid at minor and major spacing.
///
/// With `mask` set, grid lines are clipped so they do not cross the plot
/// interior; the orthophoto variant passes `None` and draws them through.
pub fn draw_grid(
    canvas: &mut PlanCanvas,
    tf: &MapTransform,
    mask: Option<&Polygon<f64>>,
    minor_step: f64,
    major_step: f64,
) {
    for (step, width_pt, alpha) in [(minor_step, 0.3_f32, 51_u8), (major_step, 1.0, 153)] {
        if step <= 0.0 {
            continue;
        }
        let lines = grid_lines(tf, step);
        let visible = match mask {
            Some(polygon) => polygon.clip(&lines, true),
            None => lines,
        };
        let lw = canvas.pt(width_pt.max(0.5));
        for line in &visible.0 {
            canvas.stroke_polyline(&ring_to_px(tf, line), grid_color(alpha), lw);
        }
    }
}

/// Double coordinate frame around the view with periodic easting/northing
/// tick labels. Northing labels are rotated upright on both sides; the
/// bottom-most northing is skipped to keep the corner clear.
pub fn draw_coordinate_frame(canvas: &mut PlanCanvas, tf: &MapTransform, spacing: f64) {
    let e = tf.extent;
    let pad = e.width() * 0.035;

    let outer: Vec<(f32, f32)> = [
        (e.min_x - pad, e.min_y - pad),
        (e.max_x + pad, e.min_y - pad),
        (e.max_x + pad, e.max_y + pad),
        (e.min_x - pad, e.max_y + pad),
    ]
    .iter()
    .map(|&(x, y)| tf.to_px(x, y))
    .collect();
    canvas.stroke_ring(&outer, building_color(), canvas.pt(1.5));

    let inner: Vec<(f32, f32)> = [
        (e.min_x, e.min_y),
        (e.max_x, e.min_y),
        (e.max_x, e.max_y),
        (e.min_x, e.max_y),
    ]
    .iter()
    .map(|&(x, y)| tf.to_px(x, y))
    .collect();
    canvas.stroke_ring(&inner, building_color(), canvas.pt(1.0));

    if spacing <= 0.0 {
        return;
    }

    let mut x = (e.min_x / spacing).floor() * spacing;
    while x <= e.max_x + 0.1 {
        if x >= e.min_x {
            let (px, py) = tf.to_px(x, e.max_y + pad * 0.45);
            canvas.draw_text(
                &format!("{}", x.round() as i64),
                px,
                py,
                7.0,
                label_color(),
                TextAlign::Center,
                false,
            );
        }
        x += spacing;
    }

    let mut y = (e.min_y / spacing).floor() * spacing;
    while y <= e.max_y + 0.1 {
        if y >= e.min_y + spacing * 0.9 && y <= e.max_y {
            let text = format!("{}", y.round() as i64);
            let (lx, ly) = tf.to_px(e.min_x - pad * 0.45, y);
            canvas.draw_text_rotated(&text, lx, ly, 7.0, label_color(), TextAlign::Center, false, 90.0);
            let (rx, ry) = tf.to_px(e.max_x + pad * 0.45, y);
            canvas.draw_text_rotated(&text, rx, ry, 7.0, label_color(), TextAlign::Center, false, 90.0);
        }
        y += spacing;
    }
}

/// Station markers, per-edge bearing/distance annotations, and the plot-id
/// label at the centroid.
///
/// Edge text follows the edge direction, rotated into (-90°, 90°] so it
/// always reads upright.
pub fn annotate_stations(canvas: &mut PlanCanvas, tf: &MapTransform, model: &RenderModel) {
    let coords = &model.boundary.exterior().0;

    for (i, row) in model.traverse.rows.iter().enumerate() {
        let p1 = coords[i];
        let p2 = coords[i + 1];

        let (px, py) = tf.to_px(p1.x, p1.y);
        let radius = canvas.pt(5.0);
        canvas.fill_circle(px, py, radius, Color::from_rgba8(255, 255, 255, 255));
        canvas.stroke_circle(px, py, radius, label_color(), canvas.pt(0.8));
        canvas.draw_text(
            &row.from_station,
            px,
            py,
            8.0,
            label_color(),
            TextAlign::Center,
            false,
        );

        let mid_x = (p1.x + p2.x) / 2.0;
        let mid_y = (p1.y + p2.y) / 2.0;
        // Keep annotations upright: normalize the edge angle into (-90, 90].
        let mut angle = (p2.y - p1.y).atan2(p2.x - p1.x).to_degrees();
        if angle > 90.0 {
            angle -= 180.0;
        } else if angle <= -90.0 {
            angle += 180.0;
        }
        let (mx, my) = tf.to_px(mid_x, mid_y);
        canvas.draw_text_rotated(
            &format!("{:.1}\u{00b0}\n{:.1}m", row.forward_deg, row.distance),
            mx,
            my,
            6.5,
            building_color(),
            TextAlign::Center,
            false,
            angle as f32,
        );
    }

    if let Some(centroid) = model.boundary.centroid() {
        let (cx, cy) = tf.to_px(centroid.x(), centroid.y());
        canvas.draw_text(
            &format!("PLOT {}", model.plot_id),
            cx,
            cy,
            9.0,
            building_color(),
            TextAlign::Center,
            true,
        );
    }
}

/// North arrow: shaft, solid head, bold "N" above the tip.
pub fn draw_north_arrow(canvas: &mut PlanCanvas, tf: &MapTransform, fx: f64, fy_base: f64, fy_tip: f64) {
    let (bx, by) = tf.window_frac_to_px(fx, fy_base);
    let (txp, typ) = tf.window_frac_to_px(fx, fy_tip);

    canvas.stroke_polyline(&[(bx, by), (txp, typ)], building_color(), canvas.pt(2.0));

    let head_w = canvas.pt(4.0);
    let head_h = canvas.pt(8.0);
    canvas.fill_polygon(
        &[
            (txp, typ - head_h),
            (txp - head_w, typ),
            (txp + head_w, typ),
        ],
        building_color(),
    );

    canvas.draw_text(
        "N",
        txp,
        typ - head_h - canvas.pt(8.0),
        12.0,
        building_color(),
        TextAlign::Center,
        true,
    );
}

/// Segmented scale bar below the map window.
///
/// Four alternating filled/open segments with numeric labels at each
/// boundary and a "meters" caption. Position and width are window fractions.
pub fn draw_scale_bar(
    canvas: &mut PlanCanvas,
    tf: &MapTransform,
    length_m: f64,
    x0_frac: f64,
    y0_frac: f64,
    total_w_frac: f64,
) {
    const SEGMENTS: usize = 4;

    let (x0, y0) = tf.window_frac_to_px(x0_frac, y0_frac);
    let total_w = total_w_frac as f32 * tf.window_width_px();
    let bar_h = 0.012 * tf.window_height_px();
    let seg_w = total_w / SEGMENTS as f32;

    for i in 0..SEGMENTS {
        let xi = x0 + i as f32 * seg_w;
        if i % 2 == 0 {
            canvas.fill_rect(xi, y0 - bar_h, seg_w, bar_h, building_color());
        }
        canvas.stroke_rect(xi, y0 - bar_h, seg_w, bar_h, building_color(), canvas.pt(0.8));
    }
    canvas.stroke_rect(x0, y0 - bar_h, total_w, bar_h, building_color(), canvas.pt(1.2));

    let label_y = y0 + canvas.pt(6.0);
    canvas.draw_text("0", x0, label_y, 7.0, building_color(), TextAlign::Center, false);
    for i in 1..=SEGMENTS {
        let value = (length_m / SEGMENTS as f64 * i as f64).round() as i64;
        canvas.draw_text(
            &format!("{value}"),
            x0 + i as f32 * seg_w,
            label_y,
            7.0,
            building_color(),
            TextAlign::Center,
            false,
        );
    }
    canvas.draw_text(
        "meters",
        x0 + total_w / 2.0,
        y0 - bar_h - canvas.pt(5.0),
        7.0,
        building_color(),
        TextAlign::Center,
        false,
    );
}
