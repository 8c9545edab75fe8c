//! Back-computation table document.
//!
//! Landscape pages with a fixed 9-column table (FROM, TO, E, N, signed ΔE,
//! signed ΔN, distance, forward and back bearings in DMS), red numeric
//! columns, vertical rules, a totals row for the closure sums, and automatic
//! pagination that redraws the header on every new page.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use chrono::Local;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};
use tracing::debug;

use plankit_core::A4_LANDSCAPE;
use plankit_survey::Traverse;

use crate::error::Result;

/// Column x positions in points, one per header.
const COL_X: [f64; 9] = [40.0, 85.0, 135.0, 220.0, 305.0, 390.0, 475.0, 570.0, 680.0];

const HEADERS: [&str; 9] = [
    "FROM", "TO", "E", "N", "\u{00b1}\u{0394}E", "\u{00b1}\u{0394}N", "DIST (m)", "FB (DMS)",
    "BB (DMS)",
];

const MARGIN_LEFT: f64 = 40.0;
const MARGIN_RIGHT: f64 = 30.0;
const ROW_H: f64 = 22.0;
const TABLE_BOTTOM_LIMIT: f64 = 60.0;

fn pt_to_mm(v: f64) -> f32 {
    (v * 25.4 / 72.0) as f32
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn red() -> Color {
    Color::Rgb(Rgb::new(0.8, 0.0, 0.0, None))
}

fn text_at(layer: &PdfLayerReference, font: &IndirectFontRef, size: f32, x_pt: f64, y_pt: f64, text: &str) {
    layer.use_text(text, size, Mm(pt_to_mm(x_pt)), Mm(pt_to_mm(y_pt)), font);
}

fn hline(layer: &PdfLayerReference, x0_pt: f64, x1_pt: f64, y_pt: f64, width: f32) {
    layer.set_outline_color(black());
    layer.set_outline_thickness(width);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(pt_to_mm(x0_pt)), Mm(pt_to_mm(y_pt))), false),
            (Point::new(Mm(pt_to_mm(x1_pt)), Mm(pt_to_mm(y_pt))), false),
        ],
        is_closed: false,
    });
}

fn vline(layer: &PdfLayerReference, x_pt: f64, y0_pt: f64, y1_pt: f64) {
    layer.set_outline_color(black());
    layer.set_outline_thickness(0.8);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(pt_to_mm(x_pt)), Mm(pt_to_mm(y0_pt))), false),
            (Point::new(Mm(pt_to_mm(x_pt)), Mm(pt_to_mm(y1_pt))), false),
        ],
        is_closed: false,
    });
}

/// Vertical rules down the left edge of every column plus the right margin.
fn draw_column_rules(layer: &PdfLayerReference, page_w_pt: f64, top_pt: f64, bottom_pt: f64) {
    for x in COL_X {
        vline(layer, x - 8.0, top_pt, bottom_pt);
    }
    vline(layer, page_w_pt - MARGIN_RIGHT, top_pt, bottom_pt);
}

/// Page header: document title, plot id, column titles, and the top rule.
/// Returns the y of the first data row.
fn draw_header(
    layer: &PdfLayerReference,
    font_bold: &IndirectFontRef,
    plot_id: i64,
    page_w_pt: f64,
    page_h_pt: f64,
) -> f64 {
    let top_y = page_h_pt - 40.0;
    layer.set_fill_color(black());
    text_at(layer, font_bold, 16.0, page_w_pt / 2.0 - 70.0, top_y, "BACK COMPUTATION");
    text_at(layer, font_bold, 12.0, MARGIN_LEFT, top_y, &format!("PLOT {plot_id}"));

    let row_y = top_y - 60.0;
    for (x, header) in COL_X.iter().zip(HEADERS.iter()) {
        text_at(layer, font_bold, 9.0, *x, row_y, header);
    }
    hline(layer, MARGIN_LEFT - 5.0, page_w_pt - MARGIN_RIGHT, row_y - 6.0, 1.0);

    row_y - ROW_H
}

/// Write the traverse table document.
pub fn write_traverse_pdf(traverse: &Traverse, area_m2: f64, plot_id: i64, out: &Path) -> Result<()> {
    let (page_w_pt, page_h_pt) = A4_LANDSCAPE.points();
    let (w_mm, h_mm) = A4_LANDSCAPE.millimeters();

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Back Computation",
        Mm(w_mm as f32),
        Mm(h_mm as f32),
        "Layer 1",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let new_layer = |doc: &PdfDocumentReference, first: bool| -> PdfLayerReference {
        if first {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(w_mm as f32), Mm(h_mm as f32), "Layer 1");
            doc.get_page(page).get_layer(layer)
        }
    };

    let mut layer = new_layer(&doc, true);
    let mut y = draw_header(&layer, &font_bold, plot_id, page_w_pt, page_h_pt);
    let table_top = y + ROW_H + 8.0;

    // Area sits clear of the table, top right.
    layer.set_fill_color(black());
    text_at(
        &layer,
        &font_bold,
        11.0,
        page_w_pt - MARGIN_RIGHT - 160.0,
        table_top + 22.0,
        &format!("AREA = {area_m2:.2} m\u{00b2}"),
    );

    let mut page_table_top = table_top;
    for row in &traverse.rows {
        let values = [
            row.from_station.clone(),
            row.to_station.clone(),
            format!("{:.3}", row.easting),
            format!("{:.3}", row.northing),
            format!("{:+.3}", row.delta_e),
            format!("{:+.3}", row.delta_n),
            format!("{:.3}", row.distance),
            row.forward_dms().to_string(),
            row.back_dms().to_string(),
        ];

        for (i, (x, value)) in COL_X.iter().zip(values.iter()).enumerate() {
            // E, N, deltas, and distance read in red.
            if (2..=6).contains(&i) {
                layer.set_fill_color(red());
            } else {
                layer.set_fill_color(black());
            }
            text_at(&layer, &font, 9.0, *x, y, value);
        }

        y -= ROW_H;

        if y < TABLE_BOTTOM_LIMIT {
            draw_column_rules(&layer, page_w_pt, page_table_top, y + ROW_H);
            layer = new_layer(&doc, false);
            let first_row_y = draw_header(&layer, &font_bold, plot_id, page_w_pt, page_h_pt);
            page_table_top = first_row_y + ROW_H + 8.0;
            y = first_row_y;
        }
    }

    // Totals row: closure sums under the delta columns.
    layer.set_fill_color(black());
    hline(&layer, MARGIN_LEFT - 5.0, page_w_pt - MARGIN_RIGHT, y + 8.0, 1.0);
    text_at(&layer, &font_bold, 9.0, COL_X[0], y, "TOTAL");
    layer.set_fill_color(red());
    text_at(
        &layer,
        &font_bold,
        9.0,
        COL_X[4],
        y,
        &format!("{:+.3}", traverse.closure.sum_delta_e),
    );
    text_at(
        &layer,
        &font_bold,
        9.0,
        COL_X[5],
        y,
        &format!("{:+.3}", traverse.closure.sum_delta_n),
    );
    layer.set_fill_color(black());
    hline(&layer, MARGIN_LEFT - 5.0, page_w_pt - MARGIN_RIGHT, y - 6.0, 1.0);
    draw_column_rules(&layer, page_w_pt, page_table_top, y - 6.0);

    text_at(
        &layer,
        &font,
        8.0,
        MARGIN_LEFT,
        30.0,
        &format!("Printed: {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
    );

    doc.save(&mut BufWriter::new(fs::File::create(out)?))?;
    debug!(path = %out.display(), rows = traverse.rows.len(), "traverse table PDF written");
    Ok(())
}
