//! Two-page plot report.
//!
//! Page 1 is a plain-text summary (identifier, timestamp, area, feature
//! counts inside and within the 50 m buffer); page 2 embeds the rendered map
//! image, scaled to fit and centered. The map PNG is produced upstream and
//! gated on a minimum size before embedding so a failed render can never
//! yield a plausible-looking but corrupt document.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use chrono::Utc;
use printpdf::{BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument};
use tracing::debug;

use plankit_core::{FeatureSummary, A4_PORTRAIT};

use crate::error::{ExportError, Result};

/// Anything smaller than this is a failed render, not a map.
const MIN_MAP_PNG_BYTES: u64 = 2000;

/// Map display width on page 2, points.
const MAP_TARGET_WIDTH_PT: f64 = 500.0;

/// Summary block for page 1.
#[derive(Debug, Clone)]
pub struct ReportData {
    pub plot_id: i64,
    pub area_m2: f64,
    pub summary: FeatureSummary,
}

fn pt_to_mm(v: f64) -> f32 {
    (v * 25.4 / 72.0) as f32
}

/// Verify the intermediate map PNG is present and plausibly non-empty.
fn check_map_integrity(map_png: &Path) -> Result<()> {
    let size = fs::metadata(map_png).map(|m| m.len()).unwrap_or(0);
    if size < MIN_MAP_PNG_BYTES {
        return Err(ExportError::RenderIntegrity {
            path: map_png.to_path_buf(),
            size,
        });
    }
    Ok(())
}

/// Write the two-page report PDF.
pub fn write_report_pdf(report: &ReportData, map_png: &Path, out: &Path) -> Result<()> {
    check_map_integrity(map_png)?;

    let (w_mm, h_mm) = A4_PORTRAIT.millimeters();
    let (doc, page1, layer1) = PdfDocument::new(
        "Land Verification Report",
        Mm(w_mm as f32),
        Mm(h_mm as f32),
        "Layer 1",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    // Page 1: text summary, top-down.
    let layer = doc.get_page(page1).get_layer(layer1);
    let mut y_pt = A4_PORTRAIT.points().1 - 50.0;
    let mut line = |text: &str, font: &IndirectFontRef| {
        layer.use_text(text, 11.0, Mm(pt_to_mm(50.0)), Mm(pt_to_mm(y_pt)), font);
        y_pt -= 18.0;
    };

    line("Land Verification Report", &font);
    line(&"=".repeat(50), &font);
    line(&format!("Plot ID: {}", report.plot_id), &font);
    line(
        &format!("Generated: {} UTC", Utc::now().format("%Y-%m-%d %H:%M:%S")),
        &font,
    );
    line("", &font);
    line(&format!("Area (sqm): {:.2}", report.area_m2), &font);
    line("", &font);

    line("Features INSIDE plot:", &font);
    if report.summary.inside.is_empty() {
        line("  None", &font);
    } else {
        for (kind, count) in &report.summary.inside {
            line(&format!("  - {kind}: {count}"), &font);
        }
    }

    line("", &font);
    line("Features within 50m buffer:", &font);
    if report.summary.buffer.is_empty() {
        line("  None", &font);
    } else {
        for (kind, count) in &report.summary.buffer {
            line(&format!("  - {kind}: {count}"), &font);
        }
    }

    // Page 2: the map, aspect-preserving and centered.
    let (page2, layer2) = doc.add_page(Mm(w_mm as f32), Mm(h_mm as f32), "Layer 1");
    let map_layer = doc.get_page(page2).get_layer(layer2);

    let dyn_img = printpdf::image_crate::open(map_png)?;
    let (px_w, px_h) = (dyn_img.width() as f64, dyn_img.height() as f64);

    let target_h_pt = MAP_TARGET_WIDTH_PT * px_h / px_w;
    // printpdf sizes an image from its pixel count and dpi.
    let dpi = px_w * 72.0 / MAP_TARGET_WIDTH_PT;
    let (page_w_pt, page_h_pt) = A4_PORTRAIT.points();
    let x_pt = (page_w_pt - MAP_TARGET_WIDTH_PT) / 2.0;
    let y_pt = (page_h_pt - target_h_pt) / 2.0;

    let image = Image::from_dynamic_image(&dyn_img);
    image.add_to_layer(
        map_layer,
        ImageTransform {
            translate_x: Some(Mm(pt_to_mm(x_pt))),
            translate_y: Some(Mm(pt_to_mm(y_pt))),
            dpi: Some(dpi as f32),
            ..Default::default()
        },
    );

    doc.save(&mut BufWriter::new(fs::File::create(out)?))?;
    debug!(path = %out.display(), "report PDF written");
    Ok(())
}

/// Single-page PDF wrapping a full-page raster (the orthophoto document).
///
/// The raster is scaled to the page width with aspect preserved; the same
/// integrity gate applies as for the report map.
pub fn write_image_pdf(png: &Path, out: &Path) -> Result<()> {
    check_map_integrity(png)?;

    let (w_mm, h_mm) = A4_PORTRAIT.millimeters();
    let (doc, page, layer) = PdfDocument::new(
        "Orthophoto",
        Mm(w_mm as f32),
        Mm(h_mm as f32),
        "Layer 1",
    );

    let dyn_img = printpdf::image_crate::open(png)?;
    let (px_w, px_h) = (dyn_img.width() as f64, dyn_img.height() as f64);
    let (page_w_pt, page_h_pt) = A4_PORTRAIT.points();
    let dpi = px_w * 72.0 / page_w_pt;
    let target_h_pt = page_w_pt * px_h / px_w;
    let y_pt = (page_h_pt - target_h_pt).max(0.0) / 2.0;

    let image = Image::from_dynamic_image(&dyn_img);
    image.add_to_layer(
        doc.get_page(page).get_layer(layer),
        ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(pt_to_mm(y_pt))),
            dpi: Some(dpi as f32),
            ..Default::default()
        },
    );

    doc.save(&mut BufWriter::new(fs::File::create(out)?))?;
    debug!(path = %out.display(), "orthophoto PDF written");
    Ok(())
}
