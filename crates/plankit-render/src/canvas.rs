//! Explicit drawing context for page rendering.
//!
//! [`PlanCanvas`] owns the pixmap for one export and is threaded through
//! every drawing call; there is no process-wide figure or axes object. Page
//! chrome addresses the canvas in figure fractions (x right, y up from the
//! bottom, matching print conventions), while map content goes through a
//! [`MapTransform`] that maps ground meters into the map window.

use plankit_core::MapWindow;
use plankit_survey::ViewExtent;
use rusttype::{point as rt_point, Font, Scale};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::error::RenderError;
use crate::fonts;

/// Horizontal text anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Ground-meters to page-pixels mapping for the map window.
#[derive(Debug, Clone, Copy)]
pub struct MapTransform {
    pub extent: ViewExtent,
    left_px: f32,
    top_px: f32,
    width_px: f32,
    height_px: f32,
}

impl MapTransform {
    pub fn new(extent: ViewExtent, window: MapWindow, page_w_px: u32, page_h_px: u32) -> Self {
        let page_w = page_w_px as f64;
        let page_h = page_h_px as f64;
        Self {
            extent,
            left_px: (window.left * page_w) as f32,
            top_px: ((1.0 - window.bottom - window.height) * page_h) as f32,
            width_px: (window.width * page_w) as f32,
            height_px: (window.height * page_h) as f32,
        }
    }

    /// Ground coordinate to page pixel.
    pub fn to_px(&self, x: f64, y: f64) -> (f32, f32) {
        let fx = (x - self.extent.min_x) / self.extent.width();
        let fy = (self.extent.max_y - y) / self.extent.height();
        (
            self.left_px + fx as f32 * self.width_px,
            self.top_px + fy as f32 * self.height_px,
        )
    }

    /// Map-window fraction (x right, y up) to page pixel.
    pub fn window_frac_to_px(&self, fx: f64, fy: f64) -> (f32, f32) {
        (
            self.left_px + fx as f32 * self.width_px,
            self.top_px + (1.0 - fy) as f32 * self.height_px,
        )
    }

    pub fn window_width_px(&self) -> f32 {
        self.width_px
    }

    pub fn window_height_px(&self) -> f32 {
        self.height_px
    }
}

/// Rasterized text coverage, blitted with optional rotation.
struct Coverage {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

/// One export's drawing surface.
pub struct PlanCanvas {
    pixmap: Pixmap,
    width: u32,
    height: u32,
    /// Pixels per typographic point at the render DPI.
    px_per_pt: f32,
}

impl PlanCanvas {
    /// White page of the given pixel size.
    pub fn new(width: u32, height: u32, dpi: f64) -> Result<Self, RenderError> {
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| RenderError::canvas(format!("bad canvas size {width}x{height}")))?;
        pixmap.fill(Color::from_rgba8(255, 255, 255, 255));
        Ok(Self {
            pixmap,
            width,
            height,
            px_per_pt: (dpi / 72.0) as f32,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Figure fraction to pixel (y fraction runs up from the page bottom).
    pub fn frac_to_px(&self, fx: f64, fy: f64) -> (f32, f32) {
        (
            fx as f32 * self.width as f32,
            (1.0 - fy) as f32 * self.height as f32,
        )
    }

    /// Line width in pixels for a width given in points.
    pub fn pt(&self, points: f32) -> f32 {
        points * self.px_per_pt
    }

    /// Stroke an open polyline given in pixel coordinates.
    pub fn stroke_polyline(&mut self, pts: &[(f32, f32)], color: Color, width_px: f32) {
        self.stroke_path(pts, false, color, width_px);
    }

    /// Stroke a closed ring given in pixel coordinates.
    pub fn stroke_ring(&mut self, pts: &[(f32, f32)], color: Color, width_px: f32) {
        self.stroke_path(pts, true, color, width_px);
    }

    fn stroke_path(&mut self, pts: &[(f32, f32)], close: bool, color: Color, width_px: f32) {
        if pts.len() < 2 {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(pts[0].0, pts[0].1);
        for p in &pts[1..] {
            pb.line_to(p.0, p.1);
        }
        if close {
            pb.close();
        }
        let Some(path) = pb.finish() else { return };

        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: width_px,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Fill a closed polygon given in pixel coordinates.
    pub fn fill_polygon(&mut self, pts: &[(f32, f32)], color: Color) {
        if pts.len() < 3 {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(pts[0].0, pts[0].1);
        for p in &pts[1..] {
            pb.line_to(p.0, p.1);
        }
        pb.close();
        let Some(path) = pb.finish() else { return };

        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    /// Stroke an axis-aligned rectangle.
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, width_px: f32) {
        let pts = [(x, y), (x + w, y), (x + w, y + h), (x, y + h)];
        self.stroke_ring(&pts, color, width_px);
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let Some(rect) = Rect::from_xywh(x, y, w, h) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        let mut paint = Paint::default();
        paint.set_color(color);
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    /// Stroke a circle outline (station markers).
    pub fn stroke_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color, width_px: f32) {
        let Some(path) = PathBuilder::from_circle(cx, cy, r) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: width_px,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Fill a circle (station marker background).
    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color) {
        let Some(path) = PathBuilder::from_circle(cx, cy, r) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    /// Draw text vertically centered on `y`, horizontal anchor per `align`.
    /// Size is in points. No-op when the system has no usable font.
    pub fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        size_pt: f32,
        color: Color,
        align: TextAlign,
        bold: bool,
    ) {
        self.draw_text_rotated(text, x, y, size_pt, color, align, bold, 0.0);
    }

    /// Draw text rotated by `angle_deg` (counter-clockwise, as on the map).
    ///
    /// The anchor is the text center for `TextAlign::Center`, otherwise the
    /// center of the left/right edge. Multi-line text stacks on `\n`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text_rotated(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        size_pt: f32,
        color: Color,
        align: TextAlign,
        bold: bool,
        angle_deg: f32,
    ) {
        let font = if bold { fonts::sans_bold() } else { fonts::sans() };
        let Some(font) = font else { return };

        let size_px = self.pt(size_pt);
        let Some(cov) = rasterize(font, text, size_px) else {
            return;
        };

        let half_w = cov.width as f32 / 2.0;
        let (cx, cy) = match align {
            TextAlign::Left => (x + half_w, y),
            TextAlign::Center => (x, y),
            TextAlign::Right => (x - half_w, y),
        };
        self.blit_rotated(&cov, cx, cy, angle_deg, color);
    }

    /// Blit coverage centered at (cx, cy), rotated. Inverse-maps destination
    /// pixels so rotated text has no holes. Screen y grows downward, so a
    /// counter-clockwise map rotation is clockwise here.
    fn blit_rotated(&mut self, cov: &Coverage, cx: f32, cy: f32, angle_deg: f32, color: Color) {
        let theta = (-angle_deg).to_radians();
        let (sin_t, cos_t) = theta.sin_cos();
        let half_w = cov.width as f32 / 2.0;
        let half_h = cov.height as f32 / 2.0;

        // Destination bounding box of the rotated rectangle.
        let reach_x = half_w * cos_t.abs() + half_h * sin_t.abs();
        let reach_y = half_w * sin_t.abs() + half_h * cos_t.abs();
        let x0 = (cx - reach_x).floor().max(0.0) as i64;
        let x1 = (cx + reach_x).ceil().min(self.width as f32 - 1.0) as i64;
        let y0 = (cy - reach_y).floor().max(0.0) as i64;
        let y1 = (cy + reach_y).ceil().min(self.height as f32 - 1.0) as i64;
        if x1 < x0 || y1 < y0 {
            return;
        }

        let (r, g, b) = (
            (color.red() * 255.0) as u16,
            (color.green() * 255.0) as u16,
            (color.blue() * 255.0) as u16,
        );
        let width = self.width as usize;
        let data = self.pixmap.data_mut();

        for dy in y0..=y1 {
            for dx in x0..=x1 {
                let rx = dx as f32 + 0.5 - cx;
                let ry = dy as f32 + 0.5 - cy;
                // Inverse rotation back into coverage space.
                let sx = rx * cos_t + ry * sin_t + half_w;
                let sy = -rx * sin_t + ry * cos_t + half_h;
                if sx < 0.0 || sy < 0.0 {
                    continue;
                }
                let (u, v) = (sx as usize, sy as usize);
                if u >= cov.width || v >= cov.height {
                    continue;
                }
                let alpha = cov.data[v * cov.width + u];
                if alpha <= 0.0 {
                    continue;
                }
                let a = (alpha.min(1.0) * 255.0) as u16;
                let idx = (dy as usize * width + dx as usize) * 4;
                let px = &mut data[idx..idx + 4];
                px[0] = ((r * a + px[0] as u16 * (255 - a)) / 255) as u8;
                px[1] = ((g * a + px[1] as u16 * (255 - a)) / 255) as u8;
                px[2] = ((b * a + px[2] as u16 * (255 - a)) / 255) as u8;
                px[3] = 255;
            }
        }
    }

    /// Composite an opaque RGBA image with its top-left corner at (x, y).
    /// Used for the basemap imagery layer; drawn before any vector content.
    pub fn composite_image(&mut self, img: &image::RgbaImage, x: i64, y: i64) {
        let width = self.width as i64;
        let height = self.height as i64;
        let data = self.pixmap.data_mut();
        for (sx, sy, pixel) in img.enumerate_pixels() {
            let dx = x + sx as i64;
            let dy = y + sy as i64;
            if dx < 0 || dy < 0 || dx >= width || dy >= height {
                continue;
            }
            let a = pixel[3] as u16;
            let idx = ((dy * width + dx) * 4) as usize;
            let px = &mut data[idx..idx + 4];
            px[0] = ((pixel[0] as u16 * a + px[0] as u16 * (255 - a)) / 255) as u8;
            px[1] = ((pixel[1] as u16 * a + px[1] as u16 * (255 - a)) / 255) as u8;
            px[2] = ((pixel[2] as u16 * a + px[2] as u16 * (255 - a)) / 255) as u8;
            px[3] = 255;
        }
    }

    /// Consume the canvas into an RGBA image for encoding.
    pub fn into_image(self) -> Result<image::RgbaImage, RenderError> {
        let Self { pixmap, width, height, .. } = self;
        // The page is opaque, so premultiplied data is plain RGBA.
        image::RgbaImage::from_raw(width, height, pixmap.take())
            .ok_or_else(|| RenderError::canvas("pixmap buffer size mismatch"))
    }
}

/// Rasterize (possibly multi-line) text into a coverage buffer.
fn rasterize(font: &Font<'static>, text: &str, size_px: f32) -> Option<Coverage> {
    let scale = Scale::uniform(size_px);
    let v_metrics = font.v_metrics(scale);
    let line_height = (v_metrics.ascent - v_metrics.descent + v_metrics.line_gap).ceil();

    let lines: Vec<&str> = text.split('\n').collect();
    let mut line_widths = Vec::with_capacity(lines.len());
    for line in &lines {
        let w: f32 = font
            .layout(line, scale, rt_point(0.0, 0.0))
            .map(|g| g.unpositioned().h_metrics().advance_width)
            .sum();
        line_widths.push(w);
    }
    let width = line_widths.iter().cloned().fold(0.0_f32, f32::max).ceil() as usize;
    let height = (line_height * lines.len() as f32).ceil() as usize;
    if width == 0 || height == 0 {
        return None;
    }

    let mut data = vec![0.0_f32; width * height];
    for (i, line) in lines.iter().enumerate() {
        // Center shorter lines within the block.
        let x_off = (width as f32 - line_widths[i]) / 2.0;
        let y_off = i as f32 * line_height + v_metrics.ascent;
        for glyph in font.layout(line, scale, rt_point(x_off, y_off)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = gx as i32 + bb.min.x;
                    let py = gy as i32 + bb.min.y;
                    if px >= 0 && py >= 0 && (px as usize) < width && (py as usize) < height {
                        let cell = &mut data[py as usize * width + px as usize];
                        *cell = cell.max(v);
                    }
                });
            }
        }
    }

    Some(Coverage {
        data,
        width,
        height,
    })
}
