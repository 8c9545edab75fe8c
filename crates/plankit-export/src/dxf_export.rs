//! CAD vector export.
//!
//! Writes the survey plan as a self-contained DXF in meters: fixed layer
//! table with AutoCAD color indices, the boundary and features as line
//! segment chains, per-edge bearing/distance text rotated along each edge,
//! the plot label at the centroid, and a coordinate grid with periodic axis
//! labels.

use std::path::Path;

use dxf::entities::{Entity, EntityType, Line as DxfLine, Text as DxfText};
use dxf::enums::Units;
use dxf::tables::Layer;
use dxf::{Color as DxfColor, Drawing, Point as DxfPoint};
use geo::{BoundingRect, Centroid, Geometry, LineString};
use tracing::debug;

use plankit_render::RenderModel;
use plankit_survey::nice_grid_step;

use crate::error::{ExportError, Result};

/// Layer table: name and AutoCAD color index.
const LAYERS: [(&str, u8); 7] = [
    ("PLOT", 1),
    ("BUILDINGS", 7),
    ("ROADS", 8),
    ("RIVERS", 5),
    ("GRID", 4),
    ("COORDS", 4),
    ("TEXT", 2),
];

/// Fixed text height for coordinate labels, meters.
const COORD_TEXT_H: f64 = 2.5;

fn add_layers(drawing: &mut Drawing) {
    for (name, color) in LAYERS {
        let mut layer = Layer::default();
        layer.name = name.to_string();
        layer.color = DxfColor::from_index(color);
        drawing.add_layer(layer);
    }
}

fn add_segment(drawing: &mut Drawing, layer: &str, p1: (f64, f64), p2: (f64, f64)) {
    let line = DxfLine::new(
        DxfPoint::new(p1.0, p1.1, 0.0),
        DxfPoint::new(p2.0, p2.1, 0.0),
    );
    let mut entity = Entity::new(EntityType::Line(line));
    entity.common.layer = layer.to_string();
    drawing.add_entity(entity);
}

fn add_text(drawing: &mut Drawing, layer: &str, text: &str, x: f64, y: f64, height: f64, rotation_deg: f64) {
    let mut dxf_text = DxfText::default();
    dxf_text.value = text.to_string();
    dxf_text.location = DxfPoint::new(x, y, 0.0);
    dxf_text.text_height = height;
    dxf_text.rotation = rotation_deg;
    let mut entity = Entity::new(EntityType::Text(dxf_text));
    entity.common.layer = layer.to_string();
    drawing.add_entity(entity);
}

/// A linestring becomes a chain of LINE entities.
fn add_chain(drawing: &mut Drawing, layer: &str, line: &LineString<f64>) {
    for pair in line.0.windows(2) {
        add_segment(drawing, layer, (pair[0].x, pair[0].y), (pair[1].x, pair[1].y));
    }
}

/// Feature geometries: lines as chains, polygons as closed ring chains.
fn add_feature(drawing: &mut Drawing, layer: &str, geometry: &Geometry<f64>) {
    match geometry {
        Geometry::LineString(line) => add_chain(drawing, layer, line),
        Geometry::MultiLineString(lines) => {
            for line in &lines.0 {
                add_chain(drawing, layer, line);
            }
        }
        Geometry::Polygon(poly) => add_chain(drawing, layer, poly.exterior()),
        Geometry::MultiPolygon(polys) => {
            for poly in &polys.0 {
                add_chain(drawing, layer, poly.exterior());
            }
        }
        _ => {}
    }
}

/// Grid lines over the boundary bounds at the chosen spacing, with easting
/// labels above the grid and northing labels rotated upright on both sides.
fn add_grid(drawing: &mut Drawing, model: &RenderModel) {
    let Some(bounds) = model.boundary.bounding_rect() else {
        return;
    };
    let span = bounds.width().max(bounds.height());
    let spacing = nice_grid_step(span);

    let gx_min = (bounds.min().x / spacing).floor() * spacing;
    let gx_max = (bounds.max().x / spacing).ceil() * spacing;
    let gy_min = (bounds.min().y / spacing).floor() * spacing;
    let gy_max = (bounds.max().y / spacing).ceil() * spacing;

    let mut x = gx_min;
    while x <= gx_max {
        add_segment(drawing, "GRID", (x, gy_min), (x, gy_max));
        add_text(
            drawing,
            "COORDS",
            &format!("{}", x.round() as i64),
            x,
            gy_max + spacing * 0.25,
            COORD_TEXT_H,
            0.0,
        );
        x += spacing;
    }

    let mut y = gy_min;
    while y <= gy_max {
        add_segment(drawing, "GRID", (gx_min, y), (gx_max, y));
        let label = format!("{}", y.round() as i64);
        add_text(drawing, "COORDS", &label, gx_min - spacing * 0.25, y, COORD_TEXT_H, 90.0);
        add_text(drawing, "COORDS", &label, gx_max + spacing * 0.25, y, COORD_TEXT_H, 90.0);
        y += spacing;
    }
}

/// Write the survey plan DXF for an assembled render model.
pub fn export_survey_dxf(model: &RenderModel, out: &Path) -> Result<()> {
    let mut drawing = Drawing::new();
    drawing.header.default_drawing_units = Units::Meters;
    add_layers(&mut drawing);

    // Boundary ring on PLOT.
    add_chain(&mut drawing, "PLOT", model.boundary.exterior());

    // Bearing + distance along each edge, kept upright.
    let coords = &model.boundary.exterior().0;
    for (i, row) in model.traverse.rows.iter().enumerate() {
        let p1 = coords[i];
        let p2 = coords[i + 1];
        let mid_x = (p1.x + p2.x) / 2.0;
        let mid_y = (p1.y + p2.y) / 2.0;

        let mut angle = (p2.y - p1.y).atan2(p2.x - p1.x).to_degrees();
        if angle > 90.0 {
            angle -= 180.0;
        } else if angle <= -90.0 {
            angle += 180.0;
        }

        add_text(
            &mut drawing,
            "TEXT",
            &format!("{:.1}\u{00b0}  {:.1}m", row.forward_deg, row.distance),
            mid_x,
            mid_y,
            3.0,
            angle,
        );
    }

    // Plot label at the centroid.
    if let Some(centroid) = model.boundary.centroid() {
        add_text(
            &mut drawing,
            "TEXT",
            &format!("PLOT {}", model.plot_id),
            centroid.x(),
            centroid.y(),
            6.0,
            0.0,
        );
    }

    for road in &model.roads {
        add_feature(&mut drawing, "ROADS", road);
    }
    for river in &model.rivers {
        add_feature(&mut drawing, "RIVERS", river);
    }
    for building in &model.buildings {
        add_feature(&mut drawing, "BUILDINGS", building);
    }

    add_grid(&mut drawing, model);

    let path_str = out
        .to_str()
        .ok_or_else(|| ExportError::Io(std::io::Error::other("non-UTF-8 output path")))?;
    drawing.save_file(path_str)?;
    debug!(path = %out.display(), "survey plan DXF written");
    Ok(())
}
