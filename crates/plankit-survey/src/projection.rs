//! Geometry normalization: geographic coordinates to planar meters.
//!
//! Boundary rings and feature geometries arrive in geographic lon/lat
//! (EPSG:4326) and are reprojected onto the spherical Web Mercator plane
//! (EPSG:3857) so that traverse distances, areas, and the true-scale extent
//! are all computed in meters. The transform is pure; inputs are never
//! mutated.

use geo::{Area, BoundingRect, Centroid, Coord, Geometry, MapCoords, Point, Polygon, Rect};
use plankit_core::{PlanError, Result};

/// Mean equatorial radius of the WGS84 spheroid, meters.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude bound of the square Web Mercator plane.
const MAX_LATITUDE_DEG: f64 = 85.051_128_78;

/// Coordinate tolerance for ring-closure and vertex-distinctness checks,
/// in degrees (about 0.1 mm on the ground).
const COORD_EPS: f64 = 1e-9;

/// A plot boundary reprojected to planar meters, with derived measures.
#[derive(Debug, Clone)]
pub struct NormalizedPlot {
    /// Boundary polygon in Web Mercator meters.
    pub polygon: Polygon<f64>,
    /// Unsigned polygon area, square meters.
    pub area_m2: f64,
    /// Polygon centroid, meters.
    pub centroid: Point<f64>,
    /// Axis-aligned bounds, meters.
    pub bounds: Rect<f64>,
}

/// Project a single geographic coordinate to Web Mercator meters.
pub fn project_coord(c: Coord<f64>) -> Coord<f64> {
    let lat = c.y.clamp(-MAX_LATITUDE_DEG, MAX_LATITUDE_DEG);
    Coord {
        x: EARTH_RADIUS_M * c.x.to_radians(),
        y: EARTH_RADIUS_M * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln(),
    }
}

/// Project any supported geometry to Web Mercator meters.
pub fn project_geometry(geometry: &Geometry<f64>) -> Geometry<f64> {
    geometry.map_coords(project_coord)
}

/// Validate a boundary ring and project it to planar meters.
///
/// # Errors
///
/// Returns [`PlanError::InvalidGeometry`] if the exterior ring has fewer than
/// 4 coordinate pairs, is not closed, or has fewer than 3 distinct vertices.
pub fn normalize_plot(boundary: &Polygon<f64>) -> Result<NormalizedPlot> {
    validate_ring(boundary)?;

    let polygon = boundary.map_coords(project_coord);
    let area_m2 = polygon.unsigned_area();
    let centroid = polygon
        .centroid()
        .ok_or_else(|| PlanError::invalid_geometry("boundary has no centroid"))?;
    let bounds = polygon
        .bounding_rect()
        .ok_or_else(|| PlanError::invalid_geometry("boundary has no bounds"))?;

    Ok(NormalizedPlot {
        polygon,
        area_m2,
        centroid,
        bounds,
    })
}

fn validate_ring(boundary: &Polygon<f64>) -> Result<()> {
    let ring = &boundary.exterior().0;
    if ring.len() < 4 {
        return Err(PlanError::invalid_geometry(format!(
            "boundary ring has {} coordinates, need at least 4",
            ring.len()
        )));
    }

    let first = ring[0];
    let last = ring[ring.len() - 1];
    if (first.x - last.x).abs() > COORD_EPS || (first.y - last.y).abs() > COORD_EPS {
        return Err(PlanError::invalid_geometry("boundary ring is not closed"));
    }

    // Rings are small; a quadratic distinctness scan is fine.
    let mut distinct: Vec<Coord<f64>> = Vec::new();
    for c in &ring[..ring.len() - 1] {
        if !distinct
            .iter()
            .any(|d| (d.x - c.x).abs() <= COORD_EPS && (d.y - c.y).abs() <= COORD_EPS)
        {
            distinct.push(*c);
        }
    }
    if distinct.len() < 3 {
        return Err(PlanError::invalid_geometry(format!(
            "boundary ring has {} distinct vertices, need at least 3",
            distinct.len()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn accepts_auto_closed_ring() {
        // Polygon construction closes open rings, so this passes validation.
        let open = polygon![(x: 0.0, y: 0.0), (x: 0.001, y: 0.0), (x: 0.001, y: 0.001), (x: 0.0, y: 0.002)];
        assert!(normalize_plot(&open).is_ok());
    }

    #[test]
    fn rejects_too_short_ring() {
        let ring = geo::LineString::from(vec![(0.0, 0.0), (0.001, 0.0), (0.0, 0.0)]);
        let poly = Polygon::new(ring, vec![]);
        assert!(normalize_plot(&poly).is_err());
    }

    #[test]
    fn rejects_degenerate_ring() {
        let ring = geo::LineString::from(vec![(0.0, 0.0), (0.001, 0.0), (0.0, 0.0), (0.0, 0.0)]);
        let poly = Polygon::new(ring, vec![]);
        let err = normalize_plot(&poly).unwrap_err();
        assert!(err.is_geometry_error());
    }

    #[test]
    fn equator_projection_scale_is_unity() {
        // At the equator one degree of longitude is R * pi/180 meters.
        let c = project_coord(Coord { x: 1.0, y: 0.0 });
        let expected = EARTH_RADIUS_M * 1.0_f64.to_radians();
        assert!((c.x - expected).abs() < 1e-6);
        assert!(c.y.abs() < 1e-6);
    }

    #[test]
    fn area_and_centroid_of_projected_square() {
        // A tiny square at the equator projects to a near-square in meters.
        let d = 0.0001_f64;
        let poly = polygon![
            (x: 0.0, y: 0.0),
            (x: d, y: 0.0),
            (x: d, y: d),
            (x: 0.0, y: d),
            (x: 0.0, y: 0.0),
        ];
        let normalized = normalize_plot(&poly).unwrap();
        let side = EARTH_RADIUS_M * d.to_radians();
        let expected_area = side * side;
        // Mercator distortion at this scale is far below 0.1%.
        assert!((normalized.area_m2 - expected_area).abs() / expected_area < 1e-3);
        assert!(normalized.bounds.width() > 0.0);
        assert!(normalized.centroid.x() > 0.0);
    }
}
