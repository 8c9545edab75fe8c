//! Traverse back-computation.
//!
//! Walks the boundary ring edge by edge, producing one [`TraverseRow`] per
//! edge (bearings, distance, coordinate deltas) and a [`ClosureSummary`] of
//! the accumulated deltas. For a correctly closed ring the closure sums
//! vanish; residuals indicate digitizing error in the input and are reported
//! as-is, never corrected.
//!
//! Bearings are survey azimuths: 0° at grid north, increasing clockwise, so
//! the east component is the *first* argument to `atan2`.

use std::fmt;

use geo::Polygon;
use serde::{Deserialize, Serialize};

/// Forward bearing from one planar coordinate to another, decimal degrees
/// in [0, 360).
pub fn bearing_deg(from: (f64, f64), to: (f64, f64)) -> f64 {
    let de = to.0 - from.0;
    let dn = to.1 - from.1;
    (de.atan2(dn).to_degrees() + 360.0) % 360.0
}

/// An angle in degrees-minutes-seconds form.
///
/// Seconds keep full precision; [`fmt::Display`] rounds to 2 decimals of
/// arc-second, the precision surveyors quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dms {
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
}

impl Dms {
    /// Split a decimal angle into DMS, normalizing into [0, 360) first.
    pub fn from_degrees(angle_deg: f64) -> Self {
        let normalized = angle_deg.rem_euclid(360.0);
        let degrees = normalized.trunc() as u32;
        let minutes_float = (normalized - degrees as f64) * 60.0;
        let minutes = minutes_float.trunc() as u32;
        let seconds = (minutes_float - minutes as f64) * 60.0;
        Self {
            degrees,
            minutes,
            seconds,
        }
    }

    /// Back to decimal degrees.
    pub fn to_degrees(self) -> f64 {
        self.degrees as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:03}\u{00b0}{:02}'{:05.2}\"",
            self.degrees, self.minutes, self.seconds
        )
    }
}

/// One edge of the traverse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraverseRow {
    /// Station label of the origin vertex.
    pub from_station: String,
    /// Station label of the destination vertex.
    pub to_station: String,
    /// Easting of the origin vertex, meters.
    pub easting: f64,
    /// Northing of the origin vertex, meters.
    pub northing: f64,
    /// Easting change along the edge.
    pub delta_e: f64,
    /// Northing change along the edge.
    pub delta_n: f64,
    /// Edge length, meters.
    pub distance: f64,
    /// Forward bearing, decimal degrees in [0, 360).
    pub forward_deg: f64,
    /// Back bearing, exactly (forward + 180) mod 360.
    pub back_deg: f64,
}

impl TraverseRow {
    pub fn forward_dms(&self) -> Dms {
        Dms::from_degrees(self.forward_deg)
    }

    pub fn back_dms(&self) -> Dms {
        Dms::from_degrees(self.back_deg)
    }
}

/// Accumulated coordinate deltas over the whole traverse.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ClosureSummary {
    pub sum_delta_e: f64,
    pub sum_delta_n: f64,
}

impl ClosureSummary {
    /// Whether both residuals are within the given tolerance of zero.
    pub fn is_closed(&self, tolerance: f64) -> bool {
        self.sum_delta_e.abs() <= tolerance && self.sum_delta_n.abs() <= tolerance
    }
}

/// The full back-computation result for one boundary ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Traverse {
    pub rows: Vec<TraverseRow>,
    pub closure: ClosureSummary,
}

/// Station label for vertex `index`.
///
/// With an explicit name list the index wraps modulo the list length; the
/// list does not need to match the vertex count. An empty list falls back to
/// letters A..Z cycling modulo 26.
pub fn station_label(names: &[String], index: usize) -> String {
    if names.is_empty() {
        let letter = (b'A' + (index % 26) as u8) as char;
        letter.to_string()
    } else {
        names[index % names.len()].clone()
    }
}

/// Back-compute the traverse of a projected (planar-meter) boundary ring.
///
/// Produces one row per edge: a closed ring of N coordinates yields N-1 rows.
/// The input polygon is not mutated.
pub fn compute_traverse(polygon: &Polygon<f64>, station_names: &[String]) -> Traverse {
    let coords = &polygon.exterior().0;
    let mut rows = Vec::with_capacity(coords.len().saturating_sub(1));
    let mut closure = ClosureSummary::default();

    for i in 0..coords.len().saturating_sub(1) {
        let p1 = coords[i];
        let p2 = coords[i + 1];

        let delta_e = p2.x - p1.x;
        let delta_n = p2.y - p1.y;
        let distance = delta_e.hypot(delta_n);
        let forward_deg = bearing_deg((p1.x, p1.y), (p2.x, p2.y));
        let back_deg = (forward_deg + 180.0) % 360.0;

        closure.sum_delta_e += delta_e;
        closure.sum_delta_n += delta_n;

        rows.push(TraverseRow {
            from_station: station_label(station_names, i),
            to_station: station_label(station_names, i + 1),
            easting: p1.x,
            northing: p1.y,
            delta_e,
            delta_n,
            distance,
            forward_deg,
            back_deg,
        });
    }

    Traverse { rows, closure }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_bearings() {
        assert!((bearing_deg((0.0, 0.0), (0.0, 1.0)) - 0.0).abs() < 1e-12);
        assert!((bearing_deg((0.0, 0.0), (1.0, 0.0)) - 90.0).abs() < 1e-12);
        assert!((bearing_deg((0.0, 0.0), (0.0, -1.0)) - 180.0).abs() < 1e-12);
        assert!((bearing_deg((0.0, 0.0), (-1.0, 0.0)) - 270.0).abs() < 1e-12);
    }

    #[test]
    fn dms_display_format() {
        let dms = Dms::from_degrees(123.755);
        assert_eq!(dms.degrees, 123);
        assert_eq!(dms.minutes, 45);
        let text = dms.to_string();
        assert!(text.starts_with("123\u{00b0}45'"), "got {text}");
    }

    #[test]
    fn dms_normalizes_negative_angles() {
        let dms = Dms::from_degrees(-90.0);
        assert_eq!(dms.degrees, 270);
        assert_eq!(dms.minutes, 0);
    }

    #[test]
    fn default_stations_cycle_past_z() {
        assert_eq!(station_label(&[], 0), "A");
        assert_eq!(station_label(&[], 25), "Z");
        assert_eq!(station_label(&[], 26), "A");
    }

    #[test]
    fn explicit_stations_wrap() {
        let names = vec!["SB1".to_string(), "SB2".to_string(), "SB3".to_string()];
        assert_eq!(station_label(&names, 0), "SB1");
        assert_eq!(station_label(&names, 3), "SB1");
        assert_eq!(station_label(&names, 4), "SB2");
    }
}
