use geo::{polygon, Area};
use plankit_survey::{compute_traverse, normalize_plot, Dms};

/// 100 m square in planar meters, counter-clockwise, closed.
fn square_100m() -> geo::Polygon<f64> {
    polygon![
        (x: 0.0, y: 0.0),
        (x: 0.0, y: 100.0),
        (x: 100.0, y: 100.0),
        (x: 100.0, y: 0.0),
        (x: 0.0, y: 0.0),
    ]
}

#[test]
fn test_ring_of_n_vertices_yields_n_minus_one_rows() {
    let square = square_100m();
    let traverse = compute_traverse(&square, &[]);
    assert_eq!(square.exterior().0.len(), 5);
    assert_eq!(traverse.rows.len(), 4);
}

#[test]
fn test_back_bearing_is_exact_complement() {
    let traverse = compute_traverse(&square_100m(), &[]);
    for row in &traverse.rows {
        let diff = (row.back_deg - row.forward_deg).rem_euclid(360.0);
        assert_eq!(diff, 180.0, "edge {}-{}", row.from_station, row.to_station);
    }
}

#[test]
fn test_square_traverse_end_to_end() {
    let square = square_100m();
    let traverse = compute_traverse(&square, &[]);

    assert_eq!(traverse.rows.len(), 4);
    for row in &traverse.rows {
        assert!((row.distance - 100.0).abs() < 1e-9);
    }

    // Edge bearings walk N, E, S, W for this vertex order.
    let bearings: Vec<f64> = traverse.rows.iter().map(|r| r.forward_deg).collect();
    assert!((bearings[0] - 0.0).abs() < 1e-9);
    assert!((bearings[1] - 90.0).abs() < 1e-9);
    assert!((bearings[2] - 180.0).abs() < 1e-9);
    assert!((bearings[3] - 270.0).abs() < 1e-9);

    assert!(traverse.closure.sum_delta_e.abs() < 1e-6);
    assert!(traverse.closure.sum_delta_n.abs() < 1e-6);
    assert!(traverse.closure.is_closed(1e-6));

    assert!((square.unsigned_area() - 10_000.0).abs() < 1e-6);
}

#[test]
fn test_closure_vanishes_for_irregular_ring() {
    let irregular = polygon![
        (x: 12.5, y: -3.0),
        (x: 86.2, y: 14.9),
        (x: 77.0, y: 93.4),
        (x: -8.1, y: 61.7),
        (x: 12.5, y: -3.0),
    ];
    let traverse = compute_traverse(&irregular, &[]);
    assert!(traverse.closure.sum_delta_e.abs() < 1e-6);
    assert!(traverse.closure.sum_delta_n.abs() < 1e-6);
}

#[test]
fn test_dms_round_trip_within_hundredth_arcsecond() {
    // 0.01 arc-second in degrees.
    let tolerance = 0.01 / 3600.0;
    for &angle in &[0.0, 0.004, 45.5, 89.999, 123.456789, 270.0, 359.9999] {
        let round_tripped = Dms::from_degrees(angle).to_degrees();
        assert!(
            (round_tripped - angle).abs() < tolerance,
            "angle {angle} round-tripped to {round_tripped}"
        );
    }
}

#[test]
fn test_station_names_wrap_when_shorter_than_ring() {
    let names = vec!["P1".to_string(), "P2".to_string()];
    let traverse = compute_traverse(&square_100m(), &names);
    assert_eq!(traverse.rows[0].from_station, "P1");
    assert_eq!(traverse.rows[0].to_station, "P2");
    assert_eq!(traverse.rows[1].from_station, "P2");
    assert_eq!(traverse.rows[1].to_station, "P1");
}

#[test]
fn test_input_polygon_not_mutated() {
    let square = square_100m();
    let before = square.clone();
    let _ = compute_traverse(&square, &[]);
    assert_eq!(square, before);
}

#[test]
fn test_normalized_plot_feeds_traverse() {
    // A small geographic square near the equator survives the pipeline.
    let d = 0.001_f64;
    let geographic = polygon![
        (x: 7.0, y: 5.0),
        (x: 7.0, y: 5.0 + d),
        (x: 7.0 + d, y: 5.0 + d),
        (x: 7.0 + d, y: 5.0),
        (x: 7.0, y: 5.0),
    ];
    let normalized = normalize_plot(&geographic).unwrap();
    let traverse = compute_traverse(&normalized.polygon, &[]);
    assert_eq!(traverse.rows.len(), 4);
    assert!(traverse.closure.is_closed(1e-6));
    assert!(normalized.area_m2 > 0.0);
}
