use std::path::Path;

use approx::assert_relative_eq;
use serde_json::{Value, json};
use wardrive_rs::ScanError;
use wardrive_rs::api::{
    DEFAULT_JUMP_THRESHOLD_KM, Diagnostic, RouteBuilder, RouteReconstructor, Step, filter_jumps,
};
use wardrive_rs::core::{GeoPoint, RawEntry, RecordNormalizer, geodesic_distance_km};

fn point(latitude: f64, longitude: f64) -> GeoPoint {
    GeoPoint::new(latitude, longitude).expect("valid point")
}

fn located(latitude: f64, longitude: f64) -> RawEntry {
    match json!({ "ssid": "s", "location": [longitude, latitude] }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[test]
fn distant_outlier_is_rejected_and_route_resumes() {
    let a = point(51.0, 4.0);
    let b = point(51.01, 4.01);
    let c = point(60.0, 10.0);
    let d = point(51.02, 4.02);
    let route = filter_jumps(&[a, b, c, d], DEFAULT_JUMP_THRESHOLD_KM).expect("route");
    assert_eq!(route, vec![a, b, d]);
}

#[test]
fn rejected_point_never_becomes_the_anchor() {
    let mut builder = RouteBuilder::new(DEFAULT_JUMP_THRESHOLD_KM).expect("builder");
    let a = point(51.0, 4.0);
    let far = point(60.0, 10.0);
    let near_far = point(60.01, 10.01);

    assert_eq!(builder.offer(a), Step::Accepted);
    assert!(matches!(builder.offer(far), Step::Rejected { anchor, .. } if anchor == a));
    assert_eq!(builder.anchor(), Some(a));
    // Close to the rejected point, still far from the anchor.
    assert!(matches!(builder.offer(near_far), Step::Rejected { anchor, .. } if anchor == a));
    assert_eq!(builder.finish(), vec![a]);
}

#[test]
fn first_point_is_always_accepted() {
    let far = point(-33.86, 151.2);
    assert_eq!(
        filter_jumps(&[far], DEFAULT_JUMP_THRESHOLD_KM).expect("route"),
        vec![far]
    );
    assert!(filter_jumps(&[], DEFAULT_JUMP_THRESHOLD_KM)
        .expect("route")
        .is_empty());
}

#[test]
fn step_exactly_at_threshold_is_accepted() {
    let a = point(51.0, 4.0);
    let b = point(51.1, 4.0);
    let distance = geodesic_distance_km(a, b);
    let route = filter_jumps(&[a, b], distance).expect("route");
    assert_eq!(route.len(), 2);
}

#[test]
fn invalid_thresholds_are_rejected() {
    for threshold in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            RouteBuilder::new(threshold),
            Err(ScanError::InvalidConfig(_))
        ));
    }
}

#[test]
fn reconstruct_reports_jumps_and_invalid_coordinates() {
    let entries = vec![
        located(51.0, 4.0),
        match json!({ "ssid": "no-fix" }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        },
        located(95.0, 4.0),
        located(60.0, 10.0),
        located(51.01, 4.01),
    ];
    let outcome =
        RouteReconstructor::default().reconstruct(Path::new("walk.json"), &entries);
    assert_eq!(outcome.route.points, vec![point(51.0, 4.0), point(51.01, 4.01)]);
    assert_eq!(outcome.diagnostics.len(), 2);
    assert!(matches!(
        outcome.diagnostics[0],
        Diagnostic::InvalidCoordinate { index: 2, .. }
    ));
    let Diagnostic::JumpRejected {
        index,
        from,
        to,
        distance_km,
        ..
    } = &outcome.diagnostics[1]
    else {
        panic!("expected jump rejection");
    };
    assert_eq!(*index, 3);
    assert_eq!(*from, point(51.0, 4.0));
    assert_eq!(*to, point(60.0, 10.0));
    assert!(*distance_km > DEFAULT_JUMP_THRESHOLD_KM);
}

#[test]
fn custom_threshold_is_honoured() {
    let reconstructor =
        RouteReconstructor::new(RecordNormalizer::default(), 0.5).expect("reconstructor");
    let entries = vec![located(51.0, 4.0), located(51.01, 4.01)];
    let outcome = reconstructor.reconstruct(Path::new("short.json"), &entries);
    assert_eq!(outcome.route.len(), 1);
    assert_relative_eq!(reconstructor.threshold_km(), 0.5);
}

#[test]
fn route_length_sums_consecutive_steps() {
    let entries = vec![located(51.0, 4.0), located(51.01, 4.01), located(51.02, 4.02)];
    let route = RouteReconstructor::default()
        .reconstruct(Path::new("len.json"), &entries)
        .route;
    let expected = geodesic_distance_km(point(51.0, 4.0), point(51.01, 4.01))
        + geodesic_distance_km(point(51.01, 4.01), point(51.02, 4.02));
    assert_relative_eq!(route.length_km(), expected, epsilon = 1e-9);
}

#[test]
fn geodesic_distance_matches_known_value() {
    // Brussels -> Antwerp, roughly 41 km.
    let brussels = point(50.8503, 4.3517);
    let antwerp = point(51.2194, 4.4025);
    let distance = geodesic_distance_km(brussels, antwerp);
    assert_relative_eq!(distance, 41.2, epsilon = 0.5);
}
