use geo::{Distance, Geodesic, Point};

use super::types::GeoPoint;

/// Geodesic (WGS-84 ellipsoid) distance between two points, in kilometres.
#[must_use]
pub fn geodesic_distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let from = Point::new(a.longitude, a.latitude);
    let to = Point::new(b.longitude, b.latitude);
    Geodesic::distance(from, to) / 1_000.0
}

/// Arithmetic mean of `points`, or `None` for an empty slice.
#[must_use]
pub fn mean_center(points: &[GeoPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }
    let count = points.len() as f64;
    let (lat_sum, lon_sum) = points.iter().fold((0.0, 0.0), |(lat, lon), point| {
        (lat + point.latitude, lon + point.longitude)
    });
    Some(GeoPoint {
        latitude: lat_sum / count,
        longitude: lon_sum / count,
    })
}
