//! Great-circle destination and compass naming on a spherical Earth.
//!
//! No ellipsoidal correction: at cone lengths of a couple of kilometres the
//! error is far below what the map overlay can show.

use std::f64::consts::TAU;

use crate::models::GeoPoint;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

const COMPASS_POINTS: [&str; 8] = [
    "North",
    "North-East",
    "East",
    "South-East",
    "South",
    "South-West",
    "West",
    "North-West",
];

/// Point reached by travelling `distance_km` from `origin` along the great
/// circle leaving it at `bearing_radians` (clockwise from North).
///
/// Any bearing is accepted and reduced modulo 2π. Negative or non-finite
/// distances are treated as zero and return `origin` unchanged.
pub fn compute_destination(origin: GeoPoint, bearing_radians: f64, distance_km: f64) -> GeoPoint {
    if !(distance_km > 0.0) || !distance_km.is_finite() {
        return origin;
    }

    let bearing = bearing_radians.rem_euclid(TAU);
    let angular = distance_km / EARTH_RADIUS_KM;
    let lat1 = origin.latitude.to_radians();
    let lon1 = origin.longitude.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(lat2.to_degrees(), wrap_longitude(lon2.to_degrees()))
}

/// Eight-point compass name for a bearing in degrees.
///
/// The bearing is normalized first so values near 360 (and negative ones)
/// land on a valid sector.
pub fn cardinal_direction(bearing_degrees: f64) -> &'static str {
    let normalized = if bearing_degrees.is_finite() {
        bearing_degrees.rem_euclid(360.0)
    } else {
        0.0
    };
    let index = (normalized / 45.0).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[index]
}

/// Great-circle distance between two points.
pub fn haversine_distance_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Initial bearing in degrees `[0, 360)` of the great circle from `from` to `to`.
pub fn initial_bearing_degrees(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}

fn wrap_longitude(longitude: f64) -> f64 {
    if longitude > 180.0 {
        longitude - 360.0
    } else if longitude < -180.0 {
        longitude + 360.0
    } else {
        longitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn zero_distance_returns_origin() {
        let origin = GeoPoint::new(51.5, -0.12);
        for bearing in [0.0, 45.0, 90.0, 181.0, 359.9] {
            let dest = compute_destination(origin, f64::to_radians(bearing), 0.0);
            assert!((dest.latitude - origin.latitude).abs() < EPS);
            assert!((dest.longitude - origin.longitude).abs() < EPS);
        }
    }

    #[test]
    fn negative_distance_degenerates_to_origin() {
        let origin = GeoPoint::new(10.0, 20.0);
        assert_eq!(compute_destination(origin, 1.0, -3.0), origin);
    }

    #[test]
    fn due_north_moves_latitude_only() {
        let origin = GeoPoint::new(0.0, 0.0);
        let dest = compute_destination(origin, 0.0, 111.19);
        assert!((dest.latitude - 1.0).abs() < 1e-3);
        assert!(dest.longitude.abs() < EPS);
    }

    #[test]
    fn bearing_is_taken_modulo_full_turn() {
        let origin = GeoPoint::new(40.0, -74.0);
        let a = compute_destination(origin, 1.0, 5.0);
        let b = compute_destination(origin, 1.0 + TAU * 3.0, 5.0);
        let c = compute_destination(origin, 1.0 - TAU, 5.0);
        assert!((a.latitude - b.latitude).abs() < 1e-9 && (a.longitude - b.longitude).abs() < 1e-9);
        assert!((a.latitude - c.latitude).abs() < 1e-9 && (a.longitude - c.longitude).abs() < 1e-9);
    }

    #[test]
    fn destination_round_trips_through_distance_and_bearing() {
        let origin = GeoPoint::new(-33.86, 151.2);
        let dest = compute_destination(origin, f64::to_radians(200.0), 2.0);
        assert!((haversine_distance_km(origin, dest) - 2.0).abs() < 1e-6);
        assert!((initial_bearing_degrees(origin, dest) - 200.0).abs() < 1e-3);
    }

    #[test]
    fn longitude_wraps_across_antimeridian() {
        let origin = GeoPoint::new(0.0, 179.99);
        let dest = compute_destination(origin, f64::to_radians(90.0), 10.0);
        assert!(dest.longitude < -179.0);
        assert!(dest.is_valid());
    }

    #[test]
    fn cardinal_names_follow_rounded_sectors() {
        assert_eq!(cardinal_direction(0.0), "North");
        assert_eq!(cardinal_direction(90.0), "East");
        assert_eq!(cardinal_direction(359.0), "North");
        assert_eq!(cardinal_direction(22.0), "North");
        assert_eq!(cardinal_direction(23.0), "North-East");
        assert_eq!(cardinal_direction(46.0), "North-East");
        assert_eq!(cardinal_direction(180.0), "South");
        assert_eq!(cardinal_direction(270.0), "West");
        assert_eq!(cardinal_direction(315.0), "North-West");
    }

    #[test]
    fn cardinal_boundary_follows_rounding_not_truncation() {
        // Sector edges sit at 22.5 + 45k, so 44 and 45 both round into North-East.
        assert_eq!(cardinal_direction(22.5), "North-East");
        assert_eq!(cardinal_direction(44.0), "North-East");
        assert_eq!(cardinal_direction(45.0), "North-East");
        assert_eq!(cardinal_direction(67.4), "North-East");
        assert_eq!(cardinal_direction(67.5), "East");
    }

    #[test]
    fn cardinal_normalizes_out_of_range_bearings() {
        assert_eq!(cardinal_direction(-90.0), "West");
        assert_eq!(cardinal_direction(360.0), "North");
        assert_eq!(cardinal_direction(450.0), "East");
        assert_eq!(cardinal_direction(f64::NAN), "North");
    }
}
