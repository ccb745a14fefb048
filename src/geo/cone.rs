use serde::{Deserialize, Serialize};

use crate::models::{GeoPoint, WindObservation};

use super::bearing::{cardinal_direction, compute_destination};

/// Half-angle of the cone on each side of the wind bearing. Fixed.
pub const CONE_HALF_SPREAD_DEGREES: f64 = 15.0;
pub const DEFAULT_CONE_DISTANCE_KM: f64 = 2.0;

/// Triangular downwind hazard region. Recomputed per wind observation, never patched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DispersionCone {
    pub origin: GeoPoint,
    pub left_edge: GeoPoint,
    pub right_edge: GeoPoint,
    pub cardinal_label: String,
}

impl DispersionCone {
    /// Polygon vertices in drawing order: origin, left edge, right edge.
    pub fn points(&self) -> [GeoPoint; 3] {
        [self.origin, self.left_edge, self.right_edge]
    }
}

/// Build the cone pointing toward `wind.bearing_degrees`.
///
/// The cone is drawn along the reported bearing itself, not its reciprocal.
/// Callers skip this entirely when no wind observation is available.
pub fn compute_dispersion_cone(
    origin: GeoPoint,
    wind: &WindObservation,
    distance_km: f64,
) -> DispersionCone {
    let center = wind.bearing_degrees.to_radians();
    let spread = CONE_HALF_SPREAD_DEGREES.to_radians();

    DispersionCone {
        origin,
        left_edge: compute_destination(origin, center - spread, distance_km),
        right_edge: compute_destination(origin, center + spread, distance_km),
        cardinal_label: cardinal_direction(wind.bearing_degrees).to_string(),
    }
}
