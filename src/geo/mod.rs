//! Geodesic helpers for the wind hazard overlay.
//!
//! Re-exports only. All logic in submodules.

mod bearing;
mod cone;

pub use bearing::{
    cardinal_direction, compute_destination, haversine_distance_km, initial_bearing_degrees,
    EARTH_RADIUS_KM,
};
pub use cone::{compute_dispersion_cone, DispersionCone, CONE_HALF_SPREAD_DEGREES, DEFAULT_CONE_DISTANCE_KM};
