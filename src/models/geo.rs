use serde::{Deserialize, Serialize};

/// A location fix on the WGS84 sphere, in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both coordinates are finite and inside their ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Wind as reported by the weather feed for one fetch cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WindObservation {
    /// Degrees clockwise from North, `[0, 360)`.
    pub bearing_degrees: f64,
    pub speed_kmh: f64,
}

impl WindObservation {
    pub fn new(bearing_degrees: f64, speed_kmh: f64) -> Self {
        Self {
            bearing_degrees,
            speed_kmh,
        }
    }
}
