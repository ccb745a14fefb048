use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum AqiCategory {
    Good,
    Moderate,
    SensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// US AQI band for a 0-500 index.
    pub fn from_aqi(aqi: f64) -> Self {
        if aqi > 300.0 {
            AqiCategory::Hazardous
        } else if aqi > 200.0 {
            AqiCategory::VeryUnhealthy
        } else if aqi > 150.0 {
            AqiCategory::Unhealthy
        } else if aqi > 100.0 {
            AqiCategory::SensitiveGroups
        } else if aqi > 50.0 {
            AqiCategory::Moderate
        } else {
            AqiCategory::Good
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::SensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    fn advice(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Air is clean. Enjoy the outdoors!",
            AqiCategory::Moderate => {
                "Air quality is acceptable. Sensitive individuals should monitor."
            }
            AqiCategory::SensitiveGroups => {
                "Sensitive groups should close windows and reduce activity."
            }
            AqiCategory::Unhealthy => "Unhealthy. Avoid prolonged outdoor exertion.",
            AqiCategory::VeryUnhealthy => "Very Unhealthy. Avoid all outdoor physical activity.",
            AqiCategory::Hazardous => {
                "Hazardous. Stay indoors. Wear an N95 mask if you must go out."
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthAdvice {
    pub category: AqiCategory,
    pub status: String,
    pub advice: String,
}

pub fn health_advice(aqi: f64) -> HealthAdvice {
    let category = AqiCategory::from_aqi(aqi);
    HealthAdvice {
        category,
        status: category.status().to_string(),
        advice: category.advice().to_string(),
    }
}

/// Map/marker colour for an AQI value.
pub fn aqi_color(aqi: f64) -> &'static str {
    if aqi <= 50.0 {
        "#10b981"
    } else if aqi <= 100.0 {
        "#f59e0b"
    } else if aqi <= 150.0 {
        "#f97316"
    } else if aqi <= 200.0 {
        "#ef4444"
    } else if aqi <= 300.0 {
        "#7e22ce"
    } else {
        "#4c0519"
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum OutdoorGate {
    Safe,
    Unsafe,
}

/// Caller-side check before offering outdoor exercise.
pub fn outdoor_exercise_gate(aqi: f64, unsafe_above: f64) -> OutdoorGate {
    if aqi > unsafe_above {
        OutdoorGate::Unsafe
    } else {
        OutdoorGate::Safe
    }
}
