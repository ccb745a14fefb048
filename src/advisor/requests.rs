use serde::{Deserialize, Serialize};

use crate::air::AqiCategory;
use crate::models::{Pollutants, SensorReading, WeatherSnapshot, WindObservation};

/// Current conditions as sent to the advisor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionsSummary {
    pub aqi: f64,
    /// Health band label, e.g. "Unhealthy".
    pub category: String,
    pub dominant_pollutant: String,
    pub temp_c: f64,
    pub wind_speed_kmh: f64,
}

impl ConditionsSummary {
    /// Without a pollutant breakdown the dominant pollutant is reported as PM2.5.
    pub fn new(aqi: f64, temp_c: f64, wind_speed_kmh: f64) -> Self {
        Self {
            aqi,
            category: AqiCategory::from_aqi(aqi).status().to_string(),
            dominant_pollutant: Pollutants::default().dominant().pollutant.display_name().to_string(),
            temp_c,
            wind_speed_kmh,
        }
    }

    pub fn with_pollutants(mut self, pollutants: &Pollutants) -> Self {
        self.dominant_pollutant = pollutants.dominant().pollutant.display_name().to_string();
        self
    }
}

impl From<&SensorReading> for ConditionsSummary {
    fn from(reading: &SensorReading) -> Self {
        Self::new(
            reading.aqi,
            reading.weather.temp_c,
            reading.wind.map(|w| w.speed_kmh).unwrap_or(0.0),
        )
        .with_pollutants(&reading.pollutants)
    }
}

/// Where the user is spending their time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum LocationType {
    Indoor,
    #[default]
    Outdoor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthProfileSummary {
    pub age_group: String,
    #[serde(default)]
    pub conditions: Vec<String>,
    pub activity_level: String,
    #[serde(default)]
    pub location_type: LocationType,
}

impl Default for HealthProfileSummary {
    fn default() -> Self {
        Self {
            age_group: "adult".to_string(),
            conditions: Vec::new(),
            activity_level: "moderate".to_string(),
            location_type: LocationType::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AtmosphericSummary {
    pub aqi: f64,
    pub pollutants: Pollutants,
    pub weather: WeatherSnapshot,
    pub wind: Option<WindObservation>,
}

impl From<&SensorReading> for AtmosphericSummary {
    fn from(reading: &SensorReading) -> Self {
        Self {
            aqi: reading.aqi,
            pollutants: reading.pollutants.clone(),
            weather: reading.weather.clone(),
            wind: reading.wind,
        }
    }
}
