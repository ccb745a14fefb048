use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geo::{GeoPoint, WindObservation};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Pollutant {
    Pm25,
    Pm10,
    No2,
    O3,
    So2,
    Co,
}

impl Pollutant {
    pub fn display_name(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::No2 => "NO2",
            Pollutant::O3 => "O3",
            Pollutant::So2 => "SO2",
            Pollutant::Co => "CO",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Pollutant::Pm25 | Pollutant::Pm10 | Pollutant::Co => "µg/m³",
            Pollutant::No2 | Pollutant::O3 | Pollutant::So2 => "ppb",
        }
    }

    /// Upper end of the gauge used when displaying this pollutant.
    pub fn gauge_max(&self) -> f64 {
        match self {
            Pollutant::Pm25 | Pollutant::Pm10 => 500.0,
            Pollutant::No2 | Pollutant::O3 | Pollutant::So2 => 200.0,
            Pollutant::Co => 15_000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PollutantLevel {
    pub pollutant: Pollutant,
    pub value: f64,
}

impl PollutantLevel {
    pub fn new(pollutant: Pollutant, value: f64) -> Self {
        Self { pollutant, value }
    }

    /// Reading as a fraction of the gauge maximum, clamped to `[0, 1]`.
    pub fn gauge_fraction(&self) -> f64 {
        (self.value / self.pollutant.gauge_max()).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pollutants {
    pub pm25: PollutantLevel,
    pub pm10: PollutantLevel,
    pub no2: PollutantLevel,
    pub o3: PollutantLevel,
    pub so2: PollutantLevel,
    pub co: PollutantLevel,
}

impl Pollutants {
    /// Missing station values are reported as zero by the feed.
    pub fn from_values(pm25: f64, pm10: f64, no2: f64, o3: f64, so2: f64, co: f64) -> Self {
        Self {
            pm25: PollutantLevel::new(Pollutant::Pm25, pm25),
            pm10: PollutantLevel::new(Pollutant::Pm10, pm10),
            no2: PollutantLevel::new(Pollutant::No2, no2),
            o3: PollutantLevel::new(Pollutant::O3, o3),
            so2: PollutantLevel::new(Pollutant::So2, so2),
            co: PollutantLevel::new(Pollutant::Co, co),
        }
    }

    pub fn levels(&self) -> [&PollutantLevel; 6] {
        [&self.pm25, &self.pm10, &self.no2, &self.o3, &self.so2, &self.co]
    }

    /// Pollutant sitting highest on its own gauge. Ties keep the earlier one (PM2.5 first).
    pub fn dominant(&self) -> &PollutantLevel {
        self.levels()
            .into_iter()
            .fold(&self.pm25, |best, level| {
                if level.gauge_fraction() > best.gauge_fraction() {
                    level
                } else {
                    best
                }
            })
    }
}

impl Default for Pollutants {
    fn default() -> Self {
        Self::from_values(0.0, 0.0, 0.0, 0.0, 0.0, 0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub temp_c: f64,
    /// Cloud cover percentage, 0-100.
    pub clouds_pct: f64,
    pub description: String,
}

/// One hourly entry of the pollution forecast, on the OWM 1-5 scale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastEntry {
    pub at: DateTime<Utc>,
    pub aqi: u8,
}

/// One fused reading from the air-quality, weather and forecast feeds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub aqi: f64,
    pub pollutants: Pollutants,
    /// Attribution of the monitoring station or network.
    pub source_name: String,
    pub forecast: Vec<ForecastEntry>,
    pub wind: Option<WindObservation>,
    pub weather: WeatherSnapshot,
    pub observed_at: DateTime<Utc>,
    pub location: GeoPoint,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_pollutant_is_compared_on_its_gauge() {
        // 100 µg/m³ of PM2.5 is 20% of its gauge; 80 ppb NO2 is 40%.
        let mix = Pollutants::from_values(100.0, 120.0, 80.0, 10.0, 5.0, 400.0);
        assert_eq!(mix.dominant().pollutant, Pollutant::No2);

        assert_eq!(Pollutants::default().dominant().pollutant, Pollutant::Pm25);
    }
}
