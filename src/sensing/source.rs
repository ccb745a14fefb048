use std::future::Future;

use anyhow::{bail, Result};
use chrono::{Duration, Utc};

use crate::models::{
    ForecastEntry, GeoPoint, Pollutants, SensorReading, WeatherSnapshot, WindObservation,
};

const SIMULATED_SOURCE_NAME: &str = "Simulated Aero-Network";
const FORECAST_HOURS: i64 = 24;

/// Yields one fused air-quality/weather reading for a location.
pub trait SensorSource: Send + Sync + 'static {
    fn fetch(&self, location: GeoPoint) -> impl Future<Output = Result<SensorReading>> + Send;
}

/// Offline stand-in for the live feeds. The same coordinates always produce
/// the same reading, apart from timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSensorSource;

impl MockSensorSource {
    pub fn new() -> Self {
        Self
    }

    pub fn reading_for(&self, location: GeoPoint) -> Result<SensorReading> {
        if !location.is_valid() {
            bail!(
                "invalid location ({}, {})",
                location.latitude,
                location.longitude
            );
        }

        let seed = location_seed(location);
        let aqi = 100.0 + (seed % 400).unsigned_abs() as f64;
        let scaled = |max: f64| (aqi / 500.0 * max).floor();

        let now = Utc::now();
        let forecast = (0..FORECAST_HOURS)
            .map(|hour| {
                let wave = ((seed as f64) + hour as f64).sin().abs() * 5.0;
                ForecastEntry {
                    at: now + Duration::hours(hour),
                    aqi: (wave.floor() as i64 + 1).clamp(1, 5) as u8,
                }
            })
            .collect();

        Ok(SensorReading {
            aqi,
            pollutants: Pollutants::from_values(
                scaled(150.0),
                scaled(200.0),
                scaled(80.0),
                scaled(120.0),
                scaled(40.0),
                scaled(1000.0),
            ),
            source_name: SIMULATED_SOURCE_NAME.to_string(),
            forecast,
            wind: Some(WindObservation::new(
                (seed % 360).unsigned_abs() as f64,
                (seed % 20).unsigned_abs() as f64 / 2.0,
            )),
            weather: WeatherSnapshot {
                temp_c: 22.0,
                clouds_pct: (seed % 100).unsigned_abs() as f64,
                description: "Clear Sky".to_string(),
            },
            observed_at: now,
            location,
        })
    }
}

impl SensorSource for MockSensorSource {
    async fn fetch(&self, location: GeoPoint) -> Result<SensorReading> {
        self.reading_for(location)
    }
}

/// 31-multiplier string hash over the decimal form of `lat + lng`.
fn location_seed(location: GeoPoint) -> i32 {
    let key = (location.latitude + location.longitude).to_string();
    key.chars().fold(0i32, |seed, ch| {
        seed.wrapping_shl(5)
            .wrapping_sub(seed)
            .wrapping_add(ch as i32)
    })
}
