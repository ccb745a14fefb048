//! Closed-form interpretation of air-quality readings.

pub mod advice;
pub mod forecast;
pub mod impact;
pub mod sources;

pub use advice::{aqi_color, health_advice, outdoor_exercise_gate, AqiCategory, HealthAdvice, OutdoorGate};
pub use forecast::{analyze_forecast, map_owm_aqi, ForecastInsights, OwmAqiBand};
pub use sources::{classify_source, SourceClassification, SourceKind};
