pub mod advisory;
pub mod geo;
pub mod landmarks;
pub mod reading;

pub use geo::{GeoPoint, WindObservation};
pub use landmarks::{Joint, Landmark, LandmarkFrame};
pub use reading::{ForecastEntry, PollutantLevel, Pollutants, SensorReading, WeatherSnapshot};
