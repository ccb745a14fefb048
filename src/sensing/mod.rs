mod controller;
mod loop_worker;
mod source;

pub use controller::SensingController;
pub use loop_worker::{fetch_once, ConsoleUpdate};
pub use source::{MockSensorSource, SensorSource};
