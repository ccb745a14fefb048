pub mod advisor;
pub mod air;
pub mod coach;
pub mod error;
pub mod geo;
pub mod models;
pub mod sensing;
pub mod settings;
mod utils;

use std::path::PathBuf;

use anyhow::Result;

pub use coach::{CoachController, CoachSnapshot, ExercisePhase, ExerciseSession};
pub use error::{FrameRejection, SessionFault};
pub use geo::{cardinal_direction, compute_destination, compute_dispersion_cone, DispersionCone};
pub use models::{GeoPoint, Joint, Landmark, LandmarkFrame, SensorReading, WindObservation};
pub use sensing::{ConsoleUpdate, MockSensorSource, SensingController, SensorSource};
pub use settings::{ConsoleSettings, SettingsStore};

/// Initialize logging (reads RUST_LOG). Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}

/// Everything a console front end drives: stored settings, the coaching
/// session and the sensor polling loop.
pub struct Console<S> {
    pub settings: SettingsStore,
    pub coach: CoachController,
    pub sensing: SensingController<S>,
}

impl<S: SensorSource> Console<S> {
    pub fn open(settings_path: PathBuf, source: S) -> Result<Self> {
        let settings = SettingsStore::new(settings_path)?;
        let effective = settings.settings().with_env_overrides();

        log::info!(
            "console ready (poll {}s, cone {} km)",
            effective.poll_interval_secs,
            effective.cone_distance_km
        );

        Ok(Self {
            coach: CoachController::new(&effective),
            sensing: SensingController::new(source, effective),
            settings,
        })
    }

    /// Stop background work and drop any live coaching session.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.coach.close_session().await?;
        self.sensing.stop_sensing().await
    }
}
