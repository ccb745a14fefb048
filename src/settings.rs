use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::geo::DEFAULT_CONE_DISTANCE_KM;

const DEBUG_ENV: &str = "AEROSENSE_DEBUG";
const POLL_SECS_ENV: &str = "AEROSENSE_POLL_SECS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsoleSettings {
    /// Length of the downwind hazard cone.
    pub cone_distance_km: f64,
    /// Landmarks reported below this confidence are treated as missing.
    pub min_landmark_visibility: f32,
    /// Outdoor exercise is discouraged above this AQI.
    pub unsafe_aqi_threshold: f64,
    pub poll_interval_secs: u64,
    pub fetch_timeout_secs: u64,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            cone_distance_km: DEFAULT_CONE_DISTANCE_KM,
            min_landmark_visibility: 0.5,
            unsafe_aqi_threshold: 150.0,
            poll_interval_secs: 90,
            fetch_timeout_secs: 10,
        }
    }
}

impl ConsoleSettings {
    /// Apply environment overrides on top of stored values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(secs) = std::env::var(POLL_SECS_ENV)
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            self.poll_interval_secs = secs;
        }
        self
    }
}

/// Verbose coach feedback (debug line in snapshots).
pub fn debug_enabled() -> bool {
    std::env::var(DEBUG_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<ConsoleSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            ConsoleSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> ConsoleSettings {
        self.data.read().unwrap().clone()
    }

    pub fn update(&self, settings: ConsoleSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        *guard = settings;
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: ConsoleSettings = serde_json::from_str(&contents)?;
        let mut guard = self.data.write().unwrap();
        *guard = data;
        Ok(())
    }

    fn persist(&self, data: &ConsoleSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
