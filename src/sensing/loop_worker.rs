use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::air::{classify_source, health_advice, outdoor_exercise_gate, HealthAdvice, OutdoorGate, SourceClassification};
use crate::geo::{compute_dispersion_cone, DispersionCone};
use crate::models::{GeoPoint, SensorReading};
use crate::settings::ConsoleSettings;

use super::source::SensorSource;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// What the console shows for the latest fetch cycle.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ConsoleUpdate {
    Reading {
        reading: SensorReading,
        advice: HealthAdvice,
        source: SourceClassification,
        gate: OutdoorGate,
        cone: Option<DispersionCone>,
    },
    Unavailable {
        reason: String,
    },
}

impl ConsoleUpdate {
    pub fn from_reading(reading: SensorReading, settings: &ConsoleSettings) -> Self {
        let cone = reading
            .wind
            .map(|wind| compute_dispersion_cone(reading.location, &wind, settings.cone_distance_km));
        ConsoleUpdate::Reading {
            advice: health_advice(reading.aqi),
            source: classify_source(&reading.pollutants),
            gate: outdoor_exercise_gate(reading.aqi, settings.unsafe_aqi_threshold),
            cone,
            reading,
        }
    }

    pub fn reading(&self) -> Option<&SensorReading> {
        match self {
            ConsoleUpdate::Reading { reading, .. } => Some(reading),
            ConsoleUpdate::Unavailable { .. } => None,
        }
    }
}

/// Why the polling loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Cancelled,
    LocationClosed,
}

pub async fn sensing_loop<S: SensorSource>(
    source: Arc<S>,
    settings: ConsoleSettings,
    mut location_rx: watch::Receiver<GeoPoint>,
    update_tx: watch::Sender<Option<ConsoleUpdate>>,
    cancel_token: CancellationToken,
) -> LoopExit {
    let mut ticker = tokio::time::interval(Duration::from_secs(settings.poll_interval_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let timeout = Duration::from_secs(settings.fetch_timeout_secs.max(1));

    loop {
        tokio::select! {
            // Cancellation wins over a location channel closed by the same stop.
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("sensing loop shutting down");
                return LoopExit::Cancelled;
            }
            _ = ticker.tick() => {}
            changed = location_rx.changed() => {
                if changed.is_err() {
                    log_warn!("location channel closed; stopping sensing loop");
                    return LoopExit::LocationClosed;
                }
                log_info!("location changed; refetching");
                ticker.reset();
            }
        }

        let location = *location_rx.borrow_and_update();
        let update = tokio::select! {
            _ = cancel_token.cancelled() => {
                log_info!("sensing loop cancelled mid-fetch");
                return LoopExit::Cancelled;
            }
            result = tokio::time::timeout(timeout, source.fetch(location)) => {
                match result {
                    Ok(Ok(reading)) => ConsoleUpdate::from_reading(reading, &settings),
                    Ok(Err(err)) => {
                        log_error!("sensor fetch failed at ({}, {}): {err:?}", location.latitude, location.longitude);
                        unavailable(format!("sensor fetch failed: {err}"))
                    }
                    Err(_) => {
                        log_warn!("sensor fetch timeout (> {}s)", timeout.as_secs());
                        unavailable(format!("sensor fetch timed out after {}s", timeout.as_secs()))
                    }
                }
            }
        };

        update_tx.send_replace(Some(update));
    }
}

fn unavailable(reason: String) -> ConsoleUpdate {
    ConsoleUpdate::Unavailable { reason }
}

/// Single fetch outside the loop, for callers that only need one update.
pub async fn fetch_once<S: SensorSource>(
    source: &S,
    location: GeoPoint,
    settings: &ConsoleSettings,
) -> Result<ConsoleUpdate> {
    let reading = tokio::time::timeout(
        Duration::from_secs(settings.fetch_timeout_secs.max(1)),
        source.fetch(location),
    )
    .await??;
    Ok(ConsoleUpdate::from_reading(reading, settings))
}
