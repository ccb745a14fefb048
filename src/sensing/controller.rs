use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::models::GeoPoint;
use crate::settings::ConsoleSettings;

use super::loop_worker::{sensing_loop, ConsoleUpdate, LoopExit};
use super::source::SensorSource;

pub struct SensingController<S> {
    source: Arc<S>,
    settings: ConsoleSettings,
    handle: Option<JoinHandle<LoopExit>>,
    cancel_token: Option<CancellationToken>,
    location_tx: Option<watch::Sender<GeoPoint>>,
    update_tx: watch::Sender<Option<ConsoleUpdate>>,
}

impl<S: SensorSource> SensingController<S> {
    pub fn new(source: S, settings: ConsoleSettings) -> Self {
        let (update_tx, _) = watch::channel(None);
        Self {
            source: Arc::new(source),
            settings,
            handle: None,
            cancel_token: None,
            location_tx: None,
            update_tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ConsoleUpdate>> {
        self.update_tx.subscribe()
    }

    pub fn latest(&self) -> Option<ConsoleUpdate> {
        self.update_tx.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start_sensing(&mut self, location: GeoPoint) -> Result<()> {
        if self.handle.is_some() {
            bail!("sensing already active");
        }
        if !location.is_valid() {
            bail!(
                "cannot start sensing at invalid location ({}, {})",
                location.latitude,
                location.longitude
            );
        }

        info!(
            "starting sensing at ({}, {}) every {}s",
            location.latitude, location.longitude, self.settings.poll_interval_secs
        );

        let cancel_token = CancellationToken::new();
        let (location_tx, location_rx) = watch::channel(location);

        let handle = tokio::spawn(sensing_loop(
            Arc::clone(&self.source),
            self.settings.clone(),
            location_rx,
            self.update_tx.clone(),
            cancel_token.clone(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        self.location_tx = Some(location_tx);
        Ok(())
    }

    /// Move the fix; the loop refetches right away.
    pub fn set_location(&self, location: GeoPoint) -> Result<()> {
        if !location.is_valid() {
            bail!(
                "invalid location ({}, {})",
                location.latitude,
                location.longitude
            );
        }
        let Some(tx) = &self.location_tx else {
            bail!("sensing is not active");
        };
        tx.send(location).context("sensing loop is no longer listening")
    }

    pub async fn stop_sensing(&mut self) -> Result<()> {
        // Cancel before dropping the sender so the loop sees a stop, not a lost channel.
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        self.location_tx = None;

        if let Some(handle) = self.handle.take() {
            let exit = handle.await.context("sensing loop task failed to join")?;
            info!("sensing stopped ({exit:?})");
        }
        Ok(())
    }
}
