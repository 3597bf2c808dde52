//! The simulated device
//!
//! Two periodic activities run for the lifetime of the process: the tick
//! loop (synthesize a reading, publish it) and a heartbeat logger on its
//! own, longer cadence. Both stop when the shutdown signal flips.

use crate::config::SimulatorConfig;
use crate::hub::Publisher;
use crate::simulator::SensorSimulator;
use crate::telemetry::Reading;
use anyhow::Result;
use bytes::Bytes;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{info, warn};

/// A simulated device bound to one hub connection
pub struct Device {
    config: SimulatorConfig,
    simulator: SensorSimulator,
    publisher: Arc<dyn Publisher>,
}

impl Device {
    pub fn new(config: SimulatorConfig, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            config,
            simulator: SensorSimulator::new(),
            publisher,
        }
    }

    /// Run the tick and heartbeat loops until `shutdown` flips
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let heartbeat_id = self.config.device_id.clone();
        let heartbeat_period = self.config.heartbeat_interval;
        let mut heartbeat_shutdown = shutdown.clone();
        let heartbeat = tokio::spawn(async move {
            let mut ticker = interval(heartbeat_period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => info!("Heartbeat: {}", heartbeat_id),
                    _ = heartbeat_shutdown.changed() => break,
                }
            }
        });

        let mut rng = StdRng::from_entropy();
        let mut ticker = interval(self.config.telemetry_interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.tick(&mut rng).await,
                _ = shutdown.changed() => break,
            }
        }

        heartbeat.await?;
        info!("Device stopped: {}", self.config.device_id);
        Ok(())
    }

    /// One telemetry cycle: advance the band, synthesize a reading, publish
    /// it. Publish failures are logged and swallowed; the next tick runs
    /// regardless.
    pub async fn tick(&mut self, rng: &mut impl Rng) {
        if !self.simulator.is_enabled() {
            return;
        }

        let temperature = self.simulator.next_temperature(rng);
        let reading = Reading::new(&self.config.device_id, temperature);
        let json = match reading.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to encode reading: {}", e);
                return;
            }
        };

        info!("Sending message: {}", json);
        if let Err(e) = self
            .publisher
            .send(&self.config.device_id, Bytes::from(json))
            .await
        {
            warn!("Failed to publish reading: {}", e);
        }
    }
}
