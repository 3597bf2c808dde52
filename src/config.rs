//! Process configuration
//!
//! The three required values (device identity, shared key, hub endpoint)
//! are read once at startup from the environment. Missing values are a
//! fatal startup error.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Tick period for telemetry readings in milliseconds
pub const TELEMETRY_INTERVAL_MS: u64 = 1000;

/// Heartbeat log period in milliseconds, independent of the tick period
pub const HEARTBEAT_INTERVAL_MS: u64 = 10_000;

/// Timeout for connecting and authenticating with the hub
pub const CONNECT_TIMEOUT_MS: u64 = 5000;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing configuration value: {0}")]
    Missing(&'static str),
}

/// Configuration for the simulated device
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Device identity string
    pub device_id: String,
    /// Shared authentication secret
    pub device_key: String,
    /// Hub endpoint address (host:port)
    pub hub_addr: String,
    /// Period between telemetry ticks
    pub telemetry_interval: Duration,
    /// Period between heartbeat log lines
    pub heartbeat_interval: Duration,
    /// Connection/handshake timeout
    pub connect_timeout: Duration,
}

impl SimulatorConfig {
    /// Load configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            device_id: require("DEVICE_ID")?,
            device_key: require("DEVICE_KEY")?,
            hub_addr: require("IOT_HUB_URI")?,
            telemetry_interval: Duration::from_millis(TELEMETRY_INTERVAL_MS),
            heartbeat_interval: Duration::from_millis(HEARTBEAT_INTERVAL_MS),
            connect_timeout: Duration::from_millis(CONNECT_TIMEOUT_MS),
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env() {
        env::set_var("DEVICE_ID", "dev-001");
        env::set_var("DEVICE_KEY", "secret");
        env::set_var("IOT_HUB_URI", "127.0.0.1:8080");

        let config = SimulatorConfig::from_env().expect("config should load");
        assert_eq!(config.device_id, "dev-001");
        assert_eq!(config.device_key, "secret");
        assert_eq!(config.hub_addr, "127.0.0.1:8080");
        assert_eq!(config.telemetry_interval, Duration::from_millis(1000));
        assert_eq!(config.heartbeat_interval, Duration::from_millis(10_000));

        env::remove_var("DEVICE_KEY");
        let err = SimulatorConfig::from_env().expect_err("missing key should fail");
        assert!(matches!(err, ConfigError::Missing("DEVICE_KEY")));

        env::remove_var("DEVICE_ID");
        env::remove_var("IOT_HUB_URI");
    }
}
