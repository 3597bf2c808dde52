//! Telemetry reading model and wire encoding
//!
//! A `Reading` is transient: constructed on each tick, serialized, handed
//! to the publisher, and dropped. The JSON field names and their order are
//! part of the wire contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Humidity is not simulated; every reading reports this constant
pub const HUMIDITY_PERCENT: i32 = 20;

/// One synthetic sensor reading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reading {
    pub device_id: String,
    pub temperature: i32,
    pub humidity: i32,
    pub time_stamp: DateTime<Utc>,
}

impl Reading {
    /// Create a reading stamped with the current wall-clock time
    pub fn new(device_id: impl Into<String>, temperature: i32) -> Self {
        Self {
            device_id: device_id.into(),
            temperature,
            humidity: HUMIDITY_PERCENT,
            time_stamp: Utc::now(),
        }
    }

    /// Serialize to the compact JSON wire encoding
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
