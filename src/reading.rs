// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Environmental readings as they appear on the wire and in the sensor log.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// One environmental reading. Immutable once appended to the log.
///
/// Serialized with the log's historical field names (`temp`, `battery_mv`),
/// one JSON object per line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub timestamp: DateTime<FixedOffset>,
    #[serde(rename = "temp", default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(rename = "battery_mv", default)]
    pub battery_millivolts: Option<f64>,
}

impl SensorReading {
    pub fn new(timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            timestamp,
            temperature: None,
            humidity: None,
            battery_millivolts: None,
        }
    }

    pub fn with_temperature(mut self, celsius: f64) -> Self {
        self.temperature = Some(celsius);
        self
    }

    pub fn with_humidity(mut self, percent: f64) -> Self {
        self.humidity = Some(percent);
        self
    }

    pub fn with_battery(mut self, millivolts: f64) -> Self {
        self.battery_millivolts = Some(millivolts);
        self
    }
}

/// Inbound sensor payload. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorPayload {
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub battery_mv: Option<f64>,
}

impl SensorPayload {
    /// Stamp the payload with the ingest instant rendered in `zone`.
    pub fn stamp(self, now: DateTime<Utc>, zone: FixedOffset) -> SensorReading {
        SensorReading {
            timestamp: now.with_timezone(&zone),
            temperature: self.temp,
            humidity: self.humidity,
            battery_millivolts: self.battery_mv,
        }
    }
}
