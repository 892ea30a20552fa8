// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Nearest-in-time correlation of a capture key against the sensor log.
//!
//! # Semantics
//! - Linear scan in log order, keeping the candidate with the smallest
//!   absolute delta. The candidate is replaced only on a strict improvement,
//!   so on equal distance the reading seen first wins.
//! - The scan is O(n) per lookup. The log belongs to one low-rate sensor.
//!   A sorted index would have to keep the first-seen tie-break.
//! - An unparsable target, an empty log, or a log with no decodable
//!   readings all yield a miss. A miss is a valid result, not an error.

use crate::capture::parse_capture_key;
use crate::reading::SensorReading;
use chrono::{DateTime, Duration, FixedOffset};

/// Absolute distance between two instants.
pub fn abs_delta(a: DateTime<FixedOffset>, b: DateTime<FixedOffset>) -> Duration {
    let delta = a.signed_duration_since(b);
    if delta < Duration::zero() {
        -delta
    } else {
        delta
    }
}

/// The reading closest to `target`, first-seen on ties.
pub fn nearest(target: DateTime<FixedOffset>, readings: &[SensorReading]) -> Option<&SensorReading> {
    let mut closest: Option<(&SensorReading, Duration)> = None;

    for reading in readings {
        let delta = abs_delta(reading.timestamp, target);
        let improves = match closest {
            Some((_, best)) => delta < best,
            None => true,
        };
        if improves {
            closest = Some((reading, delta));
        }
    }

    closest.map(|(reading, _)| reading)
}

/// Pairing of one capture key with its nearest reading, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationResult {
    pub capture_key: String,
    pub reading: Option<SensorReading>,
    pub delta: Option<Duration>,
}

impl CorrelationResult {
    pub fn miss(capture_key: impl Into<String>) -> Self {
        Self {
            capture_key: capture_key.into(),
            reading: None,
            delta: None,
        }
    }

    pub fn is_miss(&self) -> bool {
        self.reading.is_none()
    }
}

/// Resolves capture keys in a fixed civil zone and matches them to readings.
#[derive(Clone, Copy, Debug)]
pub struct Correlator {
    zone: FixedOffset,
}

impl Correlator {
    pub fn new(zone: FixedOffset) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    pub fn nearest_to_key<'a>(&self, key: &str, readings: &'a [SensorReading]) -> Option<&'a SensorReading> {
        match parse_capture_key(key, self.zone) {
            Ok(target) => nearest(target, readings),
            Err(e) => {
                tracing::warn!("Timestamp parse error: {}", e);
                None
            }
        }
    }

    pub fn correlate(&self, key: &str, readings: &[SensorReading]) -> CorrelationResult {
        let target = match parse_capture_key(key, self.zone) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!("Timestamp parse error: {}", e);
                return CorrelationResult::miss(key);
            }
        };

        match nearest(target, readings) {
            Some(reading) => CorrelationResult {
                capture_key: key.to_string(),
                delta: Some(abs_delta(reading.timestamp, target)),
                reading: Some(reading.clone()),
            },
            None => CorrelationResult::miss(key),
        }
    }
}
