// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Timestamp-keyed photograph indexing.
//!
//! A capture key is the capture instant rendered in a fixed civil zone as
//! `YYYYMMDD_HHMMSS`. It is the photo's file stem and the correlation target.
//!
//! # Invariants
//! - Fixed width, zero padded: lexicographic order == chronological order.
//! - The zone is a fixed offset, so civil time never repeats and the
//!   ordering holds across the whole year.
//! - `key()` and `display()` are both rendered from the stored instant.
//!   Neither is ever derived from the other.

use crate::config::{CAPTURE_KEY_FORMAT, CAPTURE_KEY_LEN, DISPLAY_FORMAT};
use crate::error::ParseError;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureStamp {
    instant: DateTime<FixedOffset>,
}

impl CaptureStamp {
    pub fn at(instant: DateTime<Utc>, zone: FixedOffset) -> Self {
        Self {
            instant: instant.with_timezone(&zone),
        }
    }

    pub fn now(zone: FixedOffset) -> Self {
        Self::at(Utc::now(), zone)
    }

    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    /// Sortable key, second resolution.
    pub fn key(&self) -> String {
        self.instant.format(CAPTURE_KEY_FORMAT).to_string()
    }

    /// Human-readable rendering of the same instant.
    pub fn display(&self) -> String {
        self.instant.format(DISPLAY_FORMAT).to_string()
    }
}

/// Shape check only: `YYYYMMDD_HHMMSS` with ASCII digits.
pub fn is_capture_key(stem: &str) -> bool {
    let bytes = stem.as_bytes();
    bytes.len() == CAPTURE_KEY_LEN
        && bytes.iter().enumerate().all(|(i, b)| {
            if i == 8 {
                *b == b'_'
            } else {
                b.is_ascii_digit()
            }
        })
}

/// Parse a capture key back into an instant in `zone`.
pub fn parse_capture_key(key: &str, zone: FixedOffset) -> Result<DateTime<FixedOffset>, ParseError> {
    if !is_capture_key(key) {
        return Err(ParseError::CaptureKey {
            input: key.to_string(),
            reason: format!("expected {} characters shaped YYYYMMDD_HHMMSS", CAPTURE_KEY_LEN),
        });
    }

    let naive = NaiveDateTime::parse_from_str(key, CAPTURE_KEY_FORMAT).map_err(|e| ParseError::CaptureKey {
        input: key.to_string(),
        reason: e.to_string(),
    })?;

    zone.from_local_datetime(&naive)
        .single()
        .ok_or_else(|| ParseError::NonexistentLocalTime(key.to_string()))
}
