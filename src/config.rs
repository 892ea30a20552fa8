// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

use crate::error::ParseError;
use chrono::{FixedOffset, Offset, Utc};

/// Capture key format. Fixed width, so lexicographic order is chronological order.
pub const CAPTURE_KEY_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Length of a capture key (`YYYYMMDD_HHMMSS`).
pub const CAPTURE_KEY_LEN: usize = 15;

/// Human-readable rendering of the capture instant.
pub const DISPLAY_FORMAT: &str = "%d %B %Y, %H:%M:%S";

/// Default civil zone offset in seconds east of UTC (+01:00).
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 3600;

pub fn default_zone() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap_or(Utc.fix())
}

/// Parse a UTC offset written as `+HH:MM`, `-HH:MM`, `+HHMM` or `Z`.
pub fn parse_utc_offset(input: &str) -> Result<FixedOffset, ParseError> {
    let invalid = || ParseError::UtcOffset(input.to_string());
    let s = input.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };
    if !rest.is_ascii() {
        return Err(invalid());
    }
    // HHMM, or HH:MM with the colon only between hours and minutes
    let (hh, mm) = match rest.len() {
        4 => (&rest[..2], &rest[2..]),
        5 if rest.as_bytes()[2] == b':' => (&rest[..2], &rest[3..]),
        _ => return Err(invalid()),
    };
    if !hh.bytes().chain(mm.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = hh.parse().map_err(|_| invalid())?;
    let minutes: i32 = mm.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Sensor log file name inside the data directory.
pub const SENSOR_LOG_FILE: &str = "sensor_data.ndjson";

/// Photograph folder inside the data directory.
pub const IMAGE_DIR: &str = "images";

pub const IMAGE_EXT: &str = "jpg";
pub const SIDECAR_EXT: &str = "txt";

/// Separator between the display time and the label inside a sidecar.
pub const SIDECAR_SEPARATOR: &str = " — ";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("+01:00").unwrap().local_minus_utc(), 3600);
        assert_eq!(parse_utc_offset("-0530").unwrap().local_minus_utc(), -19800);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("01:00").is_err());
        assert!(parse_utc_offset("+25:00").is_err());
        assert!(parse_utc_offset("+1:00").is_err());
        assert!(parse_utc_offset("+0:100").is_err());
        assert!(parse_utc_offset("+:0100").is_err());
        assert!(parse_utc_offset("+01:0:").is_err());
        assert!(parse_utc_offset("+aé1").is_err());
        assert_eq!(parse_utc_offset("+0100").unwrap().local_minus_utc(), 3600);
    }

    #[test]
    fn test_default_zone() {
        assert_eq!(default_zone().local_minus_utc(), DEFAULT_UTC_OFFSET_SECS);
    }
}
