// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Append-Only Sensor Event Store
//!
//! The log is the only source of truth for sensor readings. Nothing is cached
//! across restarts.
//!
//! # File Format
//! ```text
//! {"timestamp":"2025-06-01T10:00:00+01:00","temp":5.0,"humidity":81.0,"battery_mv":3300.0}\n
//! {"timestamp":"2025-06-01T10:05:00+01:00","temp":5.2,"humidity":null,"battery_mv":3298.0}\n
//! ```
//!
//! # Guarantees
//! - Each record is encoded into one buffer and written with a single
//!   `write_all` on an `O_APPEND` handle, so concurrent appenders never
//!   interleave partial records.
//! - Records are never rewritten or reordered.
//! - A record never shares a line with a partial write left by a crash: if
//!   the log does not end in a newline, the next record starts with one.
//! - Readers tolerate a trailing partial line and corrupt lines: each line is
//!   decoded independently and failures are reported as `Skipped`.

use crate::error::{ParseError, StorageResult};
use crate::reading::SensorReading;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Why a line was not turned into a reading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Blank,
    Malformed(ParseError),
}

/// Per-line decode outcome of a log scan.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordOutcome {
    Parsed(SensorReading),
    Skipped { line: usize, reason: SkipReason },
}

impl RecordOutcome {
    pub fn into_reading(self) -> Option<SensorReading> {
        match self {
            RecordOutcome::Parsed(reading) => Some(reading),
            RecordOutcome::Skipped { .. } => None,
        }
    }
}

/// Decode one raw log line (without its trailing newline).
pub fn decode_line(line_no: usize, raw: &[u8]) -> RecordOutcome {
    let text = match std::str::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => {
            return RecordOutcome::Skipped {
                line: line_no,
                reason: SkipReason::Malformed(ParseError::Record(e.to_string())),
            }
        }
    };

    if text.trim().is_empty() {
        return RecordOutcome::Skipped {
            line: line_no,
            reason: SkipReason::Blank,
        };
    }

    match serde_json::from_str::<SensorReading>(text) {
        Ok(reading) => RecordOutcome::Parsed(reading),
        Err(e) => RecordOutcome::Skipped {
            line: line_no,
            reason: SkipReason::Malformed(ParseError::Record(e.to_string())),
        },
    }
}

/// Append-only, newline-delimited JSON log of sensor readings.
#[derive(Clone, Debug)]
pub struct EventStore {
    path: PathBuf,
}

impl EventStore {
    /// Bind to a log file. The parent directory is created if needed;
    /// the file itself is created lazily on first append.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let store = Self::at(path);
        if let Some(parent) = store.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(store)
    }

    /// Bind to a log file without touching the filesystem.
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one reading as a single line.
    ///
    /// Only returns Ok() after the record reached the file and was synced.
    pub fn append(&self, reading: &SensorReading) -> StorageResult<()> {
        let encoded = serde_json::to_vec(reading)?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        let mut record = Vec::with_capacity(encoded.len() + 2);
        if ends_mid_line(&mut file)? {
            tracing::warn!(path = ?self.path, "sensor log ends in a partial record, starting a new line");
            record.push(b'\n');
        }
        record.extend_from_slice(&encoded);
        record.push(b'\n');

        file.write_all(&record)?;
        file.sync_data()?;

        tracing::debug!(timestamp = %reading.timestamp, "sensor reading appended");
        Ok(())
    }

    /// Decode every line of the log, in file order.
    ///
    /// A missing log is an empty log.
    pub fn scan(&self) -> StorageResult<Vec<RecordOutcome>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = BufReader::new(file);
        let mut outcomes = Vec::new();
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            let read = reader.read_until(b'\n', &mut buf)?;
            if read == 0 {
                break;
            }
            line_no += 1;

            let raw = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            outcomes.push(decode_line(line_no, raw));
        }

        Ok(outcomes)
    }

    /// All readings that decode, oldest first. Corrupt lines are skipped.
    pub fn load_all(&self) -> StorageResult<Vec<SensorReading>> {
        let outcomes = self.scan()?;
        let mut readings = Vec::with_capacity(outcomes.len());

        for outcome in outcomes {
            match outcome {
                RecordOutcome::Parsed(reading) => readings.push(reading),
                RecordOutcome::Skipped { reason: SkipReason::Blank, .. } => {}
                RecordOutcome::Skipped { line, reason: SkipReason::Malformed(err) } => {
                    tracing::warn!(line, path = ?self.path, "skipping sensor record: {}", err);
                }
            }
        }

        Ok(readings)
    }

    /// Number of readings that decode.
    pub fn len(&self) -> StorageResult<usize> {
        Ok(self.load_all()?.len())
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// True when the file is non-empty and its last byte is not a newline.
fn ends_mid_line(file: &mut File) -> io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
