//! Error types.

use std::io;
use thiserror::Error;

/// A stored record or a supplied timestamp could not be decoded.
///
/// Always recovered locally: the record is skipped or the lookup yields no match.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid capture key {input:?}: {reason}")]
    CaptureKey { input: String, reason: String },
    #[error("capture key {0:?} does not name an instant in the configured zone")]
    NonexistentLocalTime(String),
    #[error("invalid UTC offset {0:?}")]
    UtcOffset(String),
    #[error("malformed record: {0}")]
    Record(String),
}

/// The underlying log or photo directory failed at the I/O level.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid file name: {0}")]
    InvalidName(String),
}

/// An external collaborator (classifier, annotator) failed.
#[derive(Error, Debug)]
#[error("{capability} failed: {message}")]
pub struct CapabilityError {
    pub capability: &'static str,
    pub message: String,
}

impl CapabilityError {
    pub fn new(capability: &'static str, message: impl Into<String>) -> Self {
        Self {
            capability,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum StationError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
pub type Result<T> = std::result::Result<T, StationError>;
