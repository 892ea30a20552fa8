// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! birdcam-core: append-only sensor log, nearest-in-time correlation and
//! timestamp-keyed photograph storage for a remote camera/sensor rig.

pub mod config;
pub mod error;
pub mod reading;
pub mod capture;
pub mod event_store;
pub mod correlator;
pub mod photo;
pub mod classifier;
pub mod station;

pub use capture::CaptureStamp;
pub use correlator::{nearest, CorrelationResult, Correlator};
pub use error::{CapabilityError, ParseError, StationError, StorageError};
pub use event_store::{EventStore, RecordOutcome, SkipReason};
pub use photo::{PhotoEntry, PhotoEvent, PhotoStore};
pub use reading::{SensorPayload, SensorReading};
pub use station::{Station, TimelineEntry};
