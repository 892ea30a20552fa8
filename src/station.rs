// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Station: the ingest pipeline and timeline assembly.
//!
//! One `Station` is built at process start and shared by handle. It owns the
//! sensor event store, the photograph directory and the external capabilities.
//!
//! # Flow
//! 1. photo bytes -> mint capture stamp -> persist image
//! 2. classify (once, no retry) -> write sidecar -> annotate
//! 3. sensor payload -> stamp -> append to event store
//! 4. timeline: list photos newest first, load the log once, correlate each

use crate::capture::CaptureStamp;
use crate::classifier::{Annotator, Classifier, NoopAnnotator, RandomSpeciesClassifier};
use crate::config::{IMAGE_DIR, IMAGE_EXT, SENSOR_LOG_FILE, SIDECAR_EXT};
use crate::correlator::{CorrelationResult, Correlator};
use crate::error::{Result, StationError, StorageResult};
use crate::event_store::EventStore;
use crate::photo::{PhotoEntry, PhotoEvent, PhotoStore};
use crate::reading::{SensorPayload, SensorReading};
use chrono::{DateTime, FixedOffset, Utc};
use std::fs;
use std::path::Path;

/// One gallery row: a photograph and its nearest sensor reading.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineEntry {
    pub photo: PhotoEntry,
    pub correlation: CorrelationResult,
}

pub struct Station {
    events: EventStore,
    photos: PhotoStore,
    correlator: Correlator,
    classifier: Box<dyn Classifier>,
    annotator: Box<dyn Annotator>,
}

impl Station {
    pub fn new(events: EventStore, photos: PhotoStore, zone: FixedOffset) -> Self {
        Self {
            events,
            photos,
            correlator: Correlator::new(zone),
            classifier: Box::new(RandomSpeciesClassifier),
            annotator: Box::new(NoopAnnotator),
        }
    }

    /// Standard layout under one data directory.
    pub fn open(data_dir: impl AsRef<Path>, zone: FixedOffset) -> StorageResult<Self> {
        let data_dir = data_dir.as_ref();
        let events = EventStore::open(data_dir.join(SENSOR_LOG_FILE))?;
        let photos = PhotoStore::open(data_dir.join(IMAGE_DIR))?;
        Ok(Self::new(events, photos, zone))
    }

    /// Same layout as [`Station::open`], but nothing is created on disk.
    /// Missing stores read as empty.
    pub fn open_read_only(data_dir: impl AsRef<Path>, zone: FixedOffset) -> Self {
        let data_dir = data_dir.as_ref();
        Self::new(
            EventStore::at(data_dir.join(SENSOR_LOG_FILE)),
            PhotoStore::at(data_dir.join(IMAGE_DIR)),
            zone,
        )
    }

    pub fn with_classifier(mut self, classifier: impl Classifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn with_annotator(mut self, annotator: impl Annotator + 'static) -> Self {
        self.annotator = Box::new(annotator);
        self
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn photos(&self) -> &PhotoStore {
        &self.photos
    }

    pub fn correlator(&self) -> &Correlator {
        &self.correlator
    }

    pub fn zone(&self) -> FixedOffset {
        self.correlator.zone()
    }

    /// Store, classify and label one photograph captured at `now`.
    ///
    /// On failure after the image was written, the image and any sidecar
    /// are removed again so the upload leaves nothing behind.
    pub fn ingest_photo(&self, bytes: &[u8], now: DateTime<Utc>) -> Result<PhotoEvent> {
        let stamp = CaptureStamp::at(now, self.zone());
        let image = self.photos.persist_photo(bytes, &stamp)?;

        let labelled = (|| -> Result<PhotoEvent> {
            let label = self.classifier.classify(&image)?;
            let event = PhotoEvent::new(&stamp, label);
            self.photos.write_sidecar(&event)?;
            self.annotator.annotate(&image, &event.label)?;
            Ok(event)
        })();

        match labelled {
            Ok(event) => {
                tracing::info!(key = %event.capture_key, species = %event.label, "photo ingested");
                Ok(event)
            }
            Err(e) => {
                tracing::error!(key = %stamp.key(), "photo ingest failed: {}", e);
                self.discard(&stamp);
                Err(e)
            }
        }
    }

    fn discard(&self, stamp: &CaptureStamp) {
        let key = stamp.key();
        for ext in [IMAGE_EXT, SIDECAR_EXT] {
            let path = self.photos.dir().join(format!("{}.{}", key, ext));
            if let Err(e) = fs::remove_file(&path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = ?path, "failed to discard partial upload: {}", e);
                }
            }
        }
    }

    /// Stamp a sensor payload with `now` and append it to the log.
    pub fn ingest_reading(&self, payload: SensorPayload, now: DateTime<Utc>) -> Result<SensorReading> {
        let reading = payload.stamp(now, self.zone());
        self.events.append(&reading).map_err(StationError::from)?;
        Ok(reading)
    }

    /// Photographs newest first, each paired with its nearest reading.
    pub fn timeline(&self) -> Result<Vec<TimelineEntry>> {
        let photos = self.photos.list()?;
        let readings = self.events.load_all()?;

        Ok(photos
            .into_iter()
            .map(|photo| {
                let correlation = self.correlator.correlate(&photo.key, &readings);
                TimelineEntry { photo, correlation }
            })
            .collect())
    }

    /// Sensor readings, newest first (reverse log order).
    pub fn readings_newest_first(&self) -> Result<Vec<SensorReading>> {
        let mut readings = self.events.load_all()?;
        readings.reverse();
        Ok(readings)
    }
}
