// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Deserialize, Serialize};

// Sensor uploads deserialize straight into birdcam_core::SensorPayload.

#[derive(Serialize, Deserialize, Debug)]
pub struct UploadPhotoResponse {
    pub status: String,
    /// Capture key, also the image file stem.
    pub timestamp: String,
    pub species: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok".to_string() }
    }
}
