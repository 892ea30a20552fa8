// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use birdcam_core::{StationError, StorageError};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Station error: {0}")]
    Station(#[from] StationError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal server error")]
    Internal,
}

impl From<StorageError> for NodeError {
    fn from(e: StorageError) -> Self {
        NodeError::Station(StationError::Storage(e))
    }
}

impl IntoResponse for NodeError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            NodeError::Station(st_err) => match st_err {
                StationError::Storage(StorageError::InvalidName(name)) => {
                    (StatusCode::NOT_FOUND, format!("No such file: {}", name))
                }
                StationError::Storage(e) => {
                    tracing::error!("Storage failure: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Storage failure".to_string())
                }
                StationError::Capability(e) => {
                    tracing::error!("Capability failure: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
            },
            NodeError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            NodeError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            NodeError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
