// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, State},
    http::header::CONTENT_TYPE,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use birdcam_core::{RecordOutcome, SensorPayload, SkipReason, Station, StationError};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

use crate::api::{StatusResponse, UploadPhotoResponse};
use crate::errors::NodeError;
use crate::gallery::{render_gallery, render_sensor_table};

/// The station is built once in main.rs and shared by handle.
/// Appends are atomic per record, so no lock is held across requests.
pub type SharedStation = Arc<Station>;

pub fn build_router(state: SharedStation, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(gallery))
        .route("/upload-bird", post(upload_bird))
        .route("/upload-sensor-data", post(upload_sensor_data))
        .route("/images/:file", get(serve_image))
        .route("/data", get(data_table))
        // Observability
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run station work off the async executor. Local file I/O and the
/// classifier are blocking.
async fn run_blocking<T, F>(f: F) -> Result<T, NodeError>
where
    F: FnOnce() -> Result<T, StationError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            tracing::error!("Blocking task failed: {}", e);
            NodeError::Internal
        })?
        .map_err(NodeError::from)
}

async fn upload_bird(
    State(state): State<SharedStation>,
    body: Bytes,
) -> Result<Json<UploadPhotoResponse>, NodeError> {
    if body.is_empty() {
        return Err(NodeError::InvalidInput("Empty image body".to_string()));
    }

    let event = run_blocking(move || state.ingest_photo(&body, Utc::now())).await?;
    metrics::increment_counter!("birdcam_photos_ingested_total");

    Ok(Json(UploadPhotoResponse {
        status: "ok".to_string(),
        timestamp: event.capture_key,
        species: event.label,
    }))
}

async fn upload_sensor_data(
    State(state): State<SharedStation>,
    payload: Result<Json<SensorPayload>, JsonRejection>,
) -> Result<Json<StatusResponse>, NodeError> {
    let Json(payload) = payload.map_err(|rejection| NodeError::InvalidInput(rejection.body_text()))?;
    let reading = run_blocking(move || state.ingest_reading(payload, Utc::now())).await?;
    metrics::increment_counter!("birdcam_readings_appended_total");
    tracing::debug!(timestamp = %reading.timestamp, "sensor data stored");

    Ok(Json(StatusResponse::ok()))
}

async fn gallery(State(state): State<SharedStation>) -> Result<Html<String>, NodeError> {
    let start = Instant::now();
    let timeline = run_blocking(move || state.timeline()).await?;

    let misses = timeline.iter().filter(|e| e.correlation.is_miss()).count();
    metrics::counter!("birdcam_correlation_misses_total", misses as u64);
    metrics::histogram!("birdcam_timeline_duration_seconds", start.elapsed().as_secs_f64());

    Ok(Html(render_gallery(&timeline)))
}

async fn serve_image(
    State(state): State<SharedStation>,
    Path(file): Path<String>,
) -> Result<Response, NodeError> {
    let path = state.photos().image_path(&file)?;

    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(NodeError::NotFound(format!("No such file: {}", file)))
        }
        Err(e) => return Err(NodeError::from(birdcam_core::StorageError::from(e))),
    };

    let content_type = if file.ends_with(".jpg") || file.ends_with(".jpeg") {
        "image/jpeg"
    } else if file.ends_with(".txt") {
        "text/plain; charset=utf-8"
    } else {
        "application/octet-stream"
    };

    Ok(([(CONTENT_TYPE, content_type)], data).into_response())
}

async fn data_table(State(state): State<SharedStation>) -> Result<Html<String>, NodeError> {
    let outcomes = run_blocking(move || state.events().scan().map_err(StationError::from)).await?;

    let mut readings = Vec::with_capacity(outcomes.len());
    let mut malformed = 0usize;
    for outcome in outcomes {
        match outcome {
            RecordOutcome::Parsed(reading) => readings.push(reading),
            RecordOutcome::Skipped { reason: SkipReason::Blank, .. } => {}
            RecordOutcome::Skipped { line, reason: SkipReason::Malformed(err) } => {
                tracing::debug!(line, "sensor log line skipped: {}", err);
                malformed += 1;
            }
        }
    }
    // Current state of the log, not a running total across requests
    metrics::gauge!("birdcam_log_lines_malformed", malformed as f64);

    readings.reverse();
    Ok(Html(render_sensor_table(&readings)))
}

async fn metrics_handler() -> String {
    crate::telemetry::get_metrics()
}
