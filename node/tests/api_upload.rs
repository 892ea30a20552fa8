// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use birdcam_core::classifier::FixedClassifier;
use birdcam_core::config::SENSOR_LOG_FILE;
use birdcam_core::{SensorPayload, Station};
use birdcam_node::api::{StatusResponse, UploadPhotoResponse};
use birdcam_node::server::build_router;
use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt; // for oneshot

fn zone() -> FixedOffset {
    FixedOffset::east_opt(3600).unwrap()
}

fn setup() -> (TempDir, Arc<Station>, Router) {
    let dir = tempdir().unwrap();
    let station = Station::open(dir.path(), zone())
        .unwrap()
        .with_classifier(FixedClassifier("European Robin".into()));
    let shared_state = Arc::new(station);
    let app = build_router(shared_state.clone(), 1024 * 1024);
    (dir, shared_state, app)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_upload_bird_stores_and_labels() {
    let (_dir, station, app) = setup();

    let req = Request::builder()
        .method("POST")
        .uri("/upload-bird")
        .header("content-type", "image/jpeg")
        .body(Body::from(vec![0xff, 0xd8, 0xff, 0xe0]))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let resp: UploadPhotoResponse = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(resp.status, "ok");
    assert_eq!(resp.species, "European Robin");
    assert_eq!(resp.timestamp.len(), 15);

    let entries = station.photos().list().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key, resp.timestamp);
    assert!(entries[0].caption.ends_with(" — European Robin"));
}

#[tokio::test]
async fn test_upload_bird_rejects_empty_body() {
    let (_dir, station, app) = setup();

    let req = Request::builder()
        .method("POST")
        .uri("/upload-bird")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(station.photos().list().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_sensor_data_appends() {
    let (_dir, station, app) = setup();

    let req = Request::builder()
        .method("POST")
        .uri("/upload-sensor-data")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"temp": 4.5, "battery_mv": 3100}"#))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let resp: StatusResponse = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(resp.status, "ok");

    let readings = station.events().load_all().unwrap();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].temperature, Some(4.5));
    assert_eq!(readings[0].humidity, None);
    assert_eq!(readings[0].battery_millivolts, Some(3100.0));
    assert_eq!(readings[0].timestamp.offset().local_minus_utc(), 3600);
}

#[tokio::test]
async fn test_upload_sensor_data_rejects_bad_json() {
    let (_dir, station, app) = setup();

    let req = Request::builder()
        .method("POST")
        .uri("/upload-sensor-data")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"temp": "warm"}"#))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(body["error"].is_string());
    assert!(station.events().load_all().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_sensor_data_without_json_content_type() {
    let (_dir, station, app) = setup();

    let req = Request::builder()
        .method("POST")
        .uri("/upload-sensor-data")
        .body(Body::from(r#"{"temp": 4.5}"#))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(body["error"].as_str().unwrap().contains("Content-Type"));
    assert!(station.events().load_all().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_sensor_data_storage_failure_is_500() {
    let dir = tempdir().unwrap();
    // A directory where the log file should be makes every append fail
    std::fs::create_dir(dir.path().join(SENSOR_LOG_FILE)).unwrap();
    let station = Arc::new(Station::open(dir.path(), zone()).unwrap());
    let app = build_router(station, 1024 * 1024);

    let req = Request::builder()
        .method("POST")
        .uri("/upload-sensor-data")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"temp": 4.5}"#))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"], "Storage failure");
}

#[tokio::test]
async fn test_gallery_shows_correlated_reading() {
    let (_dir, station, app) = setup();
    let t0 = DateTime::parse_from_rfc3339("2025-06-01T09:00:00Z").unwrap().with_timezone(&Utc);

    station
        .ingest_reading(SensorPayload { temp: Some(5.0), humidity: Some(88.0), battery_mv: Some(3300.0) }, t0)
        .unwrap();
    station.ingest_photo(b"img", t0 + chrono::Duration::seconds(5)).unwrap();
    std::fs::write(station.photos().dir().join("20250601_110000.jpg"), b"orphan").unwrap();

    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("01 June 2025, 10:00:05 — European Robin"));
    assert!(html.contains("🌡 5°C 💧 88% 🔋 3300 mV"));
    // Orphan image without sidecar falls back to its file name and sorts first
    assert!(html.contains(r#"<p class="card-text">20250601_110000.jpg</p>"#));
    assert!(html.find("20250601_110000.jpg").unwrap() < html.find("20250601_100005.jpg").unwrap());
}

#[tokio::test]
async fn test_data_table_tolerates_corrupt_lines() {
    let (_dir, station, app) = setup();
    let t0 = DateTime::parse_from_rfc3339("2025-06-01T09:00:00Z").unwrap().with_timezone(&Utc);

    station.ingest_reading(SensorPayload { temp: Some(1.0), ..Default::default() }, t0).unwrap();
    {
        use std::io::Write;
        let mut f = std::fs::OpenOptions::new().append(true).open(station.events().path()).unwrap();
        f.write_all(b"garbage\n").unwrap();
    }
    station
        .ingest_reading(SensorPayload { temp: Some(2.0), ..Default::default() }, t0 + chrono::Duration::minutes(1))
        .unwrap();

    let req = Request::builder().uri("/data").body(Body::empty()).unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert_eq!(html.matches("<tr><td>").count(), 2);
    // Newest first
    assert!(html.find("10:01:00").unwrap() < html.find("10:00:00").unwrap());
}

#[tokio::test]
async fn test_serve_image() {
    let (_dir, station, app) = setup();
    let now = DateTime::parse_from_rfc3339("2025-06-01T09:00:00Z").unwrap().with_timezone(&Utc);
    let event = station.ingest_photo(b"jpeg-bytes", now).unwrap();

    let req = Request::builder()
        .uri(format!("/images/{}.jpg", event.capture_key))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/jpeg");
    assert_eq!(body_string(response).await, "jpeg-bytes");

    let req = Request::builder().uri("/images/missing.jpg").body(Body::empty()).unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
