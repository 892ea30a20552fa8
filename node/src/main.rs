// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use birdcam_core::Station;
use birdcam_node::config::NodeConfig;
use birdcam_node::server::{build_router, SharedStation};
use birdcam_node::telemetry::init_telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_telemetry();

    let cfg = NodeConfig::from_env()?;
    tracing::info!("Initializing BirdCam Node with config: {:?}", cfg);

    let station = Station::open(&cfg.data_dir, cfg.utc_offset)?;
    tracing::info!(
        log = ?station.events().path(),
        images = ?station.photos().dir(),
        "Station ready"
    );

    let shared_state: SharedStation = Arc::new(station);
    let app = build_router(shared_state, cfg.max_upload_bytes);

    let addr = cfg.bind_addr;
    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
