pub mod inspect;
pub mod nearest;
pub mod readings;
pub mod timeline;

use anyhow::Context;
use birdcam_core::config::parse_utc_offset;
use birdcam_core::Station;
use std::path::Path;

/// Open the station layout under `dir` for reading. Nothing is created.
pub fn open_station(dir: &Path, utc_offset: &str) -> anyhow::Result<Station> {
    let zone = parse_utc_offset(utc_offset).context("Invalid --utc-offset")?;
    Ok(Station::open_read_only(dir, zone))
}

pub(crate) fn cell(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "-".to_string())
}
