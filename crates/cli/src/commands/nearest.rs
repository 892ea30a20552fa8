use birdcam_core::CorrelationResult;
use std::path::Path;

use super::{cell, open_station};

pub fn describe(result: &CorrelationResult) -> String {
    match (&result.reading, result.delta) {
        (Some(r), delta) => format!(
            "{} -> {} (delta {}s): temp {}, humidity {}, battery {}",
            result.capture_key,
            r.timestamp.to_rfc3339(),
            delta.map(|d| d.num_seconds()).unwrap_or_default(),
            cell(r.temperature),
            cell(r.humidity),
            cell(r.battery_millivolts)
        ),
        (None, _) => format!("{} -> no sensor data", result.capture_key),
    }
}

pub fn run(dir: &Path, utc_offset: &str, key: &str) -> anyhow::Result<CorrelationResult> {
    let station = open_station(dir, utc_offset)?;
    let readings = station.events().load_all()?;
    let result = station.correlator().correlate(key, &readings);

    println!("{}", describe(&result));
    Ok(result)
}
