use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use birdcam_core::TimelineEntry;
use std::path::Path;

use super::{cell, open_station};

pub fn build_table(entries: &[TimelineEntry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Capture Key", "Caption", "Reading At", "Delta (s)", "Temp", "Humidity", "Battery"]);

    for entry in entries {
        let c = &entry.correlation;
        match &c.reading {
            Some(r) => table.add_row(vec![
                entry.photo.key.clone(),
                entry.photo.caption.clone(),
                r.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, false),
                c.delta.map(|d| d.num_seconds().to_string()).unwrap_or_default(),
                cell(r.temperature),
                cell(r.humidity),
                cell(r.battery_millivolts),
            ]),
            None => table.add_row(vec![
                entry.photo.key.clone(),
                entry.photo.caption.clone(),
                "no sensor data".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ]),
        };
    }

    table
}

pub fn run(dir: &Path, utc_offset: &str) -> anyhow::Result<()> {
    let station = open_station(dir, utc_offset)?;
    let entries = station.timeline()?;

    println!("\nCapture Timeline (newest first)\n");
    println!("{}\n", build_table(&entries));

    let misses = entries.iter().filter(|e| e.correlation.is_miss()).count();
    if misses > 0 {
        println!("⚠️  {} of {} photos have no sensor reading.\n", misses, entries.len());
    }

    Ok(())
}
