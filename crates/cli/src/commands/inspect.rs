use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use birdcam_core::{RecordOutcome, SkipReason, Station};
use std::path::Path;

use super::open_station;

pub fn run(dir: &Path, utc_offset: &str) -> anyhow::Result<()> {
    let station = open_station(dir, utc_offset)?;

    println!("\nBirdCam Status Report");
    println!("---------------------");
    println!("{}", build_table(&station));
    Ok(())
}

pub fn build_table(station: &Station) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Store", "Status", "Details"]);

    // 1. Sensor log
    let log_path = station.events().path();
    if log_path.exists() {
        match station.events().scan() {
            Ok(outcomes) => {
                let parsed: Vec<_> = outcomes.iter().filter_map(|o| match o {
                    RecordOutcome::Parsed(r) => Some(r),
                    _ => None,
                }).collect();
                let malformed = outcomes
                    .iter()
                    .filter(|o| matches!(o, RecordOutcome::Skipped { reason: SkipReason::Malformed(_), .. }))
                    .count();
                let span = match (parsed.first(), parsed.last()) {
                    (Some(a), Some(b)) => format!(", {} .. {}", a.timestamp.to_rfc3339(), b.timestamp.to_rfc3339()),
                    _ => String::new(),
                };
                let status = if malformed > 0 { "DEGRADED" } else { "FOUND" };
                table.add_row(vec![
                    "Sensor log".to_string(),
                    status.to_string(),
                    format!("{} readings, {} malformed{}", parsed.len(), malformed, span),
                ]);
            }
            Err(e) => {
                table.add_row(vec!["Sensor log".to_string(), "ERROR".to_string(), e.to_string()]);
            }
        }
    } else {
        table.add_row(vec!["Sensor log".to_string(), "MISSING".to_string(), String::new()]);
    }

    // 2. Photographs
    if !station.photos().dir().is_dir() {
        table.add_row(vec!["Photos".to_string(), "MISSING".to_string(), String::new()]);
        return table;
    }
    match station.photos().list() {
        Ok(entries) => {
            let unlabelled = entries.iter().filter(|e| e.caption == e.file_name).count();
            let newest = entries.first().map(|e| e.key.clone()).unwrap_or_default();
            table.add_row(vec![
                "Photos".to_string(),
                "FOUND".to_string(),
                format!("{} images, {} without sidecar, newest {}", entries.len(), unlabelled, newest),
            ]);
        }
        Err(e) => {
            table.add_row(vec!["Photos".to_string(), "ERROR".to_string(), e.to_string()]);
        }
    }

    table
}
