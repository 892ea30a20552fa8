use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use birdcam_core::{RecordOutcome, SkipReason};
use std::path::Path;

use super::{cell, open_station};

/// Newest first. Skipped lines are listed only when `show_skipped` is set.
pub fn build_table(outcomes: &[RecordOutcome], show_skipped: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Timestamp", "Temp (°C)", "Humidity (%)", "Battery (mV)"]);

    for outcome in outcomes.iter().rev() {
        match outcome {
            RecordOutcome::Parsed(r) => {
                table.add_row(vec![
                    r.timestamp.to_rfc3339(),
                    cell(r.temperature),
                    cell(r.humidity),
                    cell(r.battery_millivolts),
                ]);
            }
            RecordOutcome::Skipped { line, reason } if show_skipped => {
                let why = match reason {
                    SkipReason::Blank => "blank line".to_string(),
                    SkipReason::Malformed(e) => e.to_string(),
                };
                table.add_row(vec![format!("SKIPPED line {}", line), why, String::new(), String::new()]);
            }
            RecordOutcome::Skipped { .. } => {}
        }
    }

    table
}

pub fn run(dir: &Path, utc_offset: &str, show_skipped: bool) -> anyhow::Result<()> {
    let station = open_station(dir, utc_offset)?;
    let outcomes = station.events().scan()?;

    let skipped = outcomes
        .iter()
        .filter(|o| matches!(o, RecordOutcome::Skipped { reason: SkipReason::Malformed(_), .. }))
        .count();

    println!("\nSensor Log: {:?}\n", station.events().path());
    println!("{}\n", build_table(&outcomes, show_skipped));

    if skipped > 0 {
        println!("⚠️  {} malformed line(s) skipped.\n", skipped);
    }

    Ok(())
}
