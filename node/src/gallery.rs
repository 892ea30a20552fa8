// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! HTML views: the photo gallery and the sensor log table.
//!
//! Every interpolated value goes through `escape_html`.

use birdcam_core::{SensorReading, TimelineEntry};
use std::fmt::Write;

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css";

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn value(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "–".to_string())
}

/// One-line sensor summary for a gallery card.
pub fn sensor_line(reading: &SensorReading) -> String {
    format!(
        "🌡 {}°C 💧 {}% 🔋 {} mV",
        value(reading.temperature),
        value(reading.humidity),
        value(reading.battery_millivolts)
    )
}

pub fn render_gallery(entries: &[TimelineEntry]) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<!doctype html>
<html>
<head>
    <title>BirdCam Gallery</title>
    <link href="{css}" rel="stylesheet">
</head>
<body class="bg-light">
    <div class="container py-4">
        <h1 class="mb-4 text-center">🐦 BirdCam Gallery</h1>
        <div class="row g-4">
"#,
        css = BOOTSTRAP_CSS
    );

    for entry in entries {
        let file = escape_html(&entry.photo.file_name);
        let sensor_info = entry
            .correlation
            .reading
            .as_ref()
            .map(|r| format!("<small>{}</small>", escape_html(&sensor_line(r))))
            .unwrap_or_default();

        let _ = write!(
            html,
            r#"            <div class="col-md-4">
                <div class="card shadow">
                    <img src="/images/{file}" class="card-img-top" alt="{file}">
                    <div class="card-body text-center">
                        <p class="card-text">{caption}</p>
                        <p class="card-text text-muted">{sensor_info}</p>
                    </div>
                </div>
            </div>
"#,
            file = file,
            caption = escape_html(&entry.photo.caption),
            sensor_info = sensor_info
        );
    }

    html.push_str(
        r#"        </div>
    </div>
</body>
</html>
"#,
    );
    html
}

/// Sensor log as a table. Rows are rendered in the order given.
pub fn render_sensor_table(readings: &[SensorReading]) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<html><head><title>Sensor Data</title>
<link href="{css}" rel="stylesheet">
</head><body><div class="container py-4">
<h2>📊 Sensor Data Table</h2>
<table class="table table-striped">
<thead><tr><th>Timestamp</th><th>Temp (°C)</th><th>Humidity (%)</th><th>Battery (mV)</th></tr></thead><tbody>
"#,
        css = BOOTSTRAP_CSS
    );

    for r in readings {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&r.timestamp.to_rfc3339()),
            value(r.temperature),
            value(r.humidity),
            value(r.battery_millivolts)
        );
    }

    html.push_str("</tbody></table></div></body></html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use birdcam_core::{CorrelationResult, PhotoEntry};
    use chrono::DateTime;

    fn reading() -> SensorReading {
        SensorReading::new(DateTime::parse_from_rfc3339("2025-06-01T10:00:00+01:00").unwrap())
            .with_temperature(6.5)
            .with_battery(3300.0)
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"Tit\" & 'Finch'</b>"), "&lt;b&gt;&quot;Tit&quot; &amp; &#39;Finch&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_sensor_line_marks_missing_values() {
        assert_eq!(sensor_line(&reading()), "🌡 6.5°C 💧 –% 🔋 3300 mV");
    }

    #[test]
    fn test_gallery_card_with_and_without_reading() {
        let hit = TimelineEntry {
            photo: PhotoEntry {
                key: "20250601_100012".into(),
                file_name: "20250601_100012.jpg".into(),
                caption: "01 June 2025, 10:00:12 — <Robin>".into(),
            },
            correlation: CorrelationResult {
                capture_key: "20250601_100012".into(),
                reading: Some(reading()),
                delta: None,
            },
        };
        let miss = TimelineEntry {
            photo: PhotoEntry {
                key: "20250601_090000".into(),
                file_name: "20250601_090000.jpg".into(),
                caption: "20250601_090000.jpg".into(),
            },
            correlation: CorrelationResult::miss("20250601_090000"),
        };

        let html = render_gallery(&[hit, miss]);
        assert!(html.contains(r#"<img src="/images/20250601_100012.jpg""#));
        assert!(html.contains("&lt;Robin&gt;"));
        assert!(html.contains("🌡 6.5°C"));
        assert_eq!(html.matches("<small>").count(), 1);
        assert!(html.find("20250601_100012.jpg").unwrap() < html.find("20250601_090000.jpg").unwrap());
    }

    #[test]
    fn test_sensor_table_rows() {
        let html = render_sensor_table(&[reading()]);
        assert!(html.contains("<td>2025-06-01T10:00:00+01:00</td><td>6.5</td><td>–</td><td>3300</td>"));
    }
}
