use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Value, json};

/// Half-hour periods in the 48-hour forward window
const PERIODS: i64 = 96;

fn index_for(forecast: f64) -> &'static str {
    match forecast {
        f if f < 60.0 => "very low",
        f if f < 120.0 => "low",
        f if f < 200.0 => "moderate",
        f if f < 280.0 => "high",
        _ => "very high",
    }
}

/// Evening peak around 18:00, overnight trough, plus a slow drift
fn diurnal(t: DateTime<Utc>, step: i64) -> f64 {
    let hour = (t.timestamp().rem_euclid(86_400)) as f64 / 3600.0;
    let daily = (2.0 * PI * (hour - 12.0) / 24.0).cos();
    let drift = 20.0 * (step as f64 / PERIODS as f64);
    (150.0 - 90.0 * daily + drift).round()
}

fn payload(start: DateTime<Utc>) -> Value {
    let data: Vec<Value> = (0..PERIODS)
        .map(|i| {
            let from = start + Duration::minutes(30 * i);
            let to = from + Duration::minutes(30);
            let forecast = diurnal(from, i);
            json!({
                "from": from.format("%Y-%m-%dT%H:%MZ").to_string(),
                "to": to.format("%Y-%m-%dT%H:%MZ").to_string(),
                "intensity": { "forecast": forecast, "actual": null, "index": index_for(forecast) }
            })
        })
        .collect();
    json!({ "data": data })
}

fn write_payload(path: &Path, value: &Value) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

fn main() -> std::io::Result<()> {
    let dir = Path::new("test_data");
    std::fs::create_dir_all(dir)?;

    // Fixed window so runs with --now are reproducible
    let start = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| std::io::Error::other("invalid fixture start"))?;
    write_payload(&dir.join("fw48h.json"), &payload(start))?;

    // Odd period count: the trailing half hour is dropped by aggregation
    let mut odd = payload(start);
    if let Some(data) = odd["data"].as_array_mut() {
        data.truncate(7);
    }
    write_payload(&dir.join("odd.json"), &odd)?;

    write_payload(&dir.join("no_data.json"), &json!({ "error": "unavailable" }))?;

    println!("Generated: fw48h.json, odd.json, no_data.json");
    Ok(())
}
