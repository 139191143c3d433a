//! Common test utilities

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use serde_json::{Value, json};
use tempfile::TempDir;

/// One upstream period: minutes after 2024-01-01T00:00Z, forecast, index
pub struct Period(pub i64, pub f64, pub &'static str);

fn timestamp(minutes: i64) -> String {
    let day = 1 + minutes / (24 * 60);
    let hour = (minutes / 60) % 24;
    let minute = minutes % 60;
    format!("2024-01-{:02}T{:02}:{:02}Z", day, hour, minute)
}

/// Build an API payload from half-hour periods
pub fn payload(periods: &[Period]) -> Value {
    let data: Vec<Value> = periods
        .iter()
        .map(|Period(start, forecast, index)| {
            json!({
                "from": timestamp(*start),
                "to": timestamp(start + 30),
                "intensity": { "forecast": forecast, "actual": null, "index": index }
            })
        })
        .collect();
    json!({ "data": data })
}

/// 48 hours of half-hour periods with a daily cycle (cleanest at 03:00)
pub fn two_day_payload() -> Value {
    let periods: Vec<Period> = (0..96)
        .map(|i| {
            let hour = (i / 2) % 24;
            let forecast = 60.0 + 10.0 * ((hour + 21) % 24) as f64;
            let index = match forecast {
                f if f < 100.0 => "low",
                f if f < 200.0 => "moderate",
                _ => "high",
            };
            Period(i * 30, forecast, index)
        })
        .collect();
    payload(&periods)
}

/// Write a payload into `dir` and return its path
pub fn write_payload(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
    let path = dir.path().join(name);
    write_json(&path, value);
    path
}

pub fn write_json(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// Answer a single HTTP request on a local port.
///
/// Returns the base URL to point `--api-base` at and a handle that yields the
/// request line once the response has been sent.
pub fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/intensity", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();

        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        let request = String::from_utf8_lossy(&request);
        request.lines().next().unwrap_or_default().to_string()
    });

    (base, handle)
}
