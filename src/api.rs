//! Carbon Intensity API client
//!
//! Fetches the 48-hour forward forecast from the GB National Grid ESO API,
//! anchored at local midnight of the current day.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::intensity::RawPeriod;

pub const DEFAULT_API_BASE: &str = "https://api.carbonintensity.org.uk/intensity";

/// Forward window requested from the window start
const FORWARD_WINDOW: &str = "fw48h";

/// Timestamp format the API uses in paths and payloads
const API_TIME_FORMAT: &str = "%Y-%m-%dT%H:%MZ";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("carbon intensity API returned HTTP {0}")]
    Status(StatusCode),

    #[error("invalid forecast payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Deserialize)]
struct ApiPeriod {
    #[serde(deserialize_with = "api_timestamp")]
    from: DateTime<Utc>,
    #[serde(deserialize_with = "api_timestamp")]
    to: DateTime<Utc>,
    intensity: ApiIntensity,
}

#[derive(Deserialize)]
struct ApiIntensity {
    forecast: f64,
    #[serde(default)]
    index: Option<String>,
}

impl From<ApiPeriod> for RawPeriod {
    fn from(p: ApiPeriod) -> Self {
        RawPeriod {
            from: p.from,
            to: p.to,
            forecast: p.intensity.forecast,
            index: p.intensity.index.unwrap_or_default(),
        }
    }
}

/// Accepts the API's minute-precision form as well as full RFC 3339
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, API_TIME_FORMAT)
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn api_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", s)))
}

/// Decode a forecast response body.
///
/// A missing or non-array `data` field yields an empty series rather than an
/// error; a body that is not JSON, or an entry that cannot be decoded, fails.
pub fn parse_payload(body: &str) -> Result<Vec<RawPeriod>, FetchError> {
    let mut payload: Value = serde_json::from_str(body)?;

    let data = match payload.get_mut("data").map(Value::take) {
        Some(data @ Value::Array(_)) => data,
        other => {
            warn!(
                data = ?other.as_ref().map(json_kind),
                "forecast payload has no data array, treating as empty"
            );
            return Ok(Vec::new());
        }
    };

    let periods: Vec<ApiPeriod> = serde_json::from_value(data)?;
    Ok(periods.into_iter().map(RawPeriod::from).collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Local midnight of `now`'s calendar day, as a UTC instant
pub fn window_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(chrono::NaiveTime::MIN);
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        // Midnight skipped by a DST change; fall back to the instant itself
        .unwrap_or_else(|| now.with_timezone(&Utc))
}

/// `{base}/{start}/fw48h`
pub fn forecast_url(base: &str, start: DateTime<Utc>) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        start.format(API_TIME_FORMAT),
        FORWARD_WINDOW
    )
}

/// Single-attempt client for the forecast endpoint
pub struct IntensityClient {
    client: Client,
    base: String,
}

impl IntensityClient {
    pub fn new(base: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base: base.into(),
        })
    }

    /// Fetch the forecast window starting at local midnight of `now`.
    ///
    /// No retry and no timeout.
    pub async fn fetch<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<Vec<RawPeriod>, FetchError> {
        let url = forecast_url(&self.base, window_start(now));
        debug!(%url, "fetching carbon intensity forecast");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let periods = parse_payload(&body)?;
        debug!(periods = periods.len(), "forecast received");
        Ok(periods)
    }
}

/// Read a saved API response from disk
pub fn read_payload(path: &Path) -> Result<Vec<RawPeriod>, FetchError> {
    let body = std::fs::read_to_string(path).map_err(|source| FetchError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_payload(&body)
}
