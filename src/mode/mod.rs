//! CLI mode implementations

mod forecast;
mod json;

pub use forecast::{ReportOptions, run_forecast};
pub use json::run_json;

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use tracing::info;

use crate::api::{FetchError, IntensityClient, read_payload};
use crate::chart::{self, ChartFrame};
use crate::intensity::{HourBucket, RawPeriod, aggregate};

/// Where the raw forecast comes from
#[derive(Debug, Clone)]
pub enum Source {
    /// Live API under the given base URL
    Api(String),
    /// Saved API response
    File(PathBuf),
}

/// Aggregated forecast plus its chart projection
#[derive(Debug)]
pub struct Forecast {
    pub buckets: Vec<HourBucket>,
    pub frame: ChartFrame,
}

/// Fetch the raw half-hourly periods
pub async fn load_periods<Tz: TimeZone>(
    source: &Source,
    now: &DateTime<Tz>,
) -> Result<Vec<RawPeriod>, FetchError> {
    match source {
        Source::Api(base) => IntensityClient::new(base.as_str())?.fetch(now).await,
        Source::File(path) => read_payload(path),
    }
}

/// Fetch, aggregate and project the forecast as seen at `now`.
///
/// Labels and day markers follow `now`'s timezone.
pub async fn load_forecast<Tz>(source: &Source, now: &DateTime<Tz>) -> Result<Forecast, FetchError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let periods = load_periods(source, now).await?;
    let buckets = aggregate(&periods);
    let frame = chart::build(&buckets, now.with_timezone(&Utc), &now.timezone());

    info!(
        periods = periods.len(),
        buckets = buckets.len(),
        "forecast aggregated"
    );
    Ok(Forecast { buckets, frame })
}
