//! Carbon intensity forecast periods and their hourly aggregation

mod aggregate;
mod severity;

pub use aggregate::aggregate;
pub use severity::Severity;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One upstream forecast sample (half-hourly in the live feed)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawPeriod {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// gCO₂/kWh
    pub forecast: f64,
    /// Severity label as sent upstream; may be empty
    pub index: String,
}

/// Aggregate of two consecutive raw periods
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourBucket {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub forecast: f64,
    pub index: String,
}

impl HourBucket {
    /// Half-open containment: `from <= now < to`
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.from <= now && now < self.to
    }
}
