//! JSON report mode

use serde::Serialize;

use crate::chart::ChartFrame;
use crate::intensity::HourBucket;
use crate::output::print_error;

use super::Forecast;

#[derive(Serialize)]
struct Report<'a> {
    buckets: &'a [HourBucket],
    frame: &'a ChartFrame,
}

/// Print the aggregated buckets and their chart frame as JSON
pub fn run_json(forecast: &Forecast) {
    let report = Report {
        buckets: &forecast.buckets,
        frame: &forecast.frame,
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("Failed to encode report: {}", e)),
    }
}
