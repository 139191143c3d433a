//! Render-ready projection of an hourly bucket series

use std::fmt;

use chrono::{DateTime, TimeZone, Timelike, Utc};
use serde::Serialize;

use super::colors::HIGHLIGHT;
use super::gradient::{PAST_DESATURATION, PAST_OPACITY, Rgba, colour_at, desaturate};
use crate::intensity::HourBucket;

/// Axis labels are only shown on this hour cadence
const LABEL_CADENCE_HOURS: u32 = 4;

/// Where a bucket sits relative to the instant the frame was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Past,
    Current,
    Future,
}

impl Phase {
    pub fn of(bucket: &HourBucket, now: DateTime<Utc>) -> Self {
        if now >= bucket.to {
            Phase::Past
        } else if bucket.contains(now) {
            Phase::Current
        } else {
            Phase::Future
        }
    }
}

/// Annotation indices for the overlay layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameMeta {
    pub start_index: usize,
    pub end_index: usize,
    /// First bucket of a new local calendar day
    pub midnight_index: Option<usize>,
    /// Buckets starting exactly at local noon, ascending
    pub noon_indices: Vec<usize>,
}

/// Per-bucket chart data, valid only for the buckets and instant it was built from
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartFrame {
    pub labels: Vec<String>,
    pub times: Vec<String>,
    pub cleanliness: Vec<f64>,
    pub phases: Vec<Phase>,
    pub bar_colours: Vec<Rgba>,
    pub border_colours: Vec<Rgba>,
    pub meta: FrameMeta,
}

impl ChartFrame {
    pub fn len(&self) -> usize {
        self.cleanliness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cleanliness.is_empty()
    }
}

/// Build the chart frame for `buckets` as seen at `now`.
///
/// Labels, noon and midnight detection use each bucket's start time in `tz`.
pub fn build<Tz>(buckets: &[HourBucket], now: DateTime<Utc>, tz: &Tz) -> ChartFrame
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if buckets.is_empty() {
        return ChartFrame::default();
    }

    let max = buckets
        .iter()
        .map(|b| b.forecast)
        .fold(f64::NEG_INFINITY, f64::max);

    let n = buckets.len();
    let mut frame = ChartFrame {
        labels: Vec::with_capacity(n),
        times: Vec::with_capacity(n),
        cleanliness: Vec::with_capacity(n),
        phases: Vec::with_capacity(n),
        bar_colours: Vec::with_capacity(n),
        border_colours: Vec::with_capacity(n),
        meta: FrameMeta {
            start_index: 0,
            end_index: n - 1,
            midnight_index: None,
            noon_indices: Vec::new(),
        },
    };

    let mut prev_date = None;
    for (i, bucket) in buckets.iter().enumerate() {
        let local = bucket.from.with_timezone(tz);
        let (hour, minute) = (local.hour(), local.minute());

        frame.labels.push(axis_label(hour, minute));
        frame.times.push(local.format("%a %H:%M").to_string());

        let date = local.date_naive();
        if frame.meta.midnight_index.is_none() && prev_date.is_some_and(|d| d != date) {
            frame.meta.midnight_index = Some(i);
        }
        prev_date = Some(date);

        if hour == 12 && minute == 0 {
            frame.meta.noon_indices.push(i);
        }

        let clean = cleanliness(bucket.forecast, max);
        let phase = Phase::of(bucket, now);
        let base = colour_at(clean);

        frame.cleanliness.push(clean);
        frame.phases.push(phase);
        frame.bar_colours.push(match phase {
            Phase::Past => desaturate(base, PAST_DESATURATION).with_alpha(PAST_OPACITY),
            Phase::Current | Phase::Future => base.with_alpha(1.0),
        });
        frame.border_colours.push(if phase == Phase::Current {
            HIGHLIGHT
        } else {
            Rgba::TRANSPARENT
        });
    }

    frame
}

/// `1 - forecast / max`; an all-zero series is maximally clean
fn cleanliness(forecast: f64, max: f64) -> f64 {
    if max > 0.0 {
        1.0 - forecast / max
    } else {
        1.0
    }
}

/// Sparse 12-hour label ("12AM", "4PM"), empty off the 4-hour cadence
fn axis_label(hour: u32, minute: u32) -> String {
    if minute != 0 || hour % LABEL_CADENCE_HOURS != 0 {
        return String::new();
    }
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}{}", display, suffix)
}

