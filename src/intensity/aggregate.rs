use super::{HourBucket, RawPeriod, Severity};

/// Merge consecutive pairs of raw periods into hourly buckets.
///
/// Pairing is positional (0+1, 2+3, ...), never by period width. A trailing
/// unpaired period is dropped.
pub fn aggregate(periods: &[RawPeriod]) -> Vec<HourBucket> {
    periods
        .chunks_exact(2)
        .map(|pair| merge_pair(&pair[0], &pair[1]))
        .collect()
}

fn merge_pair(first: &RawPeriod, second: &RawPeriod) -> HourBucket {
    HourBucket {
        from: first.from,
        to: second.to,
        forecast: (first.forecast + second.forecast) / 2.0,
        index: pick_index(&first.index, &second.index).to_string(),
    }
}

/// More severe label wins; equal ranks keep the second label.
fn pick_index<'a>(first: &'a str, second: &'a str) -> &'a str {
    match (Severity::parse(first), Severity::parse(second)) {
        (Some(a), Some(b)) => {
            if b >= a {
                second
            } else {
                first
            }
        }
        (Some(_), None) => first,
        (None, Some(_)) => second,
        (None, None) => {
            if !first.is_empty() {
                first
            } else {
                second
            }
        }
    }
}
