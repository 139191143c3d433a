use colored::*;

use crate::chart::{ChartFrame, Phase, THRESHOLD, UNIT, format_forecast};
use crate::intensity::HourBucket;

/// Width of the cleanliness bar column, in characters
const BAR_CHARS: usize = 20;

/// Width of the table without the bar column
const TABLE_WIDTH: usize = 36;

fn style_label(label: &str) -> ColoredString {
    label.bold()
}

pub fn print_error(msg: &str) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{}: {}", "warning".yellow().bold(), msg);
}

pub fn print_status(msg: &str) {
    eprintln!("{}: {}", "status".cyan().bold(), msg);
}

pub fn print_separator() {
    println!("{}", "-".repeat(TABLE_WIDTH + BAR_CHARS + 2));
}

pub fn print_header() {
    println!(
        "{:<10} {:>6}  {:<10} {:>5}  {}",
        "TIME", "FCST", "INDEX", "CLEAN", "CLEANLINESS"
    );
}

/// One table row per bucket; the day boundary gets its own separator
pub fn print_buckets(buckets: &[HourBucket], frame: &ChartFrame) {
    for (i, bucket) in buckets.iter().enumerate().take(frame.len()) {
        if frame.meta.midnight_index == Some(i) {
            print_separator();
        }
        print_bucket_row(bucket, frame, i);
    }
}

fn print_bucket_row(bucket: &HourBucket, frame: &ChartFrame, i: usize) {
    let clean = frame.cleanliness[i];
    let fill = frame.bar_colours[i].colour;
    let bar = "█".repeat((clean * BAR_CHARS as f64).round() as usize);
    let index = if bucket.index.is_empty() {
        "-"
    } else {
        bucket.index.as_str()
    };

    let row = format!(
        "{:<10} {:>6}  {:<10} {:>5.2}",
        frame.times[i],
        format_forecast(bucket.forecast),
        index,
        clean
    );

    match frame.phases[i] {
        Phase::Past => println!("{}  {}", row.dimmed(), bar.truecolor(fill.r, fill.g, fill.b)),
        Phase::Current => println!(
            "{}  {:<width$} {}",
            style_label(&row),
            bar.truecolor(fill.r, fill.g, fill.b),
            "< now".bold(),
            width = BAR_CHARS
        ),
        Phase::Future => println!("{}  {}", row, bar.truecolor(fill.r, fill.g, fill.b)),
    }
}

/// Cleanest hour still ahead and hours above the threshold line
pub fn print_summary(buckets: &[HourBucket], frame: &ChartFrame) {
    let upcoming: Vec<usize> = (0..frame.len().min(buckets.len()))
        .filter(|&i| frame.phases[i] != Phase::Past)
        .collect();

    let cleanest = upcoming
        .iter()
        .copied()
        .max_by(|&a, &b| frame.cleanliness[a].total_cmp(&frame.cleanliness[b]));

    match cleanest {
        Some(i) => println!(
            "Cleanest hour ahead: {} ({} {}, {})",
            style_label(&frame.times[i]),
            format_forecast(buckets[i].forecast),
            UNIT,
            if buckets[i].index.is_empty() {
                "-"
            } else {
                buckets[i].index.as_str()
            }
        ),
        None => println!("Cleanest hour ahead: -"),
    }

    let above = upcoming
        .iter()
        .filter(|&&i| frame.cleanliness[i] >= THRESHOLD)
        .count();
    println!("Hours ahead above {:.2} cleanliness: {}", THRESHOLD, above);
}

pub fn print_legend() {
    println!("FCST: Forecast carbon intensity ({}), hourly average", UNIT);
    println!("INDEX: Most severe upstream index within the hour");
    println!("CLEAN: 1 - forecast / window maximum (1 = cleanest hour in the window)");
}
