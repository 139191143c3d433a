//! Forecast table mode, with optional chart output

use crate::chart::{CarbonChart, Surface};
use crate::output::{
    print_buckets, print_header, print_legend, print_separator, print_summary, print_warning,
};

use super::Forecast;

pub struct ReportOptions {
    pub quiet: bool,
    pub image: Option<Surface>,
}

/// Print the hourly forecast table and render the chart if requested
pub fn run_forecast(forecast: &Forecast, options: &ReportOptions) {
    let Forecast { buckets, frame } = forecast;

    if buckets.is_empty() {
        print_warning("Forecast contains no complete hours");
    } else {
        println!("[Hourly Carbon Intensity]");
        print_header();
        print_separator();
        print_buckets(buckets, frame);
        print_separator();
        print_summary(buckets, frame);
    }

    if !options.quiet {
        println!();
        print_legend();
    }

    // Output chart if requested
    if let Some(surface) = &options.image {
        let path = surface.path.clone();
        match CarbonChart::render(surface.clone(), frame, buckets) {
            Some(_) => eprintln!("Chart saved to: {}", path.display()),
            None => print_warning(&format!("Chart not written: {}", path.display())),
        }
    }
}
