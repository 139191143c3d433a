use std::path::PathBuf;

use chrono::{DateTime, Local};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use carbonstat::api::{DEFAULT_API_BASE, parse_timestamp};
use carbonstat::chart::{CHART_HEIGHT, CHART_WIDTH, OutputFormat, Surface};
use carbonstat::mode::{self, ReportOptions, Source};
use carbonstat::output::print_error;
use carbonstat::status::StatusSink;

/// Smallest accepted chart dimension in pixels
const MIN_CHART_SIZE: u32 = 100;

#[derive(Parser)]
#[command(
    name = "carbonstat",
    version,
    about = "Carbon intensity forecast analyzer for the GB electricity grid",
    after_help = "Examples:
  carbonstat                                   Hourly forecast table for the next 48h
  carbonstat --image chart.html                Interactive chart with hover details
  carbonstat --image chart.png --width 2800    PNG chart
  carbonstat --input saved.json --now 2024-01-01T09:00Z   Offline, fixed clock
  carbonstat --json                            Buckets and chart data as JSON"
)]
struct Args {
    /// Carbon Intensity API base URL
    #[arg(long, default_value = DEFAULT_API_BASE, value_name = "URL")]
    api_base: String,

    /// Read a saved API response instead of fetching
    #[arg(long, value_name = "FILE", conflicts_with = "api_base")]
    input: Option<PathBuf>,

    /// Use this instant instead of the system clock (RFC 3339)
    #[arg(long, value_name = "TIME")]
    now: Option<String>,

    /// Output chart (.html, .svg or .png)
    #[arg(long, value_name = "PATH")]
    image: Option<PathBuf>,

    /// Chart width in pixels
    #[arg(long, default_value_t = CHART_WIDTH, value_name = "PX")]
    width: u32,

    /// Chart height in pixels
    #[arg(long, default_value_t = CHART_HEIGHT, value_name = "PX")]
    height: u32,

    /// File whose content is replaced by the status message on failure
    #[arg(long, value_name = "FILE")]
    status_file: Option<PathBuf>,

    /// Print buckets and chart data as JSON instead of the table
    #[arg(long)]
    json: bool,

    /// Suppress explanations (show data only)
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn init_tracing(ansi: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(ansi)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    // Handle --no-color
    if args.no_color {
        colored::control::set_override(false);
    }
    init_tracing(!args.no_color);

    // Validate chart size
    if args.width < MIN_CHART_SIZE || args.height < MIN_CHART_SIZE {
        print_error(&format!(
            "Chart size must be at least {}x{} pixels",
            MIN_CHART_SIZE, MIN_CHART_SIZE
        ));
        std::process::exit(1);
    }

    // Validate chart format
    if let Some(ref path) = args.image
        && OutputFormat::from_path(path).is_none()
    {
        print_error("--image must end in .html, .svg or .png");
        std::process::exit(1);
    }

    if args.json && args.image.is_some() {
        print_error("--image cannot be used with --json");
        std::process::exit(1);
    }

    let now: DateTime<Local> = match args.now.as_deref() {
        Some(s) => match parse_timestamp(s) {
            Some(t) => t.with_timezone(&Local),
            None => {
                print_error(&format!("Invalid --now timestamp: {}", s));
                std::process::exit(1);
            }
        },
        None => Local::now(),
    };

    let source = match args.input {
        Some(path) => Source::File(path),
        None => Source::Api(args.api_base),
    };

    let status = StatusSink::new(args.status_file);
    let forecast = match mode::load_forecast(&source, &now).await {
        Ok(forecast) => forecast,
        Err(e) => {
            tracing::error!(error = %e, "carbon intensity forecast failed");
            status.report_unavailable();
            std::process::exit(1);
        }
    };
    status.clear();

    if args.json {
        mode::run_json(&forecast);
    } else {
        let options = ReportOptions {
            quiet: args.quiet,
            image: args
                .image
                .map(|path| Surface::new(path, args.width, args.height)),
        };
        mode::run_forecast(&forecast, &options);
    }
}
