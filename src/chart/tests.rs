//! Unit tests for chart data preparation

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use tempfile::TempDir;

use super::render::build_chart;
use super::*;
use crate::intensity::HourBucket;

fn at(day: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, h, 0, 0).unwrap()
}

fn bucket(from: DateTime<Utc>, forecast: f64, index: &str) -> HourBucket {
    HourBucket {
        from,
        to: from + Duration::hours(1),
        forecast,
        index: index.to_string(),
    }
}

/// One bucket per hour starting at `start`
fn hourly(start: DateTime<Utc>, forecasts: &[f64]) -> Vec<HourBucket> {
    forecasts
        .iter()
        .enumerate()
        .map(|(i, &f)| bucket(start + Duration::hours(i as i64), f, "moderate"))
        .collect()
}

// =============================================================================
// Gradient
// =============================================================================

#[test]
fn test_colour_at_endpoints_match_stops() {
    assert_eq!(colour_at(0.0), GRADIENT[0].colour);
    assert_eq!(colour_at(1.0), GRADIENT[4].colour);
}

#[test]
fn test_colour_at_on_stop_values_are_exact() {
    for stop in &GRADIENT {
        assert_eq!(colour_at(stop.stop), stop.colour, "stop {}", stop.stop);
    }
    assert_eq!(colour_at(0.25), GRADIENT[1].colour);
}

#[test]
fn test_colour_at_interpolates_and_rounds() {
    // Halfway between red (215, 48, 39) and orange (252, 141, 89)
    assert_eq!(colour_at(0.125), Rgb::new(234, 95, 64));
}

#[test]
fn test_colour_at_clamps_out_of_range() {
    assert_eq!(colour_at(-3.0), colour_at(0.0));
    assert_eq!(colour_at(7.5), colour_at(1.0));
    assert_eq!(colour_at(f64::NAN), colour_at(0.0));
}

#[test]
fn test_gradient_continuity() {
    let steps = 200;
    for i in 1..=steps {
        let a = colour_at((i - 1) as f64 / steps as f64);
        let b = colour_at(i as f64 / steps as f64);
        let jump = (a.r as i32 - b.r as i32).abs()
            + (a.g as i32 - b.g as i32).abs()
            + (a.b as i32 - b.b as i32).abs();
        assert!(jump < 30, "Gradient jumps by {} at step {}", jump, i);
    }
}

#[test]
fn test_desaturate_zero_is_identity() {
    for stop in &GRADIENT {
        assert_eq!(desaturate(stop.colour, 0.0), stop.colour);
    }
}

#[test]
fn test_desaturate_one_is_gray() {
    for stop in &GRADIENT {
        assert_eq!(desaturate(stop.colour, 1.0), NEUTRAL_GRAY);
    }
    assert_eq!(desaturate(Rgb::new(0, 255, 7), 1.0), Rgb::new(128, 128, 128));
}

#[test]
fn test_desaturate_partial_blend() {
    assert_eq!(
        desaturate(GRADIENT[0].colour, PAST_DESATURATION),
        Rgb::new(158, 100, 97)
    );
}

#[test]
fn test_rgba_css() {
    assert_eq!(Rgb::new(1, 2, 3).with_alpha(0.75).css(), "rgba(1, 2, 3, 0.75)");
    assert_eq!(Rgba::TRANSPARENT.css(), "rgba(0, 0, 0, 0)");
}

// =============================================================================
// Frame builder
// =============================================================================

#[test]
fn test_build_empty() {
    let frame = build(&[], at(1, 0), &Utc);
    assert!(frame.is_empty());
    assert!(frame.labels.is_empty());
    assert!(frame.bar_colours.is_empty());
    assert!(frame.border_colours.is_empty());
    assert_eq!(frame.meta, FrameMeta::default());
}

#[test]
fn test_build_cleanliness_is_max_normalized() {
    let buckets = hourly(at(1, 0), &[200.0, 100.0, 0.0]);
    let frame = build(&buckets, at(1, 0), &Utc);
    assert_eq!(frame.cleanliness, vec![0.0, 0.5, 1.0]);
}

#[test]
fn test_build_all_zero_is_fully_clean() {
    let buckets = hourly(at(1, 0), &[0.0, 0.0, 0.0, 0.0]);
    let frame = build(&buckets, at(1, 0), &Utc);
    assert!(frame.cleanliness.iter().all(|&c| c == 1.0));
    assert!(frame.cleanliness.iter().all(|c| !c.is_nan()));
}

#[test]
fn test_build_now_on_bucket_start_is_current() {
    let buckets = hourly(at(1, 0), &[100.0, 100.0, 100.0]);
    let frame = build(&buckets, at(1, 1), &Utc);

    assert_eq!(frame.phases, vec![Phase::Past, Phase::Current, Phase::Future]);
    assert_eq!(frame.border_colours[1], HIGHLIGHT);
    assert_eq!(frame.border_colours[0], Rgba::TRANSPARENT);
    assert_eq!(frame.border_colours[2], Rgba::TRANSPARENT);
}

#[test]
fn test_build_past_bars_are_faded() {
    let buckets = hourly(at(1, 0), &[100.0, 100.0]);
    let frame = build(&buckets, at(1, 1), &Utc);

    let base = colour_at(0.0);
    assert_eq!(
        frame.bar_colours[0],
        desaturate(base, PAST_DESATURATION).with_alpha(PAST_OPACITY)
    );
    assert_eq!(frame.bar_colours[1], base.with_alpha(1.0));
}

#[test]
fn test_build_labels_every_four_hours() {
    let buckets = hourly(at(1, 0), &[100.0; 24]);
    let frame = build(&buckets, at(1, 0), &Utc);

    let labelled: Vec<(usize, &str)> = frame
        .labels
        .iter()
        .enumerate()
        .filter(|(_, l)| !l.is_empty())
        .map(|(i, l)| (i, l.as_str()))
        .collect();
    assert_eq!(
        labelled,
        vec![
            (0, "12AM"),
            (4, "4AM"),
            (8, "8AM"),
            (12, "12PM"),
            (16, "4PM"),
            (20, "8PM"),
        ]
    );
}

#[test]
fn test_build_labels_need_zero_minutes() {
    let from = Utc.with_ymd_and_hms(2024, 1, 1, 4, 30, 0).unwrap();
    let frame = build(&[bucket(from, 50.0, "low")], from, &Utc);
    assert_eq!(frame.labels, vec![String::new()]);
    assert!(frame.meta.noon_indices.is_empty());
}

#[test]
fn test_build_meta_indices() {
    let buckets = hourly(at(1, 0), &[100.0; 48]);
    let frame = build(&buckets, at(1, 0), &Utc);

    assert_eq!(frame.meta.start_index, 0);
    assert_eq!(frame.meta.end_index, 47);
    assert_eq!(frame.meta.midnight_index, Some(24));
    assert_eq!(frame.meta.noon_indices, vec![12, 36]);
}

#[test]
fn test_build_midnight_follows_late_bucket() {
    let buckets = vec![bucket(at(1, 23), 80.0, "low"), bucket(at(2, 0), 90.0, "low")];
    let frame = build(&buckets, at(1, 0), &Utc);
    assert_eq!(frame.meta.midnight_index, Some(1));
}

#[test]
fn test_build_no_midnight_within_one_day() {
    let buckets = hourly(at(1, 1), &[100.0; 10]);
    let frame = build(&buckets, at(1, 0), &Utc);
    assert_eq!(frame.meta.midnight_index, None);
}

#[test]
fn test_build_uses_given_timezone() {
    // 11:00 UTC is noon in UTC+1, and 23:00 UTC is already the next day there
    let tz = FixedOffset::east_opt(3600).unwrap();
    let buckets = vec![
        bucket(at(1, 11), 100.0, "low"),
        bucket(at(1, 22), 100.0, "low"),
        bucket(at(1, 23), 100.0, "low"),
    ];
    let frame = build(&buckets, at(1, 0), &tz);

    assert_eq!(frame.labels[0], "12PM");
    assert_eq!(frame.meta.noon_indices, vec![0]);
    assert_eq!(frame.meta.midnight_index, Some(2));
    assert_eq!(frame.times[0], "Mon 12:00");
}

// =============================================================================
// Layout and overlays
// =============================================================================

#[test]
fn test_bar_width_fills_plot() {
    let layout = Layout::new(1448, 600, 48);
    // 1448 - 24 - 24 = 1400 px of plot
    assert_eq!(layout.plot_width(), 1400.0);
    assert!((layout.bar_width() - (1400.0 / 48.0 - BAR_GAP)).abs() < 1e-9);
}

#[test]
fn test_bar_width_has_floor() {
    let layout = Layout::new(200, 600, 48);
    assert_eq!(layout.bar_width(), MIN_BAR_WIDTH);
    assert_eq!(Layout::new(10, 10, 48).bar_width(), MIN_BAR_WIDTH);
    assert_eq!(Layout::new(1400, 600, 0).bar_width(), MIN_BAR_WIDTH);
}

#[test]
fn test_overlays_composition() {
    let meta = FrameMeta {
        start_index: 0,
        end_index: 47,
        midnight_index: Some(24),
        noon_indices: vec![12, 36],
    };
    let lines = overlays(&meta);

    assert_eq!(
        lines,
        vec![
            Overlay::Horizontal {
                value: THRESHOLD,
                stroke: THRESHOLD_LINE,
            },
            Overlay::Vertical {
                index: 0,
                stroke: BOUNDARY_LINE,
            },
            Overlay::Vertical {
                index: 47,
                stroke: BOUNDARY_LINE,
            },
            Overlay::Vertical {
                index: 24,
                stroke: BOUNDARY_LINE,
            },
            Overlay::Vertical {
                index: 12,
                stroke: NOON_LINE,
            },
            Overlay::Vertical {
                index: 36,
                stroke: NOON_LINE,
            },
        ]
    );
}

#[test]
fn test_overlays_skip_missing_midnight() {
    let meta = FrameMeta {
        start_index: 0,
        end_index: 5,
        midnight_index: None,
        noon_indices: vec![],
    };
    assert_eq!(overlays(&meta).len(), 3);
}

#[test]
fn test_overlay_strokes() {
    assert_eq!(THRESHOLD_LINE.width, 2.0);
    assert_eq!(THRESHOLD_LINE.dash, Some([5.0, 5.0]));
    assert_eq!(BOUNDARY_LINE.dash, None);
    assert_eq!(NOON_LINE.dash, Some([3.0, 3.0]));
    assert_eq!(NOON_LINE.colour, BOUNDARY_LINE.colour);
}

// =============================================================================
// Chart options
// =============================================================================

#[test]
fn test_chart_options_carry_geometry_and_overlays() {
    let buckets = hourly(at(1, 0), &[100.0; 24]);
    let frame = build(&buckets, at(1, 0), &Utc);
    let layout = Layout::new(CHART_WIDTH, CHART_HEIGHT, frame.len());

    let json = serde_json::to_value(build_chart(&frame, &buckets, &layout)).unwrap();
    let series = &json["series"][0];

    let bar_width = series["barWidth"].as_f64().unwrap();
    assert!((bar_width - layout.bar_width()).abs() < 1e-9);

    assert_eq!(series["data"].as_array().unwrap().len(), 24);

    // Threshold on the bars: white at half opacity, 2px, dashed
    let threshold = &series["markLine"];
    assert_eq!(threshold["data"].as_array().unwrap().len(), 1);
    assert_eq!(threshold["data"][0]["yAxis"].as_f64(), Some(THRESHOLD));
    assert_eq!(threshold["lineStyle"]["type"], "dashed");
    assert_eq!(threshold["lineStyle"]["width"].as_f64(), Some(2.0));
    assert_eq!(threshold["lineStyle"]["color"], "rgba(255, 255, 255, 0.5)");

    // Start and end markers: grey, 1px, solid
    let boundaries = &json["series"][1]["markLine"];
    let indices: Vec<f64> = boundaries["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["xAxis"].as_f64().unwrap())
        .collect();
    assert_eq!(indices, vec![0.0, 23.0]);
    assert_eq!(boundaries["lineStyle"]["type"], "solid");
    assert_eq!(boundaries["lineStyle"]["width"].as_f64(), Some(1.0));
    assert_eq!(boundaries["lineStyle"]["color"], "rgba(160, 160, 160, 0.5)");

    // Noon marker: grey, 1px, dotted so it reads apart from the threshold
    let noon = &json["series"][2]["markLine"];
    assert_eq!(noon["data"][0]["xAxis"].as_f64(), Some(12.0));
    assert_eq!(noon["lineStyle"]["type"], "dotted");
    assert_eq!(noon["lineStyle"]["width"].as_f64(), Some(1.0));
    assert_eq!(noon["lineStyle"]["color"], "rgba(160, 160, 160, 0.5)");

    assert_eq!(json["series"].as_array().unwrap().len(), 3);
}

#[test]
fn test_chart_options_group_midnight_with_boundaries() {
    let buckets = hourly(at(1, 0), &[100.0; 48]);
    let frame = build(&buckets, at(1, 0), &Utc);
    let layout = Layout::new(CHART_WIDTH, CHART_HEIGHT, frame.len());

    let json = serde_json::to_value(build_chart(&frame, &buckets, &layout)).unwrap();

    let boundaries = json["series"][1]["markLine"]["data"].as_array().unwrap();
    assert_eq!(boundaries.len(), 3);
    assert_eq!(boundaries[2]["xAxis"].as_f64(), Some(24.0));

    let noons = json["series"][2]["markLine"]["data"].as_array().unwrap();
    assert_eq!(noons.len(), 2);
}

#[test]
fn test_tooltip_uses_unnormalized_forecast() {
    let buckets = vec![bucket(at(1, 0), 120.0, "moderate"), bucket(at(1, 1), 60.0, "")];
    let frame = build(&buckets, at(1, 0), &Utc);

    assert_eq!(
        tooltip_text(&frame.times[0], &buckets[0]),
        "Mon 00:00<br/>120 gCO₂/kWh<br/>Index: moderate"
    );
    assert_eq!(
        tooltip_text(&frame.times[1], &buckets[1]),
        "Mon 01:00<br/>60 gCO₂/kWh<br/>Index: n/a"
    );

    let layout = Layout::new(CHART_WIDTH, CHART_HEIGHT, frame.len());
    let json = serde_json::to_string(&build_chart(&frame, &buckets, &layout)).unwrap();
    assert!(json.contains("120 gCO₂/kWh"));
}

#[test]
fn test_format_forecast() {
    assert_eq!(format_forecast(120.0), "120");
    assert_eq!(format_forecast(72.5), "72.5");
    assert_eq!(format_forecast(0.0), "0");
}

// =============================================================================
// Renderer
// =============================================================================

#[test]
fn test_output_format_from_extension() {
    use std::path::Path;
    assert_eq!(
        OutputFormat::from_path(Path::new("a/chart.HTML")),
        Some(OutputFormat::Html)
    );
    assert_eq!(
        OutputFormat::from_path(Path::new("chart.svg")),
        Some(OutputFormat::Svg)
    );
    assert_eq!(
        OutputFormat::from_path(Path::new("chart.png")),
        Some(OutputFormat::Png)
    );
    assert_eq!(OutputFormat::from_path(Path::new("chart.gif")), None);
    assert_eq!(OutputFormat::from_path(Path::new("chart")), None);
}

#[test]
fn test_render_empty_frame_is_noop() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("chart.html");
    let surface = Surface::new(&path, CHART_WIDTH, CHART_HEIGHT);

    assert!(CarbonChart::render(surface, &ChartFrame::default(), &[]).is_none());
    assert!(!path.exists());
}

#[test]
fn test_render_missing_directory_is_noop() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing").join("chart.html");
    let buckets = hourly(at(1, 0), &[100.0, 50.0]);
    let frame = build(&buckets, at(1, 0), &Utc);

    let surface = Surface::new(&path, CHART_WIDTH, CHART_HEIGHT);
    assert!(CarbonChart::render(surface, &frame, &buckets).is_none());
    assert!(!path.exists());
}

#[test]
fn test_render_html_and_resize() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("chart.html");
    let buckets = hourly(at(1, 0), &[100.0; 48]);
    let frame = build(&buckets, at(1, 5), &Utc);

    let surface = Surface::new(&path, CHART_WIDTH, CHART_HEIGHT);
    let mut chart = CarbonChart::render(surface, &frame, &buckets).expect("chart should render");
    assert!(path.exists());
    let wide = chart.layout().bar_width();

    assert!(chart.resize(400, 300));
    assert_eq!(chart.surface().width, 400);
    assert_eq!(chart.layout().bar_width(), MIN_BAR_WIDTH);
    assert!(chart.layout().bar_width() < wide);

    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("Cleanliness"));
}
