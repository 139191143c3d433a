//! Chart data preparation and rendering for the carbon intensity forecast

mod colors;
mod frame;
mod gradient;
mod layout;
mod render;

pub use colors::HIGHLIGHT;
pub use frame::{ChartFrame, FrameMeta, Phase, build};
pub use gradient::{
    ColourStop, GRADIENT, NEUTRAL_GRAY, PAST_DESATURATION, PAST_OPACITY, Rgb, Rgba, colour_at,
    desaturate,
};
pub use layout::{
    BAR_GAP, BOUNDARY_LINE, DEFAULT_MARGINS, Layout, MIN_BAR_WIDTH, Margins, NOON_LINE, Overlay,
    Stroke, THRESHOLD, THRESHOLD_LINE, overlays,
};
pub use render::{CarbonChart, OutputFormat, Surface, tooltip_text};

/// Chart dimensions
pub const CHART_WIDTH: u32 = 1400;
pub const CHART_HEIGHT: u32 = 600;

/// Unit of the upstream forecast
pub const UNIT: &str = "gCO₂/kWh";

/// Format a forecast for display (e.g., 120.0 -> "120", 72.5 -> "72.5")
pub fn format_forecast(value: f64) -> String {
    if value == value.floor() {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests;
