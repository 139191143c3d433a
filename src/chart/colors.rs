//! Color definitions for charts

use super::gradient::{Rgb, Rgba};

/// Common colors
pub(super) const COLOR_BACKGROUND: &str = "#0A0A0C"; // Near black
pub(super) const COLOR_TEXT: &str = "#FFFFFF"; // White

/// Border of the bar covering the current instant
pub const HIGHLIGHT: Rgba = Rgba::opaque(Rgb::new(255, 255, 255));

/// Threshold line: semi-transparent white
pub(super) const THRESHOLD_STROKE: Rgba = Rgba::new(255, 255, 255, 0.5);

/// Day and noon markers: semi-transparent gray
pub(super) const MARKER_STROKE: Rgba = Rgba::new(160, 160, 160, 0.5);
