//! Bar geometry and overlay strokes
//!
//! The plot area is pinned in pixels so the bars and the overlay lines are
//! drawn against the same rectangle. Bar width is derived from that rectangle
//! on every layout pass instead of being left to the chart library.

use super::colors::{MARKER_STROKE, THRESHOLD_STROKE};
use super::frame::FrameMeta;
use super::gradient::Rgba;

/// Narrowest bar, in pixels, however many buckets are plotted
pub const MIN_BAR_WIDTH: f64 = 6.0;

/// Horizontal gap between neighbouring bars, in pixels
pub const BAR_GAP: f64 = 1.0;

/// Cleanliness value of the horizontal reference line
pub const THRESHOLD: f64 = 0.66;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Room for the title above and the hour labels below
pub const DEFAULT_MARGINS: Margins = Margins {
    top: 80.0,
    right: 24.0,
    bottom: 48.0,
    left: 24.0,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    width: u32,
    height: u32,
    margins: Margins,
    bar_count: usize,
}

impl Layout {
    pub fn new(width: u32, height: u32, bar_count: usize) -> Self {
        Self {
            width,
            height,
            margins: DEFAULT_MARGINS,
            bar_count,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn plot_width(&self) -> f64 {
        (self.width as f64 - self.margins.left - self.margins.right).max(0.0)
    }

    /// `max(MIN_BAR_WIDTH, plot_width / bar_count - BAR_GAP)`
    pub fn bar_width(&self) -> f64 {
        if self.bar_count == 0 {
            return MIN_BAR_WIDTH;
        }
        (self.plot_width() / self.bar_count as f64 - BAR_GAP).max(MIN_BAR_WIDTH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub colour: Rgba,
    pub width: f64,
    /// Dash and gap lengths in pixels; `None` draws a solid line
    pub dash: Option<[f64; 2]>,
}

pub const THRESHOLD_LINE: Stroke = Stroke {
    colour: THRESHOLD_STROKE,
    width: 2.0,
    dash: Some([5.0, 5.0]),
};

pub const BOUNDARY_LINE: Stroke = Stroke {
    colour: MARKER_STROKE,
    width: 1.0,
    dash: None,
};

pub const NOON_LINE: Stroke = Stroke {
    colour: MARKER_STROKE,
    width: 1.0,
    dash: Some([3.0, 3.0]),
};

/// A stroke drawn over the bars, positioned in chart coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Overlay {
    /// Across the whole plot at a value-axis position
    Horizontal { value: f64, stroke: Stroke },
    /// Through the centre of a category
    Vertical { index: usize, stroke: Stroke },
}

/// Threshold line, series start/end and day boundary, then noon markers
pub fn overlays(meta: &FrameMeta) -> Vec<Overlay> {
    let mut lines = vec![Overlay::Horizontal {
        value: THRESHOLD,
        stroke: THRESHOLD_LINE,
    }];

    let boundaries = [
        Some(meta.start_index),
        Some(meta.end_index),
        meta.midnight_index,
    ];
    lines.extend(boundaries.into_iter().flatten().map(|index| Overlay::Vertical {
        index,
        stroke: BOUNDARY_LINE,
    }));

    lines.extend(meta.noon_indices.iter().map(|&index| Overlay::Vertical {
        index,
        stroke: NOON_LINE,
    }));

    lines
}
