//! Bar chart rendering with threshold and day/noon overlays

use std::path::{Path, PathBuf};

use charming::{
    Chart, HtmlRenderer, ImageRenderer,
    component::{Axis, Grid, Title},
    datatype::DataPointItem,
    element::{
        AxisLabel, AxisTick, AxisType, Color, Formatter, ItemStyle, Label, LineStyle,
        LineStyleType, MarkLine, MarkLineData, MarkLineVariant, Symbol, TextStyle, Tooltip,
        Trigger,
    },
    renderer::ImageFormat,
    series::{Bar, Line},
};
use tracing::{debug, info, warn};

use super::colors::{COLOR_BACKGROUND, COLOR_TEXT};
use super::frame::ChartFrame;
use super::layout::{Layout, Overlay, Stroke, overlays};
use super::{UNIT, format_forecast};
use crate::intensity::HourBucket;

const CHART_TITLE: &str = "Carbon Intensity Forecast";

/// Border drawn around the bar covering the current instant
const CURRENT_BORDER_WIDTH: f64 = 2.0;

/// Dashes this short or shorter render dotted
const DOTTED_MAX_DASH: f64 = 3.0;

/// File formats the chart can be written as, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Interactive ECharts page with hover tooltips
    Html,
    Svg,
    Png,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "html" | "htm" => Some(OutputFormat::Html),
            "svg" => Some(OutputFormat::Svg),
            "png" => Some(OutputFormat::Png),
            _ => None,
        }
    }
}

/// Where a chart is drawn: an output file and its pixel size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Surface {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }

    pub fn format(&self) -> Option<OutputFormat> {
        OutputFormat::from_path(&self.path)
    }

    /// The directory the chart is written into exists
    fn is_attached(&self) -> bool {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.is_dir(),
            _ => true,
        }
    }
}

/// A drawn chart bound to its surface.
///
/// Owns the frame and buckets it was drawn from so it can be redrawn after a
/// resize. Every draw is a full rebuild of the chart options.
#[derive(Debug)]
pub struct CarbonChart {
    surface: Surface,
    format: OutputFormat,
    layout: Layout,
    frame: ChartFrame,
    buckets: Vec<HourBucket>,
}

impl CarbonChart {
    /// Draw `frame` onto `surface`.
    ///
    /// Returns `None` without raising when there is nothing to draw, the
    /// surface's directory is missing, or the renderer fails.
    pub fn render(surface: Surface, frame: &ChartFrame, buckets: &[HourBucket]) -> Option<Self> {
        if frame.is_empty() {
            debug!("empty chart frame, nothing to render");
            return None;
        }

        let Some(format) = surface.format() else {
            warn!(path = %surface.path.display(), "unsupported chart format, skipping render");
            return None;
        };

        if !surface.is_attached() {
            warn!(path = %surface.path.display(), "chart directory does not exist, skipping render");
            return None;
        }

        let chart = CarbonChart {
            layout: Layout::new(surface.width, surface.height, frame.len()),
            surface,
            format,
            frame: frame.clone(),
            buckets: buckets.to_vec(),
        };

        match chart.draw() {
            Ok(()) => Some(chart),
            Err(e) => {
                warn!(error = %e, "chart renderer unavailable, skipping render");
                None
            }
        }
    }

    /// Recompute bar geometry for a new surface size and redraw
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.surface.width = width;
        self.surface.height = height;
        self.layout = Layout::new(width, height, self.frame.len());

        match self.draw() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "chart redraw failed");
                false
            }
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Chart options for the current layout
    pub fn options(&self) -> Chart {
        build_chart(&self.frame, &self.buckets, &self.layout)
    }

    fn draw(&self) -> Result<(), String> {
        let chart = self.options();
        let (width, height) = (self.layout.width(), self.layout.height());
        let path = &self.surface.path;

        match self.format {
            OutputFormat::Html => HtmlRenderer::new(CHART_TITLE, width as u64, height as u64)
                .save(&chart, path)
                .map_err(|e| format!("Failed to save chart: {}", e))?,
            OutputFormat::Svg => {
                let mut renderer = ImageRenderer::new(width, height);
                renderer
                    .save(&chart, path)
                    .map_err(|e| format!("Failed to save chart: {}", e))?;
            }
            OutputFormat::Png => {
                let mut renderer = ImageRenderer::new(width, height);
                renderer
                    .save_format(ImageFormat::Png, &chart, path)
                    .map_err(|e| format!("Failed to save chart: {}", e))?;
            }
        }

        info!(
            path = %path.display(),
            bars = self.frame.len(),
            bar_width = self.layout.bar_width(),
            "chart rendered"
        );
        Ok(())
    }
}

/// Hover text for one bar, in source units
pub fn tooltip_text(time: &str, bucket: &HourBucket) -> String {
    let index = if bucket.index.is_empty() {
        "n/a"
    } else {
        bucket.index.as_str()
    };
    format!(
        "{}<br/>{} {}<br/>Index: {}",
        time,
        format_forecast(bucket.forecast),
        UNIT,
        index
    )
}

pub(super) fn build_chart(frame: &ChartFrame, buckets: &[HourBucket], layout: &Layout) -> Chart {
    let margins = layout.margins();

    // Bar heights are normalized; three decimals is well below a pixel
    let data: Vec<DataPointItem> = frame
        .cleanliness
        .iter()
        .zip(&frame.bar_colours)
        .zip(&frame.border_colours)
        .map(|((&value, fill), border)| {
            DataPointItem::new((value * 1000.0).round() / 1000.0).item_style(
                ItemStyle::new()
                    .color(Color::Value(fill.css()))
                    .border_color(Color::Value(border.css()))
                    .border_width(CURRENT_BORDER_WIDTH),
            )
        })
        .collect();

    let subtitle = match (frame.times.first(), frame.times.last()) {
        (Some(first), Some(last)) => format!("{} to {}", first, last),
        _ => String::new(),
    };

    let mut groups = overlay_groups(&overlays(&frame.meta)).into_iter();

    let mut bars = Bar::new()
        .name("Cleanliness")
        .bar_width(layout.bar_width())
        .data(data);
    if let Some((stroke, lines)) = groups.next() {
        bars = bars.mark_line(mark_line(&stroke, lines));
    }

    let mut chart = Chart::new()
        .background_color(Color::Value(COLOR_BACKGROUND.to_string()))
        .title(
            Title::new()
                .text(CHART_TITLE)
                .subtext(subtitle)
                .left("center")
                .top(8)
                .text_style(TextStyle::new().color(COLOR_TEXT).font_size(22))
                .subtext_style(TextStyle::new().color(COLOR_TEXT).font_size(14)),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .formatter(Formatter::Function(tooltip_function(frame, buckets).into())),
        )
        .grid(
            Grid::new()
                .left(margins.left)
                .right(margins.right)
                .top(margins.top)
                .bottom(margins.bottom),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .boundary_gap(true)
                .data(frame.labels.clone())
                .axis_tick(AxisTick::new().show(false))
                .axis_label(AxisLabel::new().color(COLOR_TEXT).font_size(14)),
        )
        .y_axis(Axis::new().type_(AxisType::Value).min(0).max(1).show(false))
        .series(bars);

    // Remaining stroke groups ride on data-less series over the same axes
    for (i, (stroke, lines)) in groups.enumerate() {
        chart = chart.series(
            Line::new()
                .name(format!("Markers {}", i + 1))
                .mark_line(mark_line(&stroke, lines)),
        );
    }

    chart
}

/// Tooltips show the original forecast, not the normalized bar height
fn tooltip_function(frame: &ChartFrame, buckets: &[HourBucket]) -> String {
    let tips: Vec<String> = frame
        .times
        .iter()
        .zip(buckets)
        .map(|(time, bucket)| tooltip_text(time, bucket))
        .collect();
    let tips = serde_json::to_string(&tips).unwrap_or_else(|_| "[]".to_string());

    format!(
        "function (params) {{ var tips = {}; \
         var p = Array.isArray(params) ? params[0] : params; \
         return tips[p.dataIndex] || ''; }}",
        tips
    )
}

/// Overlays grouped by stroke, in order of first appearance
fn overlay_groups(lines: &[Overlay]) -> Vec<(Stroke, Vec<MarkLineVariant>)> {
    let mut groups: Vec<(Stroke, Vec<MarkLineVariant>)> = Vec::new();

    for line in lines {
        let (stroke, item) = match *line {
            Overlay::Horizontal { value, stroke } => (stroke, MarkLineData::new().y_axis(value)),
            Overlay::Vertical { index, stroke } => {
                (stroke, MarkLineData::new().x_axis(index as f64))
            }
        };
        let item = MarkLineVariant::Simple(item);

        match groups.iter_mut().find(|(s, _)| *s == stroke) {
            Some((_, items)) => items.push(item),
            None => groups.push((stroke, vec![item])),
        }
    }

    groups
}

fn mark_line(stroke: &Stroke, data: Vec<MarkLineVariant>) -> MarkLine {
    MarkLine::new()
        .symbol(vec![Symbol::None, Symbol::None])
        .label(Label::new().show(false))
        .line_style(stroke_style(stroke))
        .data(data)
}

fn stroke_style(stroke: &Stroke) -> LineStyle {
    let kind = match stroke.dash {
        None => LineStyleType::Solid,
        Some([dash, _]) if dash <= DOTTED_MAX_DASH => LineStyleType::Dotted,
        Some(_) => LineStyleType::Dashed,
    };
    LineStyle::new()
        .color(Color::Value(stroke.colour.css()))
        .width(stroke.width)
        .type_(kind)
}
