//! Static Chart Renderer
//! Draws labelled bar charts to PNG with plotters.
//!
//! Layout:
//! 1. Caption centered on top
//! 2. One bar per category, value printed above each bar
//! 3. Legend box in the upper right corner

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use std::path::Path;

use super::{BarSeries, ChartError};

// Colors
const BAR_COLOR: RGBColor = RGBColor(30, 144, 255); // Dodger blue
const GRID_COLOR: RGBColor = RGBColor(220, 220, 220);

const FONT: &str = "sans-serif";

/// Headroom above the tallest bar for its value label.
const Y_HEADROOM: f64 = 1.1;

/// Text and layout options for a single bar chart.
#[derive(Debug, Clone)]
pub struct BarChartOptions {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub legend: String,
    pub value_label_size: f64,
    /// Turn category labels sideways, for long names.
    pub rotate_x_labels: bool,
}

impl BarChartOptions {
    pub fn sold_value_by_month() -> Self {
        Self {
            title: "Total Sold Value by Month".to_string(),
            x_desc: "Month/Year".to_string(),
            y_desc: "Sold Value".to_string(),
            legend: "Sold Value".to_string(),
            value_label_size: 12.0,
            rotate_x_labels: false,
        }
    }

    pub fn sold_value_by_contact() -> Self {
        Self {
            title: "Total Sold Value by Contact".to_string(),
            x_desc: "Contact".to_string(),
            y_desc: "Sold Value".to_string(),
            legend: "Sold Value".to_string(),
            value_label_size: 10.0,
            rotate_x_labels: true,
        }
    }
}

pub struct BarChartRenderer {
    width: u32,
    height: u32,
}

impl Default for BarChartRenderer {
    /// 24x12 inches at 100 dpi.
    fn default() -> Self {
        Self::new(2400, 1200)
    }
}

impl BarChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Render `series` as a PNG at `path`.
    pub fn render(
        &self,
        series: &BarSeries,
        options: &BarChartOptions,
        path: &Path,
    ) -> Result<(), ChartError> {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        // An empty chart still gets one slot so the axis range is valid
        let slots = series.len().max(1);
        let y_max = if series.max_value() > 0.0 {
            series.max_value() * Y_HEADROOM
        } else {
            1.0
        };

        let x_label_area = if options.rotate_x_labels { 220 } else { 60 };
        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, (FONT, 40))
            .margin(30)
            .x_label_area_size(x_label_area)
            .y_label_area_size(110)
            .build_cartesian_2d((0..slots).into_segmented(), 0f64..y_max)?;

        let labels = &series.labels;
        let x_label_font = if options.rotate_x_labels {
            (FONT, 16.0).into_font().transform(FontTransform::Rotate90)
        } else {
            (FONT, 16.0).into_font()
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(WHITE)
            .bold_line_style(GRID_COLOR)
            .x_labels(slots)
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .x_label_style(x_label_font)
            .y_label_formatter(&|v| format!("{:.0}", v))
            .x_desc(options.x_desc.as_str())
            .y_desc(options.y_desc.as_str())
            .axis_desc_style((FONT, 22))
            .draw()?;

        chart
            .draw_series(series.values.iter().enumerate().map(|(i, value)| {
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *value)],
                    BAR_COLOR.filled(),
                );
                bar.set_margin(0, 0, 6, 6);
                bar
            }))?
            .label(options.legend.as_str())
            .legend(|(x, y)| Rectangle::new([(x, y - 6), (x + 18, y + 6)], BAR_COLOR.filled()));

        let value_style = TextStyle::from((FONT, options.value_label_size).into_font())
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(series.values.iter().enumerate().map(|(i, value)| {
            Text::new(
                bar_label(*value),
                (SegmentValue::CenterOf(i), *value),
                value_style.clone(),
            )
        }))?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, 18))
            .draw()?;

        root.present()?;
        Ok(())
    }
}

/// Value printed above a bar: the integer part.
pub fn bar_label(value: f64) -> String {
    format!("{}", value.trunc() as i64)
}
