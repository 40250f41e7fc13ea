//! Charts module - Bar chart data and rendering

mod renderer;
mod series;

pub use renderer::{bar_label, BarChartOptions, BarChartRenderer};
pub use series::BarSeries;

use plotters::drawing::DrawingAreaErrorKind;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
}

impl<E> From<DrawingAreaErrorKind<E>> for ChartError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Drawing(err.to_string())
    }
}
