//! Deal Reports
//!
//! Cleans company, deal, sector and contact exports and derives the sold-value reports
//! and charts.

pub mod charts;
pub mod data;
pub mod pipeline;
pub mod reports;

pub use pipeline::{Pipeline, PipelineConfig, PipelineError, RunSummary};
