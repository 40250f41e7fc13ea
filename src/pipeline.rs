//! Pipeline Module
//! Runs load → clean → reports → charts in program order.

use polars::prelude::DataFrame;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::info;

use crate::charts::{BarChartOptions, BarChartRenderer, BarSeries, ChartError};
use crate::data::{CleanerError, CleaningReport, DataCleaner, DataLoader, Datasets, LoaderError};
use crate::reports::{self, ContactMonthReport, ReportError, SectorShareReport};

pub const CONTACT_MONTH_CSV: &str = "first_output.csv";
pub const SECTOR_SHARE_CSV: &str = "second_output.csv";
pub const VALUE_BY_MONTH_PNG: &str = "value_by_month.png";
pub const VALUE_BY_CONTACT_PNG: &str = "value_by_contact.png";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Cleaner(#[from] CleanerError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where inputs are read from and outputs written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
        }
    }
}

/// Datasets after cleaning, with the counts to report.
#[derive(Debug, Clone)]
pub struct CleanedData {
    pub datasets: Datasets,
    pub report: CleaningReport,
}

/// Both report frames as written to disk.
#[derive(Debug, Clone)]
pub struct Reports {
    pub contact_month: DataFrame,
    pub sector_share: DataFrame,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub cleaning: CleaningReport,
    pub contact_month_rows: usize,
    pub sector_rows: usize,
    pub outputs: Vec<PathBuf>,
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.config.output_dir.join(file_name)
    }

    pub fn load_and_clean(&self) -> Result<CleanedData, PipelineError> {
        let start = Instant::now();
        let raw = DataLoader::new(&self.config.data_dir).load_all()?;
        info!(dir = %self.config.data_dir.display(), elapsed = ?start.elapsed(), "datasets loaded");

        let (datasets, report) = DataCleaner::clean(raw)?;
        info!(
            removed = report.total_removed(),
            duplicates = report.duplicate_contacts,
            "datasets cleaned"
        );
        Ok(CleanedData { datasets, report })
    }

    /// Build both reports and write them as CSV under the output directory.
    pub fn write_reports(&self, datasets: &Datasets) -> Result<Reports, PipelineError> {
        let mut contact_month = ContactMonthReport::build(&datasets.deals, &datasets.contacts)?;
        let mut sector_share =
            SectorShareReport::build(&datasets.deals, &datasets.companies, &datasets.sectors)?;

        ensure_dir(&self.config.output_dir)?;

        let path = self.output_path(CONTACT_MONTH_CSV);
        reports::write_csv(&mut contact_month, &path)?;
        info!(path = %path.display(), rows = contact_month.height(), "report written");

        let path = self.output_path(SECTOR_SHARE_CSV);
        reports::write_csv(&mut sector_share, &path)?;
        info!(path = %path.display(), rows = sector_share.height(), "report written");

        Ok(Reports {
            contact_month,
            sector_share,
        })
    }

    /// Render the month and contact bar charts from the month/contact report.
    pub fn render_charts(&self, contact_month: &DataFrame) -> Result<Vec<PathBuf>, PipelineError> {
        ensure_dir(&self.config.output_dir)?;
        let renderer = BarChartRenderer::default();

        let by_month = BarSeries::by_month(contact_month)?;
        let month_path = self.output_path(VALUE_BY_MONTH_PNG);
        renderer.render(&by_month, &BarChartOptions::sold_value_by_month(), &month_path)?;
        info!(path = %month_path.display(), bars = by_month.len(), "chart written");

        let by_contact = BarSeries::by_contact(contact_month)?;
        let contact_path = self.output_path(VALUE_BY_CONTACT_PNG);
        renderer.render(
            &by_contact,
            &BarChartOptions::sold_value_by_contact(),
            &contact_path,
        )?;
        info!(path = %contact_path.display(), bars = by_contact.len(), "chart written");

        Ok(vec![month_path, contact_path])
    }

    /// Full run. `on_cleaned` sees the cleaning counts before any report is built.
    pub fn run_with<F>(&self, on_cleaned: F) -> Result<RunSummary, PipelineError>
    where
        F: FnOnce(&CleaningReport),
    {
        let cleaned = self.load_and_clean()?;
        on_cleaned(&cleaned.report);

        let reports = self.write_reports(&cleaned.datasets)?;
        let mut outputs = vec![
            self.output_path(CONTACT_MONTH_CSV),
            self.output_path(SECTOR_SHARE_CSV),
        ];
        outputs.extend(self.render_charts(&reports.contact_month)?);

        Ok(RunSummary {
            cleaning: cleaned.report,
            contact_month_rows: reports.contact_month.height(),
            sector_rows: reports.sector_share.height(),
            outputs,
        })
    }

    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        self.run_with(|_| {})
    }
}

/// Create `dir` if absent; an existing directory is fine.
fn ensure_dir(dir: &Path) -> Result<(), PipelineError> {
    fs::create_dir_all(dir).map_err(|source| PipelineError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })
}
