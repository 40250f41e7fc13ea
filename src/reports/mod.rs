//! Reports module - joins and aggregations over the cleaned datasets

mod contact_month;
mod sector_share;

pub(crate) use contact_month::date_from_epoch_days;
pub use contact_month::{month_label, parse_deal_date, ContactMonthReport, DEAL_DATE_FORMAT};
pub use sector_share::SectorShareReport;

use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Invalid deal date '{value}', expected MM/DD/YYYY: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("Deal at row {0} has no creation date")]
    MissingDate(usize),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write a report as comma-separated text with a header row.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), ReportError> {
    let mut file = File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(df)?;
    Ok(())
}
