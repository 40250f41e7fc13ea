//! TSV Data Loader Module
//! Reads the four source datasets into Polars DataFrames.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use super::columns::{
    COMPANY_ID, COMPANY_NAME, CONTACT_ID, CONTACT_ID_RAW, CONTACT_NAME, DEAL_DATE, DEAL_PRICE,
    EMPLOYEES, SECTOR, SECTOR_KEY,
};

/// Rows sampled for schema inference.
const INFER_SCHEMA_ROWS: usize = 10_000;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("Input file not found: {0}")]
    MissingFile(PathBuf),
    #[error("{dataset} is missing required column '{column}'")]
    MissingColumn {
        dataset: &'static str,
        column: &'static str,
    },
}

/// The four source tables of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Companies,
    Deals,
    Sectors,
    Contacts,
}

impl Dataset {
    /// Load and report order.
    pub const ALL: [Dataset; 4] = [
        Dataset::Companies,
        Dataset::Deals,
        Dataset::Sectors,
        Dataset::Contacts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dataset::Companies => "companies",
            Dataset::Deals => "deals",
            Dataset::Sectors => "sectors",
            Dataset::Contacts => "contacts",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Dataset::Companies => "companies.tsv",
            Dataset::Deals => "deals.tsv",
            Dataset::Sectors => "sectors.tsv",
            Dataset::Contacts => "contacts.tsv",
        }
    }

    /// Column subset to keep, or `None` to keep every column.
    ///
    /// Names are the raw headers as they appear in the file; the contacts id header carries a
    /// leading space that is only stripped during cleaning.
    pub fn selected_columns(self) -> Option<&'static [&'static str]> {
        match self {
            Dataset::Companies => Some(&[COMPANY_ID, COMPANY_NAME, SECTOR_KEY, EMPLOYEES]),
            Dataset::Contacts => Some(&[CONTACT_ID_RAW, CONTACT_NAME]),
            Dataset::Deals | Dataset::Sectors => None,
        }
    }

    /// Columns the reports depend on. Checked right after loading.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            Dataset::Companies => &[COMPANY_ID, SECTOR_KEY],
            Dataset::Deals => &[COMPANY_ID, CONTACT_ID, DEAL_PRICE, DEAL_DATE],
            Dataset::Sectors => &[SECTOR_KEY, SECTOR],
            Dataset::Contacts => &[CONTACT_ID_RAW, CONTACT_NAME],
        }
    }
}

/// All four tables, loaded once per run.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub companies: DataFrame,
    pub deals: DataFrame,
    pub sectors: DataFrame,
    pub contacts: DataFrame,
}

impl Datasets {
    pub fn get(&self, dataset: Dataset) -> &DataFrame {
        match dataset {
            Dataset::Companies => &self.companies,
            Dataset::Deals => &self.deals,
            Dataset::Sectors => &self.sectors,
            Dataset::Contacts => &self.contacts,
        }
    }

    pub fn get_mut(&mut self, dataset: Dataset) -> &mut DataFrame {
        match dataset {
            Dataset::Companies => &mut self.companies,
            Dataset::Deals => &mut self.deals,
            Dataset::Sectors => &mut self.sectors,
            Dataset::Contacts => &mut self.contacts,
        }
    }
}

/// Handles TSV loading with Polars.
pub struct DataLoader {
    data_dir: PathBuf,
}

impl DataLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_for(&self, dataset: Dataset) -> PathBuf {
        self.data_dir.join(dataset.file_name())
    }

    /// Load a single dataset, restricted to its column subset.
    pub fn load(&self, dataset: Dataset) -> Result<DataFrame, LoaderError> {
        let path = self.path_for(dataset);
        if !path.is_file() {
            return Err(LoaderError::MissingFile(path));
        }

        let df = Self::read_tsv(&path, dataset.selected_columns())
            .map_err(|source| LoaderError::Read {
                path: path.clone(),
                source,
            })?;

        let names = df.get_column_names();
        for &required in dataset.required_columns() {
            if !names.iter().any(|name| name.as_str() == required) {
                return Err(LoaderError::MissingColumn {
                    dataset: dataset.name(),
                    column: required,
                });
            }
        }

        debug!(
            dataset = dataset.name(),
            rows = df.height(),
            columns = df.width(),
            "loaded"
        );
        Ok(df)
    }

    /// Load every dataset in `Dataset::ALL` order.
    pub fn load_all(&self) -> Result<Datasets, LoaderError> {
        Ok(Datasets {
            companies: self.load(Dataset::Companies)?,
            deals: self.load(Dataset::Deals)?,
            sectors: self.load(Dataset::Sectors)?,
            contacts: self.load(Dataset::Contacts)?,
        })
    }

    fn read_tsv(path: &Path, columns: Option<&[&str]>) -> PolarsResult<DataFrame> {
        let lf = LazyCsvReader::new(path)
            .with_separator(b'\t')
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .finish()?;

        match columns {
            Some(columns) => lf
                .select(columns.iter().map(|name| col(*name)).collect::<Vec<_>>())
                .collect(),
            None => lf.collect(),
        }
    }
}
