//! Data Cleaner Module
//! Drops rows that cannot be stored as Latin-1 text, normalises headers and de-duplicates
//! contacts.

use polars::prelude::*;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use super::columns::CONTACT_NAME;
use super::loader::{Dataset, Datasets};

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Counts gathered while cleaning, reported to the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningReport {
    /// Rows dropped by the encoding filter, in `Dataset::ALL` order.
    pub removed_rows: Vec<(Dataset, usize)>,
    pub duplicate_contacts: usize,
}

impl CleaningReport {
    pub fn removed_from(&self, dataset: Dataset) -> usize {
        self.removed_rows
            .iter()
            .find(|(d, _)| *d == dataset)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn total_removed(&self) -> usize {
        self.removed_rows.iter().map(|(_, n)| n).sum()
    }
}

impl fmt::Display for CleaningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (dataset, removed) in &self.removed_rows {
            writeln!(f, "Number of removed rows from {}: {}", dataset.name(), removed)?;
        }
        write!(
            f,
            "Number of duplicate lines removed from contacts: {}",
            self.duplicate_contacts
        )
    }
}

/// True when every char fits in a single ISO-8859-1 byte.
pub fn is_latin1(value: &str) -> bool {
    value.chars().all(|c| (c as u32) <= 0xFF)
}

/// Handles the cleaning pass over the loaded datasets.
pub struct DataCleaner;

impl DataCleaner {
    /// Run the whole cleaning pass: encoding filter on every dataset, then header stripping
    /// and name de-duplication on contacts.
    pub fn clean(mut datasets: Datasets) -> Result<(Datasets, CleaningReport), CleanerError> {
        let mut report = CleaningReport::default();

        for dataset in Dataset::ALL {
            let (cleaned, removed) = Self::drop_non_latin1_rows(datasets.get(dataset))?;
            debug!(dataset = dataset.name(), removed, kept = cleaned.height(), "encoding filter");
            *datasets.get_mut(dataset) = cleaned;
            report.removed_rows.push((dataset, removed));
        }

        Self::strip_column_names(&mut datasets.contacts)?;

        let (contacts, duplicates) = Self::drop_duplicate_values(&datasets.contacts, CONTACT_NAME)?;
        datasets.contacts = contacts;
        report.duplicate_contacts = duplicates;

        Ok((datasets, report))
    }

    /// Row mask that is false wherever a string field holds a non-Latin-1 char.
    ///
    /// Nulls and non-string columns always pass.
    pub fn latin1_mask(df: &DataFrame) -> Result<BooleanChunked, CleanerError> {
        let mut keep = vec![true; df.height()];

        for column in df.get_columns() {
            if column.dtype() != &DataType::String {
                continue;
            }
            let values = column.as_materialized_series().str()?;
            for (i, value) in values.into_iter().enumerate() {
                if let Some(v) = value {
                    if !is_latin1(v) {
                        keep[i] = false;
                    }
                }
            }
        }

        Ok(BooleanChunked::from_slice("latin1".into(), &keep))
    }

    /// Drop rows failing the Latin-1 check. Returns the kept rows and the number removed.
    pub fn drop_non_latin1_rows(df: &DataFrame) -> Result<(DataFrame, usize), CleanerError> {
        let mask = Self::latin1_mask(df)?;
        let kept = df.filter(&mask)?;
        let removed = df.height() - kept.height();
        Ok((kept, removed))
    }

    /// Trim surrounding whitespace from every column name.
    pub fn strip_column_names(df: &mut DataFrame) -> Result<(), CleanerError> {
        let renames: Vec<(String, String)> = df
            .get_column_names()
            .iter()
            .filter_map(|name| {
                let trimmed = name.as_str().trim();
                (trimmed != name.as_str()).then(|| (name.to_string(), trimmed.to_string()))
            })
            .collect();

        for (old, new) in renames {
            df.rename(&old, new.into())?;
        }
        Ok(())
    }

    /// Keep the first row for each distinct value of `column`, in original order.
    ///
    /// Null is treated as one value. Returns the kept rows and the number removed.
    pub fn drop_duplicate_values(
        df: &DataFrame,
        column: &str,
    ) -> Result<(DataFrame, usize), CleanerError> {
        let as_text = df.column(column)?.cast(&DataType::String)?;
        let values = as_text.as_materialized_series().str()?;

        let mut seen: HashSet<Option<&str>> = HashSet::new();
        let keep: Vec<bool> = values.into_iter().map(|v| seen.insert(v)).collect();

        let mask = BooleanChunked::from_slice("first".into(), &keep);
        let kept = df.filter(&mask)?;
        let removed = df.height() - kept.height();
        Ok((kept, removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datasets(contacts: DataFrame) -> Datasets {
        Datasets {
            companies: df!(
                "companiesId" => &[1i64, 2],
                "companiesName" => &["Acme", "Łódź Sp."],
                "sectorKey" => &[10i64, 20],
                "employeesName" => &["1-10", "11-50"],
            )
            .unwrap(),
            deals: df!(
                "dealsId" => &[1i64],
                "contactsId" => &[1i64],
                "companiesId" => &[1i64],
                "dealsPrice" => &[100i64],
                "dealsDateCreated" => &["01/05/2019"],
            )
            .unwrap(),
            sectors: df!(
                "sectorKey" => &[10i64, 20],
                "sector" => &["Retail", "Finance"],
            )
            .unwrap(),
            contacts,
        }
    }

    #[test]
    fn test_is_latin1() {
        assert!(is_latin1("Joao"));
        assert!(is_latin1("João Müller ÿ"));
        assert!(!is_latin1("Łukasz"));
        assert!(!is_latin1("東京"));
        assert!(!is_latin1("price €"));
        assert!(is_latin1(""));
    }

    #[test]
    fn test_drop_non_latin1_rows_ignores_nulls_and_numbers() {
        let df = df!(
            "id" => &[1i64, 2, 3, 4],
            "name" => &[Some("Renée"), Some("Αλέξης"), None, Some("Zoë")],
        )
        .unwrap();

        let (kept, removed) = DataCleaner::drop_non_latin1_rows(&df).unwrap();

        assert_eq!(removed, 1);
        let ids: Vec<i64> = kept.column("id").unwrap().i64().unwrap().into_no_null_iter().collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_retained_fields_encode_as_latin1() {
        let df = df!(
            "a" => &["ok", "ünïcödé", "日本", "plain"],
            "b" => &["x", "y", "z", "Ω"],
        )
        .unwrap();

        let (kept, _) = DataCleaner::drop_non_latin1_rows(&df).unwrap();

        assert_eq!(kept.height(), 2);
        for column in kept.get_columns() {
            let values = column.as_materialized_series().str().unwrap();
            assert!(values.into_iter().flatten().all(is_latin1));
        }
    }

    #[test]
    fn test_strip_column_names() {
        let mut df = df!(
            " contactsId" => &[1i64],
            "contactsName " => &["Ana"],
        )
        .unwrap();

        DataCleaner::strip_column_names(&mut df).unwrap();

        assert!(df.column("contactsId").is_ok());
        assert!(df.column("contactsName").is_ok());
    }

    #[test]
    fn test_drop_duplicate_values_keeps_first() {
        let df = df!(
            "contactsId" => &[1i64, 2, 3, 4, 5],
            "contactsName" => &[Some("Ana"), Some("Bo"), Some("Ana"), None, None],
        )
        .unwrap();

        let (kept, removed) = DataCleaner::drop_duplicate_values(&df, "contactsName").unwrap();

        assert_eq!(removed, 2);
        let ids: Vec<i64> = kept
            .column("contactsId")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_clean_reports_counts_per_dataset() {
        let contacts = df!(
            " contactsId" => &[1i64, 2, 3, 4],
            "contactsName" => &["Ana", "Ana", "Søren", "Jürgen ☃"],
        )
        .unwrap();

        let (cleaned, report) = DataCleaner::clean(datasets(contacts)).unwrap();

        assert_eq!(report.removed_from(Dataset::Companies), 1);
        assert_eq!(report.removed_from(Dataset::Deals), 0);
        assert_eq!(report.removed_from(Dataset::Contacts), 1);
        assert_eq!(report.total_removed(), 2);
        assert_eq!(report.duplicate_contacts, 1);

        assert_eq!(cleaned.companies.height(), 1);
        assert_eq!(cleaned.contacts.height(), 2);
        assert!(cleaned.contacts.column("contactsId").is_ok());

        let names = cleaned.contacts.column("contactsName").unwrap();
        let names: HashSet<&str> = names
            .as_materialized_series()
            .str()
            .unwrap()
            .into_no_null_iter()
            .map(str::trim)
            .collect();
        assert_eq!(names.len(), cleaned.contacts.height());
    }

    #[test]
    fn test_report_display() {
        let report = CleaningReport {
            removed_rows: vec![
                (Dataset::Companies, 2),
                (Dataset::Deals, 0),
                (Dataset::Sectors, 0),
                (Dataset::Contacts, 5),
            ],
            duplicate_contacts: 3,
        };

        assert_eq!(
            report.to_string(),
            "Number of removed rows from companies: 2\n\
             Number of removed rows from deals: 0\n\
             Number of removed rows from sectors: 0\n\
             Number of removed rows from contacts: 5\n\
             Number of duplicate lines removed from contacts: 3"
        );
    }
}
