//! Sold value by month and contact.
//!
//! Output columns: `dealsDateCreated` (index), `contactsName`, `dealsPrice`, `monthYear`.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

use super::ReportError;
use crate::data::columns::{CONTACT_ID, CONTACT_NAME, DEAL_DATE, DEAL_PRICE, MONTH_YEAR};

/// Deal creation dates are exported as `MM/DD/YYYY`.
pub const DEAL_DATE_FORMAT: &str = "%m/%d/%Y";

/// Month label, e.g. `Jan/19`.
const MONTH_LABEL_FORMAT: &str = "%b/%y";

/// Days between 0001-01-01 and 1970-01-01, the offset of Polars' Date physical value.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

const ROW_INDEX: &str = "__deal_row";

/// Parse a deal creation date. No fallback formats.
pub fn parse_deal_date(value: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(value, DEAL_DATE_FORMAT).map_err(|source| {
        ReportError::InvalidDate {
            value: value.to_string(),
            source,
        }
    })
}

pub fn month_label(date: NaiveDate) -> String {
    date.format(MONTH_LABEL_FORMAT).to_string()
}

pub(crate) fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

pub(crate) fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE)
}

pub struct ContactMonthReport;

impl ContactMonthReport {
    /// Left-join deals to contacts and attach the parsed date and month label.
    ///
    /// Deal order is preserved. Any missing or malformed creation date fails the report.
    pub fn build(deals: &DataFrame, contacts: &DataFrame) -> Result<DataFrame, ReportError> {
        let joined = deals
            .clone()
            .lazy()
            .with_row_index(ROW_INDEX, None)
            .join(
                contacts.clone().lazy(),
                [col(CONTACT_ID)],
                [col(CONTACT_ID)],
                JoinArgs::new(JoinType::Left),
            )
            .sort(
                [ROW_INDEX],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .collect()?;

        let raw_dates = joined.column(DEAL_DATE)?.cast(&DataType::String)?;
        let raw_dates = raw_dates.as_materialized_series().str()?;

        let mut days: Vec<i32> = Vec::with_capacity(joined.height());
        let mut labels: Vec<String> = Vec::with_capacity(joined.height());
        for (row, value) in raw_dates.into_iter().enumerate() {
            let value = value.ok_or(ReportError::MissingDate(row))?;
            let date = parse_deal_date(value)?;
            days.push(days_since_epoch(date));
            labels.push(month_label(date));
        }

        let report = DataFrame::new(vec![
            Column::new(DEAL_DATE.into(), days).cast(&DataType::Date)?,
            joined.column(CONTACT_NAME)?.clone(),
            joined.column(DEAL_PRICE)?.clone(),
            Column::new(MONTH_YEAR.into(), labels),
        ])?;

        Ok(report)
    }
}
