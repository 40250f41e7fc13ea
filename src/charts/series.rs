//! Bar Series Module
//! Aggregates the month/contact report into labelled bar values.

use chrono::{Datelike, Months, NaiveDate};
use polars::prelude::*;
use std::collections::BTreeMap;

use super::ChartError;
use crate::data::columns::{CONTACT_NAME, DEAL_DATE, DEAL_PRICE};
use crate::reports::{date_from_epoch_days, month_label};

/// Labels and values of a categorical bar chart, in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl BarSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Sum prices per calendar month, first to last month with empty months at zero.
    pub fn by_month(report: &DataFrame) -> Result<Self, ChartError> {
        let dates = report.column(DEAL_DATE)?.cast(&DataType::Int32)?;
        let dates = dates.i32()?;
        let prices = report.column(DEAL_PRICE)?.cast(&DataType::Float64)?;
        let prices = prices.f64()?;

        let mut by_month: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for (days, price) in dates.into_iter().zip(prices.into_iter()) {
            let Some(date) = days.and_then(date_from_epoch_days) else {
                continue;
            };
            let Some(month) = month_start(date) else {
                continue;
            };
            *by_month.entry(month).or_default() += price.unwrap_or(0.0);
        }

        let (Some(&first), Some(&last)) = (by_month.keys().next(), by_month.keys().next_back())
        else {
            return Ok(Self::default());
        };

        let mut series = Self::default();
        let mut month = first;
        while month <= last {
            series.labels.push(month_label(month));
            series
                .values
                .push(by_month.get(&month).copied().unwrap_or(0.0));
            month = match month.checked_add_months(Months::new(1)) {
                Some(next) => next,
                None => break,
            };
        }
        Ok(series)
    }

    /// Sum prices per contact, largest first. Deals without a contact are skipped.
    pub fn by_contact(report: &DataFrame) -> Result<Self, ChartError> {
        let names = report.column(CONTACT_NAME)?.cast(&DataType::String)?;
        let names = names.str()?;
        let prices = report.column(DEAL_PRICE)?.cast(&DataType::Float64)?;
        let prices = prices.f64()?;

        let mut by_contact: BTreeMap<&str, f64> = BTreeMap::new();
        for (name, price) in names.into_iter().zip(prices.into_iter()) {
            if let Some(name) = name {
                *by_contact.entry(name).or_default() += price.unwrap_or(0.0);
            }
        }

        // Stable sort over name-ordered entries keeps ties alphabetical
        let mut totals: Vec<(&str, f64)> = by_contact.into_iter().collect();
        totals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Ok(Self {
            labels: totals.iter().map(|(name, _)| name.to_string()).collect(),
            values: totals.iter().map(|(_, total)| *total).collect(),
        })
    }
}

fn month_start(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}
