//! Share of total sold value per sector.

use polars::prelude::*;

use super::ReportError;
use crate::data::columns::{COMPANY_ID, DEAL_PERCENT, DEAL_PRICE, SECTOR, SECTOR_KEY};

/// Decimal places kept on each share.
const SHARE_DECIMALS: u32 = 3;

pub struct SectorShareReport;

impl SectorShareReport {
    /// Output columns: `sector`, `dealsPercent`, highest share first.
    ///
    /// Deals whose company or sector cannot be resolved form no group and do not count
    /// toward the total.
    pub fn build(
        deals: &DataFrame,
        companies: &DataFrame,
        sectors: &DataFrame,
    ) -> Result<DataFrame, ReportError> {
        let company_sectors = companies
            .clone()
            .lazy()
            .select([col(COMPANY_ID), col(SECTOR_KEY)]);

        let report = deals
            .clone()
            .lazy()
            .join(
                company_sectors,
                [col(COMPANY_ID)],
                [col(COMPANY_ID)],
                JoinArgs::new(JoinType::Left),
            )
            .join(
                sectors.clone().lazy(),
                [col(SECTOR_KEY)],
                [col(SECTOR_KEY)],
                JoinArgs::new(JoinType::Left),
            )
            .filter(col(SECTOR).is_not_null())
            .group_by([col(SECTOR)])
            .agg([col(DEAL_PRICE).cast(DataType::Float64).sum()])
            .with_column(
                (col(DEAL_PRICE) / col(DEAL_PRICE).sum())
                    .round(SHARE_DECIMALS)
                    .alias(DEAL_PERCENT),
            )
            .sort_by_exprs(
                [col(DEAL_PERCENT), col(SECTOR)],
                SortMultipleOptions::default()
                    .with_order_descending_multi([true, false])
                    .with_maintain_order(true),
            )
            .select([col(SECTOR), col(DEAL_PERCENT)])
            .collect()?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn companies() -> DataFrame {
        df!(
            "companiesId" => &[1i64, 2, 3, 4],
            "companiesName" => &["Acme", "Globex", "Initech", "Hooli"],
            "sectorKey" => &[Some(10i64), Some(20), Some(30), None],
            "employeesName" => &["1-10", "11-50", "51-200", "1-10"],
        )
        .unwrap()
    }

    fn sectors() -> DataFrame {
        df!(
            "sectorKey" => &[10i64, 20, 30],
            "sector" => &["Retail", "Finance", "Energy"],
        )
        .unwrap()
    }

    fn shares(report: &DataFrame) -> Vec<(String, f64)> {
        let sectors = report.column("sector").unwrap().str().unwrap();
        let percents = report.column("dealsPercent").unwrap().f64().unwrap();
        sectors
            .into_no_null_iter()
            .zip(percents.into_no_null_iter())
            .map(|(s, p)| (s.to_string(), p))
            .collect()
    }

    #[test]
    fn test_build_sorts_descending_by_share() {
        let deals = df!(
            "companiesId" => &[1i64, 2, 2, 3, 1],
            "dealsPrice" => &[100i64, 300, 200, 150, 250],
        )
        .unwrap();

        let report = SectorShareReport::build(&deals, &companies(), &sectors()).unwrap();

        assert_eq!(
            shares(&report),
            vec![
                ("Finance".to_string(), 0.5),
                ("Retail".to_string(), 0.35),
                ("Energy".to_string(), 0.15),
            ]
        );
    }

    #[test]
    fn test_unresolved_sectors_are_left_out() {
        let deals = df!(
            "companiesId" => &[Some(1i64), Some(4), Some(99), None],
            "dealsPrice" => &[100i64, 500, 500, 500],
        )
        .unwrap();

        let report = SectorShareReport::build(&deals, &companies(), &sectors()).unwrap();

        assert_eq!(shares(&report), vec![("Retail".to_string(), 1.0)]);
    }

    #[test]
    fn test_shares_sum_to_one_within_rounding() {
        let deals = df!(
            "companiesId" => &[1i64, 2, 3, 3, 2, 1, 3],
            "dealsPrice" => &[113i64, 271, 89, 1001, 17, 333, 7],
        )
        .unwrap();

        let report = SectorShareReport::build(&deals, &companies(), &sectors()).unwrap();
        let rows = shares(&report);

        let total: f64 = rows.iter().map(|(_, p)| p).sum();
        let tolerance = 0.0005 * rows.len() as f64 + 1e-9;
        assert!((total - 1.0).abs() <= tolerance, "total share {total}");
        for (_, p) in &rows {
            assert_eq!((p * 1000.0).round() / 1000.0, *p);
        }
    }

    #[test]
    fn test_equal_shares_order_by_sector_name() {
        let deals = df!(
            "companiesId" => &[3i64, 1, 2],
            "dealsPrice" => &[100i64, 100, 100],
        )
        .unwrap();

        let report = SectorShareReport::build(&deals, &companies(), &sectors()).unwrap();
        let names: Vec<String> = shares(&report).into_iter().map(|(s, _)| s).collect();

        assert_eq!(names, vec!["Energy", "Finance", "Retail"]);
    }
}
