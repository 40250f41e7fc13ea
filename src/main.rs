//! Deal Reports - sold-value reports from company, deal, sector and contact exports
//!
//! Reads `data/*.tsv`, drops rows that cannot be stored as Latin-1 text, de-duplicates
//! contacts, and writes two CSV reports plus two bar charts to `output/`.

use anyhow::{Context, Result};
use deal_reports::{Pipeline, PipelineConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the cleaning counts
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let pipeline = Pipeline::new(PipelineConfig::default());
    let summary = pipeline
        .run_with(|report| println!("{report}"))
        .context("deal report run failed")?;

    info!(
        contact_month_rows = summary.contact_month_rows,
        sectors = summary.sector_rows,
        outputs = summary.outputs.len(),
        "done"
    );
    Ok(())
}
