//! Ingest command handler.
//!
//! Converts the services CSV into `services.json` and `index.json`.

use anyhow::Context;
use clap::Args;
use localaid_core::AppConfig;
use localaid_directory::{ingest_csv, IngestStats};
use std::path::PathBuf;

/// Convert the services CSV into the directory files
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// CSV file to read (default: {data_dir}/services.csv)
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Output the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    /// Execute the ingest command.
    pub fn execute(&self, config: &AppConfig) -> anyhow::Result<()> {
        let csv_path = self.csv.clone().unwrap_or_else(|| config.csv_path());

        let stats = ingest_csv(&csv_path, &config.data_dir)
            .with_context(|| format!("Ingestion of {} failed", csv_path.display()))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            println!("{}", summary(&stats));
        }

        Ok(())
    }
}

fn summary(stats: &IngestStats) -> String {
    let mut lines = vec![format!(
        "Wrote {} records to {}",
        stats.records_written,
        stats.data_path.display()
    )];
    lines.push(format!("Index: {}", stats.index_path.display()));

    if stats.dropped() > 0 {
        lines.push(format!(
            "Skipped {} of {} rows (missing town: {}, category: {}, url: {})",
            stats.dropped(),
            stats.rows_read,
            stats.dropped_missing_town,
            stats.dropped_missing_category,
            stats.dropped_missing_url
        ));
    }

    lines.join("\n")
}
