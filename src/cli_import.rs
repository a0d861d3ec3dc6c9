//! Chart Import Tool
//!
//! This binary loads a raw chart CSV export and imports it into the SQLite
//! chart database the server reads from.

use anyhow::Result;
use clap::Parser;
use spotify_charts_server::chart_store::{ChartStore, SqliteChartStore};
use spotify_charts_server::charts::ChartDataDir;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cli-import")]
#[command(about = "Import a chart CSV export into the SQLite chart database")]
struct Args {
    /// Path to the directory holding raw chart CSV files
    #[arg(value_name = "DATA_DIR")]
    data_dir: PathBuf,

    /// Path to the output SQLite database file
    #[arg(value_name = "CHART_DB")]
    chart_db: PathBuf,

    /// Name of the CSV file inside the data directory
    #[arg(long, default_value = "charts_2023.csv")]
    file: String,

    /// Import at most this many records
    #[arg(long)]
    limit: Option<usize>,

    /// Delete all existing entries before importing
    #[arg(long, default_value_t = false)]
    reset: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Chart Import Tool");
    info!("=================");
    info!("Data directory: {}", args.data_dir.display());
    info!("Chart database: {}", args.chart_db.display());

    info!("Loading {}...", args.file);
    let mut records = ChartDataDir::new(&args.data_dir).load(&args.file)?;
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }
    info!("Loaded {} records", records.len());

    let store = SqliteChartStore::new(&args.chart_db)?;
    if args.reset {
        info!("Resetting store before import");
    }

    let summary = store.import_records(&records, args.reset)?;

    info!("");
    info!("Import Summary");
    info!("==============");
    info!("Entries deleted: {}", summary.deleted);
    info!("Entries inserted: {}", summary.inserted);
    if summary.skipped > 0 {
        warn!("Entries skipped (no parsable date): {}", summary.skipped);
    }
    info!("Store now holds {} entries", store.entries_count()?);

    Ok(())
}
