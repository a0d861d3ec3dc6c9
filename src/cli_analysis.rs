//! Chart Analysis Tool
//!
//! Loads a raw chart CSV export and prints the four summary tables without
//! touching the database or the server.

use clap::Parser;
use spotify_charts_server::charts::{
    chart_longevity, country_diversity, country_reach, pretty_country, top_songs_by_streams,
    ChartDataDir, REQUIRED_COLUMNS,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cli-analysis")]
#[command(about = "Print summary analyses of a chart CSV export")]
struct Args {
    /// Path to the directory holding raw chart CSV files
    #[arg(value_name = "DATA_DIR")]
    data_dir: PathBuf,

    /// Name of the CSV file inside the data directory
    #[arg(long, default_value = "charts_2023.csv")]
    file: String,

    /// Number of rows to show per table
    #[arg(long, default_value_t = 10)]
    top: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let records = match ChartDataDir::new(&args.data_dir).load(&args.file) {
        Ok(records) => records,
        Err(err) => {
            eprintln!("[ERROR] Could not load the CSV file: {}", err);
            std::process::exit(1);
        }
    };

    println!("=== Basic dataset info ===");
    println!("Rows: {}", records.len());
    println!("Columns: {}", REQUIRED_COLUMNS.join(", "));
    let countries: std::collections::BTreeSet<&str> =
        records.iter().map(|r| r.country.as_str()).collect();
    println!("Countries: {}", countries.len());
    println!();

    let top = Some(args.top);

    println!("=== Top {} songs by number of countries ===", args.top);
    for (i, row) in country_reach(&records, top).iter().enumerate() {
        println!(
            "{:>3}. {} - {} ({} countries)",
            i + 1,
            row.track_name,
            row.artist,
            row.country_count
        );
    }
    println!();

    println!("=== Chart diversity per country (top {}) ===", args.top);
    for (i, row) in country_diversity(&records, top).iter().enumerate() {
        println!(
            "{:>3}. {} ({} unique tracks)",
            i + 1,
            pretty_country(&row.country),
            row.unique_tracks
        );
    }
    println!();

    println!("=== Songs with most days on chart (top {}) ===", args.top);
    for (i, row) in chart_longevity(&records, top).iter().enumerate() {
        println!(
            "{:>3}. {} - {} ({} days)",
            i + 1,
            row.track_name,
            row.artist,
            row.days_on_chart
        );
    }
    println!();

    println!("=== Top {} songs by total streams ===", args.top);
    for (i, row) in top_songs_by_streams(&records, top).iter().enumerate() {
        println!(
            "{:>3}. {} - {} ({} streams)",
            i + 1,
            row.track_name,
            row.artist,
            row.total_streams
        );
    }
}
