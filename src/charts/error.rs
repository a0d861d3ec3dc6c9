use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading and normalizing chart data.
///
/// Callers are expected to match on the variant: a missing file and a schema
/// mismatch are recoverable conditions for the CLI tools, not crashes.
#[derive(Debug, Error)]
pub enum ChartDataError {
    #[error("chart data file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Required canonical columns absent after alias normalization. Carries
    /// every missing column, not just the first.
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("failed to read chart data: {0}")]
    Csv(#[from] csv::Error),
}
