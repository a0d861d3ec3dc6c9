//! Chart data loading, normalization and aggregation.
//!
//! The loader turns a raw charts CSV into typed [`ChartRecord`]s with a
//! validated canonical schema; the analysis functions reduce those records
//! into ranked summary tables shared by the CLI and the web views.

mod analysis;
mod country;
mod error;
mod loader;
mod model;

pub use analysis::{
    chart_longevity, country_diversity, country_reach, top_songs_by_streams, ChartLongevityRow,
    CountryDiversityRow, CountryReachRow, TopStreamsRow,
};
pub use country::pretty_country;
pub use error::ChartDataError;
pub use loader::{normalize_columns, require_columns, ChartDataDir, REQUIRED_COLUMNS};
pub use model::{ChartRecord, SongKey};
