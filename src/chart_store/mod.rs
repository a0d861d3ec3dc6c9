//! Persisted chart entry storage.
//!
//! One flat table of chart entries, logically keyed by
//! `(date, country, track_id)`, with lookup indexes on country, track name,
//! artist and date. The store is replaced wholesale by the import tool and
//! read back either as raw filtered pages (the browser view) or as the full
//! record set feeding the aggregations.

mod models;
mod schema;
mod sqlite_chart_store;

pub use models::{ChartEntry, EntryFilter, EntryPage, ImportSummary};
pub use sqlite_chart_store::SqliteChartStore;

use crate::charts::ChartRecord;
use anyhow::Result;

pub trait ChartStore: Send + Sync {
    /// Inserts normalized records, optionally deleting all existing entries
    /// first. Delete and insert happen in a single transaction, so a failed
    /// import never leaves the store empty. Records without a parsed date
    /// are skipped with a warning.
    fn import_records(&self, records: &[ChartRecord], reset: bool) -> Result<ImportSummary>;

    fn entries_count(&self) -> Result<usize>;

    /// Loads the full record set for the aggregation functions.
    fn all_records(&self) -> Result<Vec<ChartRecord>>;

    /// Distinct country codes, ascending, for the browser filter dropdown.
    fn distinct_countries(&self) -> Result<Vec<String>>;

    /// Filtered, paginated raw entries ordered by date descending then
    /// position ascending. Pages are 1-based; out-of-range pages clamp.
    fn query_entries(&self, filter: &EntryFilter, page: usize, page_size: usize)
        -> Result<EntryPage>;
}
