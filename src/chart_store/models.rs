use chrono::NaiveDate;

/// A persisted chart entry. Unlike the in-memory [`crate::charts::ChartRecord`],
/// the date is always present; dateless records never reach the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub country: String,
    pub position: u32,
    pub streams: i64,
    pub track_id: String,
    pub track_name: String,
    pub artist: String,
    pub artist_genres: String,
    pub duration_ms: Option<i64>,
    pub explicit: bool,
}

/// Filters for the raw entry browser. All fields combine with AND.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Exact country code match, case-insensitive.
    pub country: Option<String>,
    /// Month-of-date, 1 through 12.
    pub month: Option<u32>,
    /// Case-insensitive substring match on track name or artist.
    pub search: Option<String>,
    pub explicit_only: bool,
}

#[derive(Debug, Clone)]
pub struct EntryPage {
    pub entries: Vec<ChartEntry>,
    /// 1-based page number actually returned (clamped to range).
    pub page: usize,
    pub page_count: usize,
    /// Total entries matching the filter, across all pages.
    pub total_entries: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
    pub deleted: usize,
}
