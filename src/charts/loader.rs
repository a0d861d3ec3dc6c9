//! CSV loading and column normalization for raw chart exports.
//!
//! The Kaggle exports of this dataset come in a few column layouts; a fixed
//! alias table maps the known variants onto the canonical schema before any
//! row is parsed.

use super::error::ChartDataError;
use super::model::ChartRecord;
use chrono::NaiveDate;
use csv::StringRecord;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Canonical columns every downstream consumer assumes present.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "date",
    "country",
    "position",
    "streams",
    "track_id",
    "track_name",
    "artist",
];

/// Known alternate column names mapped to their canonical form. Aliases that
/// are not present in a given file are silently skipped.
const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("name", "track_name"),
    ("title", "track_name"),
    ("artists", "artist"),
    ("artist_name", "artist"),
    ("region", "country"),
    ("rank", "position"),
    ("id", "track_id"),
    ("duration_ms", "duration"),
    ("is_explicit", "explicit"),
];

/// The configured directory holding raw chart CSV files.
///
/// Injected explicitly at startup rather than derived from the process
/// location, so tests and tools can point it anywhere.
#[derive(Debug, Clone)]
pub struct ChartDataDir {
    dir: PathBuf,
}

impl ChartDataDir {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        ChartDataDir { dir: dir.into() }
    }

    /// Loads and normalizes the named CSV file from the data directory.
    pub fn load(&self, file_name: &str) -> Result<Vec<ChartRecord>, ChartDataError> {
        let path = self.dir.join(file_name);
        if !path.exists() {
            return Err(ChartDataError::FileNotFound(path));
        }
        read_chart_csv(&path)
    }
}

/// Maps raw header names onto the canonical schema. Headers are trimmed and
/// lowercased first; names already canonical pass through unchanged, so
/// normalization is idempotent.
pub fn normalize_columns<I, S>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    headers
        .into_iter()
        .map(|header| {
            let name = header.as_ref().trim().to_lowercase();
            COLUMN_ALIASES
                .iter()
                .find(|(alias, _)| *alias == name)
                .map(|(_, canonical)| canonical.to_string())
                .unwrap_or(name)
        })
        .collect()
}

/// Checks that every required column is present, reporting all missing names
/// at once.
pub fn require_columns(present: &[String], required: &[&str]) -> Result<(), ChartDataError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|required_name| !present.iter().any(|p| p == *required_name))
        .map(|name| name.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ChartDataError::MissingColumns(missing))
    }
}

struct ColumnIndex {
    date: usize,
    country: usize,
    position: usize,
    streams: usize,
    track_id: usize,
    track_name: usize,
    artist: usize,
    artist_genres: Option<usize>,
    duration: Option<usize>,
    explicit: Option<usize>,
}

impl ColumnIndex {
    fn resolve(columns: &[String]) -> Result<Self, ChartDataError> {
        require_columns(columns, REQUIRED_COLUMNS)?;
        let position_of = |name: &str| columns.iter().position(|c| c == name);
        Ok(ColumnIndex {
            date: position_of("date").unwrap(),
            country: position_of("country").unwrap(),
            position: position_of("position").unwrap(),
            streams: position_of("streams").unwrap(),
            track_id: position_of("track_id").unwrap(),
            track_name: position_of("track_name").unwrap(),
            artist: position_of("artist").unwrap(),
            artist_genres: position_of("artist_genres"),
            duration: position_of("duration"),
            explicit: position_of("explicit"),
        })
    }
}

/// Reads a chart CSV from an explicit path, normalizing columns and coercing
/// row values.
///
/// Rows with an unparsable position or streams value are skipped with a
/// warning; an unparsable date is kept as `None` so date-based aggregations
/// can drop it without losing the rest of the row.
pub fn read_chart_csv(path: &Path) -> Result<Vec<ChartRecord>, ChartDataError> {
    let mut reader = csv::Reader::from_path(path)?;
    let columns = normalize_columns(reader.headers()?.iter());
    let index = ColumnIndex::resolve(&columns)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (row_number, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                warn!("Skipping unreadable row {}: {}", row_number + 1, err);
                skipped += 1;
                continue;
            }
        };
        match parse_row(&row, &index) {
            Ok(record) => records.push(record),
            Err(reason) => {
                warn!("Skipping row {}: {}", row_number + 1, reason);
                skipped += 1;
            }
        }
    }

    info!(
        "Loaded {} chart records from {} ({} skipped)",
        records.len(),
        path.display(),
        skipped
    );
    Ok(records)
}

fn parse_row(row: &StringRecord, index: &ColumnIndex) -> Result<ChartRecord, String> {
    let field = |i: usize| row.get(i).unwrap_or("").trim();

    let position: u32 = field(index.position)
        .parse()
        .map_err(|_| format!("bad position value {:?}", field(index.position)))?;
    let streams: i64 = field(index.streams)
        .parse()
        .map_err(|_| format!("bad streams value {:?}", field(index.streams)))?;

    Ok(ChartRecord {
        date: parse_chart_date(field(index.date)),
        country: field(index.country).to_string(),
        position,
        streams,
        track_id: field(index.track_id).to_string(),
        track_name: field(index.track_name).to_string(),
        artist: field(index.artist).to_string(),
        artist_genres: index
            .artist_genres
            .map(|i| field(i).to_string())
            .unwrap_or_default(),
        duration_ms: index.duration.and_then(|i| field(i).parse().ok()),
        explicit: index
            .explicit
            .map(|i| parse_explicit(field(i)))
            .unwrap_or(false),
    })
}

/// Parses the date column, tolerating a trailing time part. Unparsable values
/// become `None` rather than failing the row.
fn parse_chart_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split_whitespace().next().unwrap_or("");
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%Y/%m/%d"))
        .ok()
}

fn parse_explicit(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn normalizes_aliased_columns() {
        let columns = normalize_columns(["name", "artists", "region", "date", "streams"]);
        assert_eq!(
            columns,
            vec!["track_name", "artist", "country", "date", "streams"]
        );
    }

    #[test]
    fn normalization_is_idempotent_on_canonical_names() {
        let canonical = vec![
            "track_name".to_string(),
            "artist".to_string(),
            "country".to_string(),
        ];
        assert_eq!(normalize_columns(&canonical), canonical);
        assert_eq!(normalize_columns(normalize_columns(&canonical)), canonical);
    }

    #[test]
    fn require_columns_names_every_missing_column() {
        let present = vec!["date".to_string(), "country".to_string()];
        let err = require_columns(&present, REQUIRED_COLUMNS).unwrap_err();
        match err {
            ChartDataError::MissingColumns(missing) => {
                assert_eq!(
                    missing,
                    vec!["position", "streams", "track_id", "track_name", "artist"]
                );
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_an_explicit_not_found_error() {
        let data_dir = ChartDataDir::new("/definitely/not/here");
        let err = data_dir.load("charts_2023.csv").unwrap_err();
        assert!(matches!(err, ChartDataError::FileNotFound(_)));
    }

    #[test]
    fn loads_rows_with_aliased_headers() {
        let file = write_csv(
            "date,region,rank,streams,id,name,artists,explicit\n\
             2023-01-01,us,1,1000,t1,Song A,Artist X,true\n\
             2023-01-01,gb,2,500,t2,Song B,Artist Y,0\n",
        );
        let records = read_chart_csv(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].country, "us");
        assert_eq!(records[0].track_name, "Song A");
        assert!(records[0].explicit);
        assert!(!records[1].explicit);
        assert_eq!(
            records[0].date,
            Some(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
        );
    }

    #[test]
    fn unparsable_date_is_kept_as_none() {
        let file = write_csv(
            "date,country,position,streams,track_id,track_name,artist\n\
             not-a-date,us,1,1000,t1,Song A,Artist X\n",
        );
        let records = read_chart_csv(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, None);
    }

    #[test]
    fn row_with_bad_streams_is_skipped() {
        let file = write_csv(
            "date,country,position,streams,track_id,track_name,artist\n\
             2023-01-01,us,1,lots,t1,Song A,Artist X\n\
             2023-01-01,us,2,500,t2,Song B,Artist Y\n",
        );
        let records = read_chart_csv(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].track_name, "Song B");
    }

    #[test]
    fn date_with_time_part_parses() {
        assert_eq!(
            parse_chart_date("2023-05-07 00:00:00"),
            Some(NaiveDate::from_ymd_opt(2023, 5, 7).unwrap())
        );
    }
}
