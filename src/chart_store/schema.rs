//! SQLite schema for the chart entries database.

use anyhow::{bail, Result};
use rusqlite::Connection;

pub const CHART_DB_VERSION: i64 = 1;

const EXPECTED_COLUMNS: &[&str] = &[
    "id",
    "date",
    "country",
    "position",
    "streams",
    "track_id",
    "track_name",
    "artist",
    "artist_genres",
    "duration_ms",
    "explicit",
];

const EXPECTED_INDEXES: &[&str] = &[
    "idx_chart_entries_country",
    "idx_chart_entries_track_name",
    "idx_chart_entries_artist",
    "idx_chart_entries_date",
];

pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE chart_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            country TEXT NOT NULL,
            position INTEGER NOT NULL,
            streams INTEGER NOT NULL,
            track_id TEXT NOT NULL,
            track_name TEXT NOT NULL,
            artist TEXT NOT NULL,
            artist_genres TEXT NOT NULL DEFAULT '',
            duration_ms INTEGER,
            explicit INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX idx_chart_entries_country ON chart_entries(country);
        CREATE INDEX idx_chart_entries_track_name ON chart_entries(track_name);
        CREATE INDEX idx_chart_entries_artist ON chart_entries(artist);
        CREATE INDEX idx_chart_entries_date ON chart_entries(date);",
    )?;
    conn.execute(&format!("PRAGMA user_version = {}", CHART_DB_VERSION), [])?;
    Ok(())
}

/// Checks that an existing database carries the expected version, columns
/// and indexes, failing with a descriptive error otherwise.
pub fn validate_schema(conn: &Connection) -> Result<()> {
    let version: i64 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if version != CHART_DB_VERSION {
        bail!(
            "Chart database version {} is not supported (expected {})",
            version,
            CHART_DB_VERSION
        );
    }

    let mut stmt = conn.prepare("PRAGMA table_info(chart_entries);")?;
    let actual_columns: Vec<String> = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<_, _>>()?;
    if actual_columns.is_empty() {
        bail!("Chart database is missing the chart_entries table");
    }
    if actual_columns != EXPECTED_COLUMNS {
        bail!(
            "chart_entries columns mismatch: expected [{}], found [{}]",
            EXPECTED_COLUMNS.join(", "),
            actual_columns.join(", ")
        );
    }

    for index_name in EXPECTED_INDEXES {
        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type='index' AND name=?1 AND tbl_name='chart_entries'",
                [index_name],
                |_| Ok(true),
            )
            .unwrap_or(false);
        if !exists {
            bail!("chart_entries is missing index '{}'", index_name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_schema_validates() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        validate_schema(&conn).unwrap();
    }

    #[test]
    fn validate_detects_wrong_version() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        conn.execute("PRAGMA user_version = 42", []).unwrap();

        let err = validate_schema(&conn).unwrap_err().to_string();
        assert!(err.contains("version 42"));
    }

    #[test]
    fn validate_detects_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(&format!("PRAGMA user_version = {}", CHART_DB_VERSION), [])
            .unwrap();

        let err = validate_schema(&conn).unwrap_err().to_string();
        assert!(err.contains("missing the chart_entries table"));
    }

    #[test]
    fn validate_detects_missing_index() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        conn.execute("DROP INDEX idx_chart_entries_artist", [])
            .unwrap();

        let err = validate_schema(&conn).unwrap_err().to_string();
        assert!(err.contains("idx_chart_entries_artist"));
    }
}
