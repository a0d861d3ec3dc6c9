use super::models::{ChartEntry, EntryFilter, EntryPage, ImportSummary};
use super::schema::{create_schema, validate_schema};
use super::ChartStore;
use crate::charts::ChartRecord;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, ToSql};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub struct SqliteChartStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteChartStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let is_new_db = !path.exists();

        let conn = Connection::open(path).context("Failed to open chart database")?;
        if is_new_db {
            info!("Creating new chart database at {:?}", path);
            create_schema(&conn)?;
        } else {
            validate_schema(&conn)
                .with_context(|| format!("Chart database validation failed for {:?}", path))?;
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// An in-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<ChartEntry> {
        let date_str: String = row.get("date")?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(err),
            )
        })?;
        Ok(ChartEntry {
            id: row.get("id")?,
            date,
            country: row.get("country")?,
            position: row.get("position")?,
            streams: row.get("streams")?,
            track_id: row.get("track_id")?,
            track_name: row.get("track_name")?,
            artist: row.get("artist")?,
            artist_genres: row.get("artist_genres")?,
            duration_ms: row.get("duration_ms")?,
            explicit: row.get("explicit")?,
        })
    }

    /// Escapes LIKE metacharacters so a search term matches them literally.
    fn escape_like(term: &str) -> String {
        term.replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_")
    }

    fn filter_clauses(filter: &EntryFilter) -> (String, Vec<Box<dyn ToSql>>) {
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(country) = &filter.country {
            clauses.push("LOWER(country) = LOWER(?)");
            params.push(Box::new(country.clone()));
        }
        if let Some(month) = filter.month {
            clauses.push("CAST(strftime('%m', date) AS INTEGER) = ?");
            params.push(Box::new(month));
        }
        if let Some(search) = &filter.search {
            clauses.push(
                "(track_name LIKE '%' || ? || '%' ESCAPE '\\' \
                 OR artist LIKE '%' || ? || '%' ESCAPE '\\')",
            );
            let escaped = Self::escape_like(search);
            params.push(Box::new(escaped.clone()));
            params.push(Box::new(escaped));
        }
        if filter.explicit_only {
            clauses.push("explicit = 1");
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        (where_sql, params)
    }
}

impl ChartStore for SqliteChartStore {
    fn import_records(&self, records: &[ChartRecord], reset: bool) -> Result<ImportSummary> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let mut summary = ImportSummary::default();
        if reset {
            summary.deleted = tx.execute("DELETE FROM chart_entries", [])?;
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO chart_entries
                 (date, country, position, streams, track_id, track_name, artist,
                  artist_genres, duration_ms, explicit)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for record in records {
                let Some(date) = record.date else {
                    warn!(
                        "Skipping record without a valid date: {} - {}",
                        record.track_name, record.artist
                    );
                    summary.skipped += 1;
                    continue;
                };
                stmt.execute(params![
                    date.format("%Y-%m-%d").to_string(),
                    record.country,
                    record.position,
                    record.streams,
                    record.track_id,
                    record.track_name,
                    record.artist,
                    record.artist_genres,
                    record.duration_ms,
                    record.explicit,
                ])?;
                summary.inserted += 1;
            }
        }

        tx.commit()?;
        Ok(summary)
    }

    fn entries_count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM chart_entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn all_records(&self) -> Result<Vec<ChartRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, date, country, position, streams, track_id, track_name, artist,
                    artist_genres, duration_ms, explicit
             FROM chart_entries
             ORDER BY country, date, position",
        )?;
        let records = stmt
            .query_map([], Self::row_to_entry)?
            .collect::<std::result::Result<Vec<ChartEntry>, _>>()?
            .into_iter()
            .map(|entry| ChartRecord {
                date: Some(entry.date),
                country: entry.country,
                position: entry.position,
                streams: entry.streams,
                track_id: entry.track_id,
                track_name: entry.track_name,
                artist: entry.artist,
                artist_genres: entry.artist_genres,
                duration_ms: entry.duration_ms,
                explicit: entry.explicit,
            })
            .collect();
        Ok(records)
    }

    fn distinct_countries(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT DISTINCT country FROM chart_entries ORDER BY country")?;
        let countries = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(countries)
    }

    fn query_entries(
        &self,
        filter: &EntryFilter,
        page: usize,
        page_size: usize,
    ) -> Result<EntryPage> {
        let page_size = page_size.max(1);
        let conn = self.conn.lock().unwrap();
        let (where_sql, mut params) = Self::filter_clauses(filter);

        let count_sql = format!("SELECT COUNT(*) FROM chart_entries{}", where_sql);
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let total: i64 = conn.query_row(&count_sql, &param_refs[..], |row| row.get(0))?;
        let total_entries = total as usize;

        let page_count = total_entries.div_ceil(page_size).max(1);
        let page = page.clamp(1, page_count);
        let offset = (page - 1) * page_size;

        let select_sql = format!(
            "SELECT id, date, country, position, streams, track_id, track_name, artist,
                    artist_genres, duration_ms, explicit
             FROM chart_entries{}
             ORDER BY date DESC, position ASC
             LIMIT ? OFFSET ?",
            where_sql
        );
        params.push(Box::new(page_size as i64));
        params.push(Box::new(offset as i64));
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&select_sql)?;
        let entries = stmt
            .query_map(&param_refs[..], Self::row_to_entry)?
            .collect::<std::result::Result<Vec<ChartEntry>, _>>()?;

        Ok(EntryPage {
            entries,
            page,
            page_count,
            total_entries,
        })
    }
}
