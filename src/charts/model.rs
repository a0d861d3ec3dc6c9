use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One track's position on one country's chart on one date.
///
/// A record is logically identified by `(date, country, track_id)`; the
/// dataset is a daily per-country snapshot and records are never mutated
/// after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRecord {
    /// Chart date. `None` when the source value could not be parsed; such
    /// records are kept in memory but excluded from date-based aggregations
    /// and never persisted.
    pub date: Option<NaiveDate>,
    /// Country code as found in the dataset (e.g. "us", "global").
    pub country: String,
    /// Chart position, 1 = top.
    pub position: u32,
    /// Number of streams for this track on that date.
    pub streams: i64,
    /// Spotify track identifier.
    pub track_id: String,
    pub track_name: String,
    /// Primary artist display name.
    pub artist: String,
    /// Optional free-text genres, empty when absent.
    pub artist_genres: String,
    /// Track duration in milliseconds, when known.
    pub duration_ms: Option<i64>,
    pub explicit: bool,
}

/// The identity key used to group chart records into songs.
///
/// Songs are identified by display name and artist, not by `track_id`: two
/// distinct track ids sharing both fields (say, a single and a remaster) are
/// treated as the same song by every aggregation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SongKey {
    pub track_name: String,
    pub artist: String,
}

impl SongKey {
    pub fn of(record: &ChartRecord) -> Self {
        SongKey {
            track_name: record.track_name.clone(),
            artist: record.artist.clone(),
        }
    }
}
