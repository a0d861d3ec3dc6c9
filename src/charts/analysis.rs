//! The four chart aggregations.
//!
//! Each function is a pure group-by-and-reduce over the full record slice:
//! group by a key, reduce one column, sort descending by the reduced value
//! and optionally truncate to the top N. Ties are broken ascending by the
//! group key so output order is deterministic.
//!
//! `top_n` semantics: `None` returns the full set, `Some(0)` returns an
//! empty one.

use super::model::{ChartRecord, SongKey};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryReachRow {
    pub track_name: String,
    pub artist: String,
    pub country_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryDiversityRow {
    pub country: String,
    pub unique_tracks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLongevityRow {
    pub track_name: String,
    pub artist: String,
    pub days_on_chart: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopStreamsRow {
    pub track_name: String,
    pub artist: String,
    pub total_streams: i64,
}

fn truncated<T>(mut rows: Vec<T>, top_n: Option<usize>) -> Vec<T> {
    if let Some(n) = top_n {
        rows.truncate(n);
    }
    rows
}

/// For each song, the number of distinct countries it charted in.
pub fn country_reach(records: &[ChartRecord], top_n: Option<usize>) -> Vec<CountryReachRow> {
    let mut groups: HashMap<SongKey, HashSet<&str>> = HashMap::new();
    for record in records {
        groups
            .entry(SongKey::of(record))
            .or_default()
            .insert(record.country.as_str());
    }

    let mut rows: Vec<CountryReachRow> = groups
        .into_iter()
        .map(|(key, countries)| CountryReachRow {
            track_name: key.track_name,
            artist: key.artist,
            country_count: countries.len(),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.country_count
            .cmp(&a.country_count)
            .then_with(|| a.track_name.cmp(&b.track_name))
            .then_with(|| a.artist.cmp(&b.artist))
    });
    truncated(rows, top_n)
}

/// For each country, the number of distinct track names that charted there.
pub fn country_diversity(
    records: &[ChartRecord],
    top_n: Option<usize>,
) -> Vec<CountryDiversityRow> {
    let mut groups: HashMap<&str, HashSet<&str>> = HashMap::new();
    for record in records {
        groups
            .entry(record.country.as_str())
            .or_default()
            .insert(record.track_name.as_str());
    }

    let mut rows: Vec<CountryDiversityRow> = groups
        .into_iter()
        .map(|(country, tracks)| CountryDiversityRow {
            country: country.to_string(),
            unique_tracks: tracks.len(),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.unique_tracks
            .cmp(&a.unique_tracks)
            .then_with(|| a.country.cmp(&b.country))
    });
    truncated(rows, top_n)
}

/// For each song, the number of distinct dates it appeared on any chart.
/// Records without a parsed date are excluded from the count.
pub fn chart_longevity(records: &[ChartRecord], top_n: Option<usize>) -> Vec<ChartLongevityRow> {
    let mut groups: HashMap<SongKey, HashSet<NaiveDate>> = HashMap::new();
    for record in records {
        let Some(date) = record.date else {
            continue;
        };
        groups.entry(SongKey::of(record)).or_default().insert(date);
    }

    let mut rows: Vec<ChartLongevityRow> = groups
        .into_iter()
        .map(|(key, dates)| ChartLongevityRow {
            track_name: key.track_name,
            artist: key.artist,
            days_on_chart: dates.len(),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.days_on_chart
            .cmp(&a.days_on_chart)
            .then_with(|| a.track_name.cmp(&b.track_name))
            .then_with(|| a.artist.cmp(&b.artist))
    });
    truncated(rows, top_n)
}

/// For each song, the total streams summed across all countries and dates.
pub fn top_songs_by_streams(records: &[ChartRecord], top_n: Option<usize>) -> Vec<TopStreamsRow> {
    let mut groups: HashMap<SongKey, i64> = HashMap::new();
    for record in records {
        *groups.entry(SongKey::of(record)).or_insert(0) += record.streams;
    }

    let mut rows: Vec<TopStreamsRow> = groups
        .into_iter()
        .map(|(key, total)| TopStreamsRow {
            track_name: key.track_name,
            artist: key.artist,
            total_streams: total,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_streams
            .cmp(&a.total_streams)
            .then_with(|| a.track_name.cmp(&b.track_name))
            .then_with(|| a.artist.cmp(&b.artist))
    });
    truncated(rows, top_n)
}
