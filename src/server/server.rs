use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::error;

use super::state::{GuardedChartStore, ServerState};
use super::{log_requests, pages, ServerConfig};
use crate::chart_store::{EntryFilter, EntryPage};
use crate::charts::{
    country_diversity, country_reach, pretty_country, top_songs_by_streams,
};
use crate::render::{chart_data_uri, render_bar_chart, Orientation};

const MONTH_NAMES: &[&str] = &[
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub entries: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

fn internal_error(err: anyhow::Error) -> Response {
    error!("Request failed: {:#}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Internal server error: {}", err),
    )
        .into_response()
}

async fn landing(State(state): State<ServerState>) -> Response {
    let entries = match state.chart_store.entries_count() {
        Ok(count) => count,
        Err(err) => return internal_error(err),
    };
    let body = format!(
        "<h1>Global Spotify Hits</h1>\
         <p>Daily per-country Spotify chart snapshots for 2023: which songs traveled \
         furthest, which markets chart the most unique tracks, and who racked up the \
         most streams.</p>\
         <p><strong>{}</strong> chart entries loaded. Uptime: {}</p>",
        entries,
        format_uptime(state.start_time.elapsed()),
    );
    Html(pages::layout("Global Spotify Hits", "home", &body)).into_response()
}

async fn stats(State(state): State<ServerState>) -> Response {
    let entries = match state.chart_store.entries_count() {
        Ok(count) => count,
        Err(err) => return internal_error(err),
    };
    Json(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        entries,
    })
    .into_response()
}

async fn top_streams(State(store): State<GuardedChartStore>) -> Response {
    let records = match store.all_records() {
        Ok(records) => records,
        Err(err) => return internal_error(err),
    };
    let rows = top_songs_by_streams(&records, Some(10));

    let labels: Vec<String> = rows
        .iter()
        .map(|row| format!("{} – {}", row.track_name, row.artist))
        .collect();
    let values: Vec<f64> = rows.iter().map(|row| row.total_streams as f64).collect();
    let svg = render_bar_chart(
        &labels,
        &values,
        "Top 10 Tracks by Total Streams",
        "Total Streams",
        Orientation::Horizontal,
    );

    let table_rows: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            vec![
                (i + 1).to_string(),
                row.track_name.clone(),
                row.artist.clone(),
                row.total_streams.to_string(),
            ]
        })
        .collect();
    let body = format!(
        "<h1>Top Tracks by Total Streams</h1>{}{}",
        pages::chart_image(&chart_data_uri(&svg), "Top tracks by total streams"),
        pages::table(&["#", "Track", "Artist", "Total Streams"], &table_rows),
    );
    Html(pages::layout("Top Streams", "top_streams", &body)).into_response()
}

async fn top_songs_by_countries(State(store): State<GuardedChartStore>) -> Response {
    let records = match store.all_records() {
        Ok(records) => records,
        Err(err) => return internal_error(err),
    };
    let rows = country_reach(&records, Some(20));

    // The table shows 20 rows, the chart only the top 10.
    let chart_rows = &rows[..rows.len().min(10)];
    let labels: Vec<String> = chart_rows
        .iter()
        .map(|row| format!("{} – {}", row.track_name, row.artist))
        .collect();
    let values: Vec<f64> = chart_rows.iter().map(|row| row.country_count as f64).collect();
    let svg = render_bar_chart(
        &labels,
        &values,
        "Global Reach: Top 10 Hits by Country Count",
        "Number of Countries",
        Orientation::Horizontal,
    );

    let table_rows: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            vec![
                (i + 1).to_string(),
                row.track_name.clone(),
                row.artist.clone(),
                row.country_count.to_string(),
            ]
        })
        .collect();
    let body = format!(
        "<h1>Top Songs by Number of Countries</h1>{}{}",
        pages::chart_image(&chart_data_uri(&svg), "Top songs by country count"),
        pages::table(&["#", "Track", "Artist", "Countries"], &table_rows),
    );
    Html(pages::layout("Top Songs", "top_songs", &body)).into_response()
}

async fn country_diversity_page(State(store): State<GuardedChartStore>) -> Response {
    let records = match store.all_records() {
        Ok(records) => records,
        Err(err) => return internal_error(err),
    };
    let rows = country_diversity(&records, Some(10));

    let labels: Vec<String> = rows.iter().map(|row| pretty_country(&row.country)).collect();
    let values: Vec<f64> = rows.iter().map(|row| row.unique_tracks as f64).collect();
    // Vertical bars read better for country names.
    let svg = render_bar_chart(
        &labels,
        &values,
        "Market Diversity: Unique Tracks per Country",
        "Unique Tracks Count",
        Orientation::Vertical,
    );

    let table_rows: Vec<Vec<String>> = rows
        .iter()
        .zip(labels.iter())
        .map(|(row, label)| vec![label.clone(), row.unique_tracks.to_string()])
        .collect();
    let body = format!(
        "<h1>Country Chart Diversity</h1>{}{}",
        pages::chart_image(&chart_data_uri(&svg), "Unique tracks per country"),
        pages::table(&["Country", "Unique Tracks"], &table_rows),
    );
    Html(pages::layout(
        "Country Diversity",
        "country_diversity",
        &body,
    ))
    .into_response()
}

#[derive(Deserialize, Debug, Default)]
struct BrowserQuery {
    country: Option<String>,
    month: Option<String>,
    search: Option<String>,
    explicit_only: Option<String>,
    page: Option<usize>,
}

impl BrowserQuery {
    fn to_filter(&self) -> EntryFilter {
        EntryFilter {
            country: self
                .country
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            // A non-numeric month is ignored rather than rejected.
            month: self
                .month
                .as_deref()
                .and_then(|m| m.trim().parse::<u32>().ok())
                .filter(|m| (1..=12).contains(m)),
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            explicit_only: self.explicit_only.is_some(),
        }
    }
}

fn browser_url(filter: &EntryFilter, page: usize) -> String {
    let mut parts = vec![format!("page={}", page)];
    if let Some(country) = &filter.country {
        parts.push(format!("country={}", urlencoding::encode(country)));
    }
    if let Some(month) = filter.month {
        parts.push(format!("month={}", month));
    }
    if let Some(search) = &filter.search {
        parts.push(format!("search={}", urlencoding::encode(search)));
    }
    if filter.explicit_only {
        parts.push("explicit_only=on".to_string());
    }
    format!("/charts/browser?{}", parts.join("&"))
}

fn browser_filter_form(filter: &EntryFilter, countries: &[String]) -> String {
    let country_options: String = countries
        .iter()
        .map(|code| {
            let selected = if filter.country.as_deref().map(str::to_lowercase)
                == Some(code.to_lowercase())
            {
                " selected"
            } else {
                ""
            };
            format!(
                "<option value=\"{}\"{}>{}</option>",
                pages::html_escape(code),
                selected,
                pages::html_escape(&pretty_country(code)),
            )
        })
        .collect();
    let month_options: String = MONTH_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let value = i + 1;
            let selected = if filter.month == Some(value as u32) {
                " selected"
            } else {
                ""
            };
            format!("<option value=\"{}\"{}>{}</option>", value, selected, name)
        })
        .collect();
    let explicit_checked = if filter.explicit_only { " checked" } else { "" };
    format!(
        "<form class=\"filters\" method=\"get\" action=\"/charts/browser\">\
         <select name=\"country\"><option value=\"\">All countries</option>{}</select>\
         <select name=\"month\"><option value=\"\">All months</option>{}</select>\
         <input type=\"text\" name=\"search\" placeholder=\"Track or artist\" value=\"{}\">\
         <label><input type=\"checkbox\" name=\"explicit_only\"{}> Explicit only</label>\
         <button type=\"submit\">Filter</button></form>",
        country_options,
        month_options,
        pages::html_escape(filter.search.as_deref().unwrap_or("")),
        explicit_checked,
    )
}

fn browser_pagination(filter: &EntryFilter, page: &EntryPage) -> String {
    let mut html = String::from("<div class=\"pagination\">");
    if page.page > 1 {
        html.push_str(&format!(
            "<a href=\"{}\">&laquo; previous</a>",
            pages::html_escape(&browser_url(filter, page.page - 1))
        ));
    }
    html.push_str(&format!(
        "Page {} of {} ({} entries)",
        page.page, page.page_count, page.total_entries
    ));
    if page.page < page.page_count {
        html.push_str(&format!(
            "<a href=\"{}\">next &raquo;</a>",
            pages::html_escape(&browser_url(filter, page.page + 1))
        ));
    }
    html.push_str("</div>");
    html
}

async fn chart_browser(
    State(state): State<ServerState>,
    Query(query): Query<BrowserQuery>,
) -> Response {
    let filter = query.to_filter();

    let countries = match state.chart_store.distinct_countries() {
        Ok(countries) => countries,
        Err(err) => return internal_error(err),
    };
    let page = match state.chart_store.query_entries(
        &filter,
        query.page.unwrap_or(1),
        state.config.browser_page_size,
    ) {
        Ok(page) => page,
        Err(err) => return internal_error(err),
    };

    let table_rows: Vec<Vec<String>> = page
        .entries
        .iter()
        .map(|entry| {
            vec![
                entry.date.to_string(),
                pretty_country(&entry.country),
                entry.position.to_string(),
                entry.track_name.clone(),
                entry.artist.clone(),
                entry.streams.to_string(),
                if entry.explicit { "Yes" } else { "No" }.to_string(),
            ]
        })
        .collect();

    let body = format!(
        "<h1>Chart Browser</h1>{}{}{}",
        browser_filter_form(&filter, &countries),
        pages::table(
            &["Date", "Country", "#", "Track", "Artist", "Streams", "Explicit"],
            &table_rows,
        ),
        browser_pagination(&filter, &page),
    );
    Html(pages::layout("Chart Browser", "browser", &body)).into_response()
}

pub fn make_app(config: ServerConfig, chart_store: GuardedChartStore) -> Router {
    let state = ServerState::new(config, chart_store);

    let chart_routes: Router = Router::new()
        .route("/top-streams", get(top_streams))
        .route("/top-songs", get(top_songs_by_countries))
        .route("/country-diversity", get(country_diversity_page))
        .route("/browser", get(chart_browser))
        .with_state(state.clone());

    Router::new()
        .route("/", get(landing))
        .route("/v1/stats", get(stats))
        .with_state(state.clone())
        .nest("/charts", chart_routes)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(config: ServerConfig, chart_store: GuardedChartStore) -> Result<()> {
    let port = config.port;
    let app = make_app(config, chart_store);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    Ok(axum::serve(listener, app).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_store::{ChartStore, SqliteChartStore};
    use crate::charts::ChartRecord;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn record(track_name: &str, artist: &str, country: &str, streams: i64) -> ChartRecord {
        ChartRecord {
            date: NaiveDate::from_ymd_opt(2023, 6, 1),
            country: country.to_string(),
            position: 1,
            streams,
            track_id: format!("{}-{}", track_name, country),
            track_name: track_name.to_string(),
            artist: artist.to_string(),
            artist_genres: String::new(),
            duration_ms: Some(200_000),
            explicit: false,
        }
    }

    fn test_app() -> Router {
        let store = SqliteChartStore::open_in_memory().unwrap();
        store
            .import_records(
                &[
                    record("Song A", "Artist X", "us", 100),
                    record("Song A", "Artist X", "gb", 50),
                    record("Song B", "Artist Y", "us", 300),
                ],
                false,
            )
            .unwrap();
        make_app(ServerConfig::default(), Arc::new(store))
    }

    async fn get_body(app: &Router, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&bytes).to_string())
    }

    #[tokio::test]
    async fn landing_page_reports_entry_count() {
        let app = test_app();
        let (status, body) = get_body(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Global Spotify Hits"));
        assert!(body.contains("<strong>3</strong>"));
    }

    #[tokio::test]
    async fn stats_endpoint_returns_json() {
        let app = test_app();
        let (status, body) = get_body(&app, "/v1/stats").await;
        assert_eq!(status, StatusCode::OK);
        let stats: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(stats["entries"], 3);
    }

    #[tokio::test]
    async fn top_streams_ranks_songs_by_total() {
        let app = test_app();
        let (status, body) = get_body(&app, "/charts/top-streams").await;
        assert_eq!(status, StatusCode::OK);
        // Song B (300) outranks Song A (150)
        let pos_b = body.find("Song B").unwrap();
        let pos_a = body.find("Song A").unwrap();
        assert!(pos_b < pos_a);
        assert!(body.contains("data:image/svg+xml;base64,"));
    }

    #[tokio::test]
    async fn top_songs_counts_countries() {
        let app = test_app();
        let (status, body) = get_body(&app, "/charts/top-songs").await;
        assert_eq!(status, StatusCode::OK);
        let pos_a = body.find("Song A").unwrap();
        let pos_b = body.find("Song B").unwrap();
        assert!(pos_a < pos_b);
    }

    #[tokio::test]
    async fn browser_filters_by_country() {
        let app = test_app();
        let (status, body) = get_body(&app, "/charts/browser?country=gb").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Song A"));
        assert!(!body.contains("Song B"));
    }

    #[tokio::test]
    async fn browser_search_matches_artist() {
        let app = test_app();
        let (status, body) = get_body(&app, "/charts/browser?search=Artist+Y").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Song B"));
        assert!(!body.contains("Song A"));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = test_app();
        let (status, _) = get_body(&app, "/charts/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
