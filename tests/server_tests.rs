use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use spotify_charts_server::chart_store::{ChartStore, SqliteChartStore};
use spotify_charts_server::charts::ChartRecord;
use spotify_charts_server::server::{make_app, ServerConfig};
use std::sync::Arc;
use tower::ServiceExt;

fn record(
    date: (i32, u32, u32),
    country: &str,
    position: u32,
    track_name: &str,
    artist: &str,
    streams: i64,
    explicit: bool,
) -> ChartRecord {
    ChartRecord {
        date: Some(NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap()),
        country: country.to_string(),
        position,
        streams,
        track_id: format!("{}-{}-{}", track_name, country, position),
        track_name: track_name.to_string(),
        artist: artist.to_string(),
        artist_genres: String::new(),
        duration_ms: Some(180_000),
        explicit,
    }
}

fn seeded_app(browser_page_size: usize) -> Router {
    let store = SqliteChartStore::open_in_memory().unwrap();
    store
        .import_records(
            &[
                record((2023, 1, 5), "us", 1, "Everywhere Hit", "Artist X", 1000, false),
                record((2023, 1, 5), "gb", 1, "Everywhere Hit", "Artist X", 600, false),
                record((2023, 1, 5), "de", 4, "Everywhere Hit", "Artist X", 300, false),
                record((2023, 2, 14), "us", 2, "Local Favorite", "Artist Y", 2000, true),
                record((2023, 2, 14), "us", 3, "Quiet Tune", "Artist Z", 150, false),
            ],
            false,
        )
        .unwrap();
    let config = ServerConfig {
        browser_page_size,
        ..ServerConfig::default()
    };
    make_app(config, Arc::new(store))
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
async fn all_pages_render() {
    let app = seeded_app(50);
    for uri in [
        "/",
        "/charts/top-streams",
        "/charts/top-songs",
        "/charts/country-diversity",
        "/charts/browser",
    ] {
        let (status, body) = get_body(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{} failed", uri);
        assert!(body.contains("<nav>"), "{} missing nav", uri);
    }
}

#[tokio::test]
async fn stats_reports_entry_count_and_uptime() {
    let app = seeded_app(50);
    let (status, body) = get_body(&app, "/v1/stats").await;
    assert_eq!(status, StatusCode::OK);

    let stats: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(stats["entries"], 5);
    assert!(stats["uptime"].as_str().unwrap().contains("d "));
}

#[tokio::test]
async fn country_diversity_uses_pretty_country_names() {
    let app = seeded_app(50);
    let (status, body) = get_body(&app, "/charts/country-diversity").await;
    assert_eq!(status, StatusCode::OK);
    // us has 3 unique tracks and tops the table with its display name.
    assert!(body.contains("United States (US)"));
}

#[tokio::test]
async fn top_songs_ranks_by_country_reach() {
    let app = seeded_app(50);
    let (status, body) = get_body(&app, "/charts/top-songs").await;
    assert_eq!(status, StatusCode::OK);

    let everywhere = body.find("Everywhere Hit").unwrap();
    let local = body.find("Local Favorite").unwrap();
    assert!(everywhere < local);
}

#[tokio::test]
async fn browser_month_filter() {
    let app = seeded_app(50);
    let (status, body) = get_body(&app, "/charts/browser?month=2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Local Favorite"));
    assert!(!body.contains("Everywhere Hit"));
}

#[tokio::test]
async fn browser_ignores_unparsable_month() {
    let app = seeded_app(50);
    let (status, body) = get_body(&app, "/charts/browser?month=banana").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Everywhere Hit"));
    assert!(body.contains("Local Favorite"));
}

#[tokio::test]
async fn browser_explicit_only_filter() {
    let app = seeded_app(50);
    let (status, body) = get_body(&app, "/charts/browser?explicit_only=on").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Local Favorite"));
    assert!(!body.contains("Quiet Tune"));
}

#[tokio::test]
async fn browser_paginates_and_links_preserve_filters() {
    let app = seeded_app(2);
    let (status, body) = get_body(&app, "/charts/browser?country=us&page=1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Page 1 of 2"));
    assert!(body.contains("/charts/browser?page=2&amp;country=us"));
}

#[tokio::test]
async fn browser_combined_filters() {
    let app = seeded_app(50);
    let (status, body) = get_body(&app, "/charts/browser?country=us&search=quiet").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Quiet Tune"));
    assert!(!body.contains("Local Favorite"));
    assert!(!body.contains("Everywhere Hit"));
}
