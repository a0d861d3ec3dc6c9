//! Spotify Charts Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod chart_store;
pub mod charts;
pub mod render;
pub mod server;

// Re-export commonly used types for convenience
pub use chart_store::{ChartStore, SqliteChartStore};
pub use charts::{ChartDataDir, ChartRecord};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
