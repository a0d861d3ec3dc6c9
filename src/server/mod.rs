mod pages;
mod requests_logging;
#[allow(clippy::module_inception)]
mod server;
mod state;

pub use requests_logging::{log_requests, RequestsLoggingLevel};
pub use server::{make_app, run_server};
pub use state::{GuardedChartStore, ServerState};

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Entries per page in the raw record browser.
    pub browser_page_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 8000,
            browser_page_size: 50,
        }
    }
}
