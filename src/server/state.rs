use super::ServerConfig;
use crate::chart_store::ChartStore;
use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

pub type GuardedChartStore = Arc<dyn ChartStore>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub chart_store: GuardedChartStore,
}

impl ServerState {
    pub fn new(config: ServerConfig, chart_store: GuardedChartStore) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            chart_store,
        }
    }
}

impl FromRef<ServerState> for GuardedChartStore {
    fn from_ref(input: &ServerState) -> Self {
        input.chart_store.clone()
    }
}
