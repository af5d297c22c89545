use std::sync::Arc;

use veriframe_pipeline::Analyzer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// The analysis pipeline with its injected classifier backend.
    pub analyzer: Arc<Analyzer>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
