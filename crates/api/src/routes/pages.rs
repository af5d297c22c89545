//! Page shells and static asset pass-through.

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::ServerConfig;
use crate::state::AppState;

/// Mount the landing page, the results page (with and without the
/// `.html` suffix), and the static asset tree.
pub fn router(config: &ServerConfig) -> Router<AppState> {
    let index = ServeFile::new(config.static_dir.join("index.html"));
    let results = ServeFile::new(config.static_dir.join("results.html"));

    Router::new()
        .route_service("/", index)
        .route_service("/results", results.clone())
        .route_service("/results.html", results)
        .nest_service("/static", ServeDir::new(&config.static_dir))
}
