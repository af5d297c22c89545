use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use veriframe_api::config::ServerConfig;
use veriframe_api::{router, state};
use veriframe_classifier::{Classifier, VitClassifier};
use veriframe_pipeline::Analyzer;

use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "veriframe_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Upload staging directory ---
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("Failed to create upload directory");

    // --- Classifier model ---
    // Loading can download weights on first run, so it happens before
    // the listener binds: a responding server always has a model.
    let classifier: Arc<dyn Classifier> = match &config.model_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Loading classifier model from local directory");
            Arc::new(
                VitClassifier::from_files(&dir.join("config.json"), &dir.join("model.safetensors"))
                    .expect("Failed to load classifier model from MODEL_DIR"),
            )
        }
        None => {
            tracing::info!(repo = %config.model_repo, "Loading classifier model");
            Arc::new(
                VitClassifier::from_hub(&config.model_repo)
                    .expect("Failed to load classifier model"),
            )
        }
    };
    tracing::info!("Classifier model loaded");

    // --- App state ---
    let state = AppState {
        analyzer: Arc::new(Analyzer::with_sample_rate(classifier, config.sample_rate)),
        config: Arc::new(config.clone()),
    };

    // --- Router ---
    let app = router::build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
