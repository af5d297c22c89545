use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use veriframe_api::config::ServerConfig;
use veriframe_api::router::build_app_router;
use veriframe_api::state::AppState;
use veriframe_classifier::{vit::DEFAULT_MODEL_REPO, Classifier};
use veriframe_pipeline::{Analyzer, DEFAULT_SAMPLE_RATE};

/// Build a test `ServerConfig` with safe defaults and the given
/// staging/static directories.
pub fn test_config(upload_dir: &Path, static_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: 50 * 1024 * 1024,
        static_dir: static_dir.to_path_buf(),
        sample_rate: DEFAULT_SAMPLE_RATE,
        model_repo: DEFAULT_MODEL_REPO.to_string(),
        model_dir: None,
    }
}

/// Build the full application router with all middleware layers and a
/// scripted classifier, mirroring the construction in `main.rs` so
/// integration tests exercise the same stack production uses.
pub fn build_test_app(classifier: Arc<dyn Classifier>, config: ServerConfig) -> Router {
    let state = AppState {
        analyzer: Arc::new(Analyzer::with_sample_rate(classifier, config.sample_rate)),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request builds"),
    )
    .await
    .expect("request succeeds")
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is valid JSON")
}

/// Multipart boundary used by the upload helpers.
pub const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Encode a single-part `multipart/form-data` body.
pub fn multipart_file_body(field_name: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST a single file as `multipart/form-data`.
pub async fn post_multipart_file(
    app: Router,
    uri: &str,
    field_name: &str,
    file_name: &str,
    bytes: &[u8],
) -> Response {
    post_multipart_raw(app, uri, multipart_file_body(field_name, file_name, bytes)).await
}

/// POST a raw multipart body (for malformed-payload cases).
pub async fn post_multipart_raw(app: Router, uri: &str, body: Vec<u8>) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request builds");

    app.oneshot(request).await.expect("request succeeds")
}

/// Render a small PNG as raw bytes for upload tests.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 11) as u8, (y * 17) as u8, 64])
    });
    let mut buffer = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("PNG encodes");
    buffer.into_inner()
}
