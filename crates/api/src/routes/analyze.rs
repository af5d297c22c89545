//! The media analysis upload endpoint.

use std::path::PathBuf;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use uuid::Uuid;

use veriframe_core::media;
use veriframe_core::report::MediaReport;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Mount the analysis route with its own body limit so uploads up to
/// the configured size pass where the axum default (2MB) would not.
pub fn router(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .route("/api/analyze", post(analyze_media))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
}

/// POST /api/analyze
///
/// Accept a single multipart `file` part, stage it in the upload
/// directory, run the analysis pipeline, and return the report. The
/// staged copy is removed when the request finishes, whatever the
/// outcome.
pub async fn analyze_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<MediaReport>> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        // Browsers submit an empty filename when no file was selected.
        let file_name = field.file_name().unwrap_or("").to_string();
        if file_name.is_empty() {
            return Err(AppError::BadRequest("No selected file".to_string()));
        }

        let Some(kind) = media::kind_for(&file_name) else {
            return Err(AppError::BadRequest("File type not allowed".to_string()));
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        upload = Some((file_name, kind, data));
        break;
    }
    let Some((file_name, kind, data)) = upload else {
        return Err(AppError::BadRequest("No file part".to_string()));
    };

    let display_name = media::sanitize_file_name(&file_name);
    let staged_path = state
        .config
        .upload_dir
        .join(format!("{}_{display_name}", Uuid::new_v4()));

    // The guard covers the write itself; an errored or abandoned
    // write must not leave a partial file behind.
    let _staged = StagedUpload {
        path: staged_path.clone(),
    };
    tokio::fs::write(&staged_path, &data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to stage upload: {e}")))?;

    let report = state.analyzer.analyze(&staged_path, kind, &display_name).await?;
    Ok(Json(report))
}

/// Removes the staged upload when dropped, covering every exit path
/// out of the handler, including a write that never completed.
struct StagedUpload {
    path: PathBuf,
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if let Err(error) = std::fs::remove_file(&self.path) {
            if error.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    %error,
                    "Failed to remove staged upload"
                );
            }
        }
    }
}
