//! Upload extension policy and media kind dispatch.
//!
//! The service accepts a closed set of video and image extensions.
//! Everything else is rejected before any bytes reach the pipeline.
//! Dispatch is deliberately narrow: only plain JPEG/PNG uploads take
//! the single-image path; WebP (which may be animated) goes through
//! the video path.

// ---------------------------------------------------------------------------
// Extension policy
// ---------------------------------------------------------------------------

/// Extensions the analysis endpoint accepts, lowercase, without dots.
pub const ALLOWED_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "jpg", "jpeg", "png", "webp"];

/// Subset of [`ALLOWED_EXTENSIONS`] handled by the single-image path.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Which analysis path an upload takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Single still image: one classification, one heatmap.
    Image,
    /// Frame-sampled media: per-frame classification and aggregation.
    Video,
}

/// Extract the lowercase extension from a file name, if it has one.
///
/// Mirrors the upload check: a name without a dot has no extension and
/// is never accepted.
pub fn extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Whether a file name carries an accepted extension.
pub fn is_allowed(file_name: &str) -> bool {
    kind_for(file_name).is_some()
}

/// Resolve the analysis path for a file name.
///
/// Returns `None` when the extension is missing or not accepted.
pub fn kind_for(file_name: &str) -> Option<MediaKind> {
    let ext = extension(file_name)?;
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else {
        Some(MediaKind::Video)
    }
}

// ---------------------------------------------------------------------------
// File name sanitization
// ---------------------------------------------------------------------------

/// Sanitize an upload file name for use as a path component.
///
/// Strips any directory components, replaces every character outside
/// `[A-Za-z0-9._-]` with `_`, and falls back to `"upload"` when nothing
/// usable remains. The extension survives sanitization, so kind
/// dispatch on the staged file matches dispatch on the original name.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}
