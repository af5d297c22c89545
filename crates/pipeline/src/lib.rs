//! Media analysis orchestration.
//!
//! [`Analyzer`] ties the pieces together: it dispatches an upload to
//! the still-image or sampled-video path, runs the classifier, renders
//! the heatmap, and assembles the report. The classifier backend is
//! injected, so the whole pipeline runs against scripted scores in
//! tests.

mod analyzer;

pub use analyzer::{Analyzer, DEFAULT_SAMPLE_RATE};

use veriframe_classifier::ClassifierError;

/// Error type for analysis runs.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The uploaded image could not be decoded.
    #[error("Could not read image file")]
    UnreadableImage,

    /// No frames could be extracted from the uploaded video.
    #[error("Failed to extract frames from the video")]
    NoFrames,

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
