//! Image classification backends for fake-probability scoring.
//!
//! [`Classifier`] is the seam between the analysis pipeline and the
//! model runtime. The production backend ([`VitClassifier`]) runs a
//! pretrained ViT checkpoint through candle; [`FixedClassifier`]
//! scripts scores so pipeline and API behavior can be tested without
//! model weights.

pub mod fixed;
pub mod vit;

pub use fixed::FixedClassifier;
pub use vit::VitClassifier;

use image::RgbImage;

/// Error type for classifier construction and inference.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("failed to fetch model files: {0}")]
    Fetch(String),

    #[error("failed to load model: {0}")]
    Load(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Pluggable fake-probability scorer.
///
/// Implementations return one score in `[0, 1]` per input image,
/// index-aligned with the input slice. Scoring is CPU-bound; callers
/// run it off the async runtime.
pub trait Classifier: Send + Sync {
    fn classify(&self, images: &[RgbImage]) -> Result<Vec<f64>, ClassifierError>;
}
