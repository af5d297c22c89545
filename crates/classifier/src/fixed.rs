//! Scripted classifier for tests and weights-free deployments.

use image::RgbImage;

use crate::{Classifier, ClassifierError};

/// Classifier that emits a predetermined score sequence instead of
/// running a model. Scores cycle in input order, so a single value
/// scores every frame identically while a list scripts a per-frame
/// trajectory.
#[derive(Debug, Clone)]
pub struct FixedClassifier {
    scores: Vec<f64>,
}

impl FixedClassifier {
    /// Score every image with the same value.
    pub fn uniform(score: f64) -> Self {
        Self {
            scores: vec![score],
        }
    }

    /// Cycle through `scores`, one per image in input order.
    pub fn cycling(scores: Vec<f64>) -> Self {
        let scores = if scores.is_empty() { vec![0.0] } else { scores };
        Self { scores }
    }
}

impl Default for FixedClassifier {
    fn default() -> Self {
        Self::uniform(0.0)
    }
}

impl Classifier for FixedClassifier {
    fn classify(&self, images: &[RgbImage]) -> Result<Vec<f64>, ClassifierError> {
        Ok((0..images.len())
            .map(|i| self.scores[i % self.scores.len()])
            .collect())
    }
}
