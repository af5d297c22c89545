//! The analysis orchestrator.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use veriframe_classifier::Classifier;
use veriframe_core::media::MediaKind;
use veriframe_core::report::{self, ImageReport, MediaReport, VideoReport};
use veriframe_core::sampler::{self, SampledVideo};
use veriframe_core::{encode, heatmap};

use crate::PipelineError;

/// Default video sampling rate in frames per second of footage.
pub const DEFAULT_SAMPLE_RATE: f64 = 1.0;

/// Runs uploads through classification and report assembly.
///
/// Cheap to share behind an `Arc`; the classifier backend is injected
/// at construction.
pub struct Analyzer {
    classifier: Arc<dyn Classifier>,
    sample_rate: f64,
}

impl Analyzer {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }

    /// Override the video sampling rate. Rates at or below zero are
    /// rejected when a video is analyzed, not here.
    pub fn with_sample_rate(classifier: Arc<dyn Classifier>, sample_rate: f64) -> Self {
        Self {
            classifier,
            sample_rate,
        }
    }

    /// Analyze the staged media file at `path`.
    ///
    /// `display_name` is the sanitized upload name echoed in the
    /// report. CPU-heavy work (decoding, inference, rendering) runs on
    /// the blocking pool.
    pub async fn analyze(
        &self,
        path: &Path,
        kind: MediaKind,
        display_name: &str,
    ) -> Result<MediaReport, PipelineError> {
        match kind {
            MediaKind::Image => self
                .analyze_image(path, display_name)
                .await
                .map(MediaReport::Image),
            MediaKind::Video => self
                .analyze_video(path, display_name)
                .await
                .map(MediaReport::Video),
        }
    }

    async fn analyze_image(
        &self,
        path: &Path,
        display_name: &str,
    ) -> Result<ImageReport, PipelineError> {
        let started = Instant::now();
        let bytes = tokio::fs::read(path).await?;

        let classifier = Arc::clone(&self.classifier);
        let display_name = display_name.to_string();

        let report = tokio::task::spawn_blocking(move || -> Result<ImageReport, PipelineError> {
            let image = image::load_from_memory(&bytes)
                .map_err(|_| PipelineError::UnreadableImage)?
                .to_rgb8();

            let scores = classifier.classify(std::slice::from_ref(&image))?;
            let score = scores
                .first()
                .copied()
                .ok_or_else(|| PipelineError::Internal("classifier returned no score".into()))?;

            let heatmap = heatmap::render_heatmap(&image, score);
            let original = encode::rgb_png_base64(&image)?;
            let heatmap = encode::rgba_png_base64(&heatmap)?;

            Ok(report::build_image_report(
                &display_name,
                score,
                original,
                heatmap,
                started.elapsed().as_secs_f64(),
            ))
        })
        .await
        .map_err(|e| PipelineError::Internal(format!("analysis task failed: {e}")))??;

        tracing::info!(
            file = %report.details.file_name,
            classification = report.classification,
            "image analysis complete"
        );
        Ok(report)
    }

    async fn analyze_video(
        &self,
        path: &Path,
        display_name: &str,
    ) -> Result<VideoReport, PipelineError> {
        let started = Instant::now();

        let sampled = sampler::sample_video(path, self.sample_rate)
            .await
            .map_err(|error| {
                tracing::warn!(%error, "frame sampling failed");
                PipelineError::NoFrames
            })?;
        if sampled.frames.is_empty() {
            return Err(PipelineError::NoFrames);
        }

        let classifier = Arc::clone(&self.classifier);
        let display_name = display_name.to_string();

        let report = tokio::task::spawn_blocking(move || -> Result<VideoReport, PipelineError> {
            let SampledVideo {
                frames,
                frame_indices,
                fps,
                duration,
            } = sampled;

            let scores = classifier.classify(&frames)?;
            let peak = report::argmax(&scores)
                .ok_or_else(|| PipelineError::Internal("classifier returned no scores".into()))?;

            let heatmap = heatmap::render_heatmap(&frames[peak], scores[peak]);
            let original = encode::rgb_png_base64(&frames[peak])?;
            let heatmap = encode::rgba_png_base64(&heatmap)?;

            Ok(report::build_video_report(
                &display_name,
                &scores,
                &frame_indices,
                fps,
                duration,
                original,
                heatmap,
                started.elapsed().as_secs_f64(),
            ))
        })
        .await
        .map_err(|e| PipelineError::Internal(format!("analysis task failed: {e}")))??;

        tracing::info!(
            file = %report.details.file_name,
            classification = report.classification,
            frames = report.frame_analysis.len(),
            "video analysis complete"
        );
        Ok(report)
    }
}
