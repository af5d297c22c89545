//! Interval-based video frame sampling.
//!
//! A video is reduced to roughly `target_rate` frames per second of
//! footage: the source framerate is probed, an integer keep-interval is
//! derived from it, and one ffmpeg pass decodes every Nth frame into a
//! scratch directory that is removed once the frames are in memory.

use std::path::{Path, PathBuf};

use image::RgbImage;
use uuid::Uuid;

use crate::ffmpeg::{self, FfmpegError};

/// Error type for the sampling stage.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("invalid target sample rate: {0}")]
    InvalidRate(f64),

    #[error(transparent)]
    Ffmpeg(#[from] FfmpegError),

    #[error("failed to decode extracted frame {path}: {source}")]
    FrameDecode {
        path: String,
        source: image::ImageError,
    },

    #[error("frame decode task failed: {0}")]
    DecodeTask(String),
}

/// Frames sampled from a video, with the metadata the report needs.
#[derive(Debug)]
pub struct SampledVideo {
    /// Decoded frames in source order.
    pub frames: Vec<RgbImage>,
    /// Source frame index of each entry in `frames`.
    pub frame_indices: Vec<u64>,
    /// Source framerate, truncated to a whole number of frames per second.
    pub fps: f64,
    /// Total footage length in seconds (frame count over framerate, or 0
    /// when the framerate is unknown).
    pub duration: f64,
}

// ---------------------------------------------------------------------------
// Interval arithmetic
// ---------------------------------------------------------------------------

/// Compute the frame keep-interval for a source framerate and a target
/// sampling rate in frames per second.
///
/// The framerate is truncated to a whole number before the division,
/// and the quotient is truncated as well, so a 29.97fps source sampled
/// at 1fps keeps every 29th frame. The interval is never below 1:
/// sources slower than the target rate keep every frame.
pub fn sample_interval(fps: f64, target_rate: f64) -> u64 {
    let interval = (fps.trunc() / target_rate) as i64;
    interval.max(1) as u64
}

/// Number of frames retained when `total_frames` are walked with the
/// given keep-interval: every index divisible by the interval survives.
pub fn retained_count(total_frames: u64, interval: u64) -> u64 {
    total_frames.div_ceil(interval.max(1))
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// Sample a video at roughly `target_rate` frames per second.
///
/// Probes the source, extracts every Nth frame in a single ffmpeg pass,
/// and decodes the results off the async runtime. An empty `frames`
/// vector means the source had no decodable video frames; the caller
/// decides how to surface that.
pub async fn sample_video(path: &Path, target_rate: f64) -> Result<SampledVideo, SampleError> {
    if !(target_rate > 0.0) {
        return Err(SampleError::InvalidRate(target_rate));
    }

    let probe = ffmpeg::probe_video(path).await?;
    let fps = ffmpeg::parse_framerate(&probe).trunc();
    let total_frames = ffmpeg::parse_total_frames(&probe);
    let duration = if fps > 0.0 {
        total_frames as f64 / fps
    } else {
        0.0
    };

    let interval = sample_interval(fps, target_rate);
    tracing::debug!(
        fps,
        total_frames,
        interval,
        expected = retained_count(total_frames, interval),
        "sampling video frames"
    );

    let scratch = ScratchDir::new();
    let frame_paths = ffmpeg::extract_sampled_frames(path, interval, scratch.path()).await?;

    let frames = tokio::task::spawn_blocking(move || {
        let _scratch = scratch;
        decode_frames(&frame_paths)
    })
    .await
    .map_err(|e| SampleError::DecodeTask(e.to_string()))??;

    tracing::debug!(extracted = frames.len(), "decoded sampled frames");

    let frame_indices = (0..frames.len()).map(|k| k as u64 * interval).collect();

    Ok(SampledVideo {
        frames,
        frame_indices,
        fps,
        duration,
    })
}

fn decode_frames(paths: &[PathBuf]) -> Result<Vec<RgbImage>, SampleError> {
    let mut frames = Vec::with_capacity(paths.len());
    for path in paths {
        let image = image::open(path)
            .map_err(|source| SampleError::FrameDecode {
                path: path.display().to_string(),
                source,
            })?
            .to_rgb8();
        frames.push(image);
    }
    Ok(frames)
}

/// Uniquely named scratch directory under the system temp dir, removed
/// on drop.
struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    fn new() -> Self {
        let path = std::env::temp_dir().join(format!("veriframe-frames-{}", Uuid::new_v4()));
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(error) = std::fs::remove_dir_all(&self.path) {
            if error.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    %error,
                    "failed to remove frame scratch directory"
                );
            }
        }
    }
}
