//! Threshold scales and analysis report construction.
//!
//! Every verdict in a report comes from one fixed scale table: each
//! analysis dimension declares its warn/fail bounds and tier
//! descriptions in one place, and the builders map measured values
//! onto them. Image and video reports share the scales but differ in
//! shape, so they are separate types serialized without a tag.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Overall verdict for media scoring above the classification threshold.
pub const CLASSIFICATION_FAKE: &str = "Potential Deepfake";
/// Overall verdict for media scoring at or below the threshold.
pub const CLASSIFICATION_AUTHENTIC: &str = "Likely Authentic";
/// Fake-probability above which media is classified as a potential deepfake.
pub const CLASSIFICATION_THRESHOLD: f64 = 0.5;

/// Overall verdict for a fake-probability score.
pub fn classification_for(score: f64) -> &'static str {
    if score > CLASSIFICATION_THRESHOLD {
        CLASSIFICATION_FAKE
    } else {
        CLASSIFICATION_AUTHENTIC
    }
}

// ---------------------------------------------------------------------------
// Section scales
// ---------------------------------------------------------------------------

/// Verdict tier for one analysis dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
    Pass,
    Warning,
    Fail,
}

/// One graded analysis dimension in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Section {
    pub status: SectionStatus,
    pub description: &'static str,
}

/// Threshold scale for one analysis dimension.
///
/// Bounds are exclusive: a value must be strictly above `fail_over` to
/// fail and strictly above `warn_over` to warn.
pub struct SectionScale {
    /// Value above which the section fails, with the fail description.
    /// `None` means the dimension never fails, only warns.
    pub fail_over: Option<(f64, &'static str)>,
    /// Value above which the section warns, with the warn description.
    pub warn_over: (f64, &'static str),
    /// Description when the section passes.
    pub pass: &'static str,
}

impl SectionScale {
    /// Map a measured value onto this scale.
    pub fn grade(&self, value: f64) -> Section {
        if let Some((bound, description)) = self.fail_over {
            if value > bound {
                return Section {
                    status: SectionStatus::Fail,
                    description,
                };
            }
        }
        let (bound, description) = self.warn_over;
        if value > bound {
            Section {
                status: SectionStatus::Warning,
                description,
            }
        } else {
            Section {
                status: SectionStatus::Pass,
                description: self.pass,
            }
        }
    }
}

/// Facial consistency scale for a single still image, graded on the
/// image's own score.
pub const FACIAL_STILL: SectionScale = SectionScale {
    fail_over: None,
    warn_over: (0.4, "Potential facial inconsistencies detected."),
    pass: "No significant facial anomalies detected.",
};

/// Facial motion scale for sampled video, graded on the peak frame score.
pub const FACIAL_MOTION: SectionScale = SectionScale {
    fail_over: Some((0.7, "Unnatural facial movements detected.")),
    warn_over: (0.5, "Some unusual facial patterns detected."),
    pass: "No significant facial anomalies detected.",
};

/// Frequency-domain artifact scale, graded on the mean score.
pub const FREQUENCY: SectionScale = SectionScale {
    fail_over: Some((0.6, "GAN artifacts detected in frequency domain.")),
    warn_over: (0.4, "Some unusual patterns in frequency domain."),
    pass: "No significant frequency domain anomalies.",
};

/// Audio/visual synchronization scale, graded on the share of frames
/// above the classification threshold.
pub const AUDIO_VISUAL_SYNC: SectionScale = SectionScale {
    fail_over: None,
    warn_over: (0.5, "Potential audio-visual sync issues detected."),
    pass: "Audio synchronization appears normal.",
};

/// Lighting consistency scale, graded on the max-min score spread.
pub const LIGHTING_CONSISTENCY: SectionScale = SectionScale {
    fail_over: Some((0.3, "Inconsistent lighting detected across frames.")),
    warn_over: (0.15, "Slight lighting inconsistencies detected."),
    pass: "Lighting appears consistent throughout the video.",
};

// ---------------------------------------------------------------------------
// Score aggregation
// ---------------------------------------------------------------------------

/// Aggregate statistics over per-frame scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreStats {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    /// Share of scores strictly above [`CLASSIFICATION_THRESHOLD`].
    pub above_threshold_ratio: f64,
}

/// Compute aggregate statistics for a score series.
///
/// An empty series yields all-zero stats; callers reject frameless
/// media before building a report.
pub fn score_stats(scores: &[f64]) -> ScoreStats {
    if scores.is_empty() {
        return ScoreStats {
            mean: 0.0,
            max: 0.0,
            min: 0.0,
            above_threshold_ratio: 0.0,
        };
    }

    let mut sum = 0.0;
    let mut max = f64::MIN;
    let mut min = f64::MAX;
    let mut above = 0usize;
    for &score in scores {
        sum += score;
        if score > max {
            max = score;
        }
        if score < min {
            min = score;
        }
        if score > CLASSIFICATION_THRESHOLD {
            above += 1;
        }
    }

    ScoreStats {
        mean: sum / scores.len() as f64,
        max,
        min,
        above_threshold_ratio: above as f64 / scores.len() as f64,
    }
}

/// Index of the highest score, first occurrence on ties.
pub fn argmax(scores: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some(b) if scores[b] >= score => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Timestamp label for a source frame index, e.g. `"1.50s"`.
///
/// An unknown framerate pins every timestamp to `"0.00s"` rather than
/// dividing by zero.
pub fn frame_timestamp(frame_index: u64, fps: f64) -> String {
    if fps > 0.0 {
        format!("{:.2}s", frame_index as f64 / fps)
    } else {
        "0.00s".to_string()
    }
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Analysis report for a single still image.
#[derive(Debug, Serialize)]
pub struct ImageReport {
    /// Fake-probability as a percentage.
    pub confidence: f64,
    pub classification: &'static str,
    /// Base64 PNG of the analyzed image.
    pub original_image: String,
    /// Base64 PNG of the confidence heatmap.
    pub heatmap_image: String,
    pub details: ImageDetails,
    pub analysis_sections: ImageSections,
}

#[derive(Debug, Serialize)]
pub struct ImageDetails {
    pub file_name: String,
    /// Wall-clock analysis time in seconds.
    pub analysis_duration: f64,
    pub ai_confidence: f64,
}

#[derive(Debug, Serialize)]
pub struct ImageSections {
    pub facial_analysis: Section,
    pub frequency_analysis: Section,
}

/// Analysis report for frame-sampled media.
#[derive(Debug, Serialize)]
pub struct VideoReport {
    /// Mean fake-probability as a percentage.
    pub confidence: f64,
    pub classification: &'static str,
    /// Base64 PNG of the highest-scoring frame.
    pub original_frame: String,
    /// Base64 PNG of that frame's confidence heatmap.
    pub heatmap_frame: String,
    pub details: VideoDetails,
    pub analysis_sections: VideoSections,
    /// Per-frame timeline in source order.
    pub frame_analysis: Vec<FrameScore>,
}

#[derive(Debug, Serialize)]
pub struct VideoDetails {
    pub file_name: String,
    /// Wall-clock analysis time in seconds.
    pub analysis_duration: f64,
    /// Footage length, e.g. `"12.0 seconds"`.
    pub media_length: String,
    /// Mean fake-probability, e.g. `"73.4%"`.
    pub ai_confidence: String,
}

#[derive(Debug, Serialize)]
pub struct VideoSections {
    pub facial_analysis: Section,
    pub frequency_analysis: Section,
    pub audio_visual_sync: Section,
    pub lighting_consistency: Section,
}

/// One timeline entry in a video report.
#[derive(Debug, Serialize)]
pub struct FrameScore {
    /// Frame index in the source video.
    pub frame_index: u64,
    /// Timestamp label, e.g. `"1.50s"`.
    pub time: String,
    /// Fake-probability as a percentage.
    pub score: f64,
}

/// Either report variant. Serialized untagged since the two shapes
/// share no envelope.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MediaReport {
    Image(ImageReport),
    Video(VideoReport),
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build the report for a single still image.
pub fn build_image_report(
    file_name: &str,
    score: f64,
    original_image: String,
    heatmap_image: String,
    analysis_duration: f64,
) -> ImageReport {
    ImageReport {
        confidence: score * 100.0,
        classification: classification_for(score),
        original_image,
        heatmap_image,
        details: ImageDetails {
            file_name: file_name.to_string(),
            analysis_duration,
            ai_confidence: score * 100.0,
        },
        analysis_sections: ImageSections {
            facial_analysis: FACIAL_STILL.grade(score),
            frequency_analysis: FREQUENCY.grade(score),
        },
    }
}

/// Build the report for frame-sampled media.
///
/// `scores` and `frame_indices` are index-aligned and non-empty; the
/// overall verdict follows the mean score while each section grades
/// its own aggregate.
#[allow(clippy::too_many_arguments)]
pub fn build_video_report(
    file_name: &str,
    scores: &[f64],
    frame_indices: &[u64],
    fps: f64,
    duration: f64,
    original_frame: String,
    heatmap_frame: String,
    analysis_duration: f64,
) -> VideoReport {
    let stats = score_stats(scores);

    let frame_analysis = frame_indices
        .iter()
        .zip(scores)
        .map(|(&frame_index, &score)| FrameScore {
            frame_index,
            time: frame_timestamp(frame_index, fps),
            score: score * 100.0,
        })
        .collect();

    VideoReport {
        confidence: stats.mean * 100.0,
        classification: classification_for(stats.mean),
        original_frame,
        heatmap_frame,
        details: VideoDetails {
            file_name: file_name.to_string(),
            analysis_duration,
            media_length: format!("{duration:.1} seconds"),
            ai_confidence: format!("{:.1}%", stats.mean * 100.0),
        },
        analysis_sections: VideoSections {
            facial_analysis: FACIAL_MOTION.grade(stats.max),
            frequency_analysis: FREQUENCY.grade(stats.mean),
            audio_visual_sync: AUDIO_VISUAL_SYNC.grade(stats.above_threshold_ratio),
            lighting_consistency: LIGHTING_CONSISTENCY.grade(stats.max - stats.min),
        },
        frame_analysis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_threshold_is_exclusive() {
        assert_eq!(classification_for(0.499), CLASSIFICATION_AUTHENTIC);
        assert_eq!(classification_for(0.5), CLASSIFICATION_AUTHENTIC);
        assert_eq!(classification_for(0.501), CLASSIFICATION_FAKE);
        assert_eq!(classification_for(0.0), CLASSIFICATION_AUTHENTIC);
        assert_eq!(classification_for(1.0), CLASSIFICATION_FAKE);
    }

    #[test]
    fn section_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(SectionStatus::Warning).unwrap(),
            serde_json::json!("warning")
        );
        assert_eq!(
            serde_json::to_value(SectionStatus::Pass).unwrap(),
            serde_json::json!("pass")
        );
        assert_eq!(
            serde_json::to_value(SectionStatus::Fail).unwrap(),
            serde_json::json!("fail")
        );
    }

    #[test]
    fn facial_still_never_fails() {
        assert_eq!(FACIAL_STILL.grade(0.4).status, SectionStatus::Pass);
        assert_eq!(FACIAL_STILL.grade(0.41).status, SectionStatus::Warning);
        assert_eq!(FACIAL_STILL.grade(1.0).status, SectionStatus::Warning);
        assert_eq!(
            FACIAL_STILL.grade(1.0).description,
            "Potential facial inconsistencies detected."
        );
    }

    #[test]
    fn facial_motion_tiers() {
        assert_eq!(
            FACIAL_MOTION.grade(0.5),
            Section {
                status: SectionStatus::Pass,
                description: "No significant facial anomalies detected.",
            }
        );
        assert_eq!(
            FACIAL_MOTION.grade(0.6),
            Section {
                status: SectionStatus::Warning,
                description: "Some unusual facial patterns detected.",
            }
        );
        assert_eq!(
            FACIAL_MOTION.grade(0.71),
            Section {
                status: SectionStatus::Fail,
                description: "Unnatural facial movements detected.",
            }
        );
    }

    #[test]
    fn frequency_tiers() {
        assert_eq!(FREQUENCY.grade(0.4).status, SectionStatus::Pass);
        assert_eq!(
            FREQUENCY.grade(0.5),
            Section {
                status: SectionStatus::Warning,
                description: "Some unusual patterns in frequency domain.",
            }
        );
        assert_eq!(
            FREQUENCY.grade(0.61),
            Section {
                status: SectionStatus::Fail,
                description: "GAN artifacts detected in frequency domain.",
            }
        );
        assert_eq!(
            FREQUENCY.grade(0.2).description,
            "No significant frequency domain anomalies."
        );
    }

    #[test]
    fn sync_and_lighting_tiers() {
        assert_eq!(AUDIO_VISUAL_SYNC.grade(0.5).status, SectionStatus::Pass);
        assert_eq!(
            AUDIO_VISUAL_SYNC.grade(0.51),
            Section {
                status: SectionStatus::Warning,
                description: "Potential audio-visual sync issues detected.",
            }
        );

        assert_eq!(LIGHTING_CONSISTENCY.grade(0.15).status, SectionStatus::Pass);
        assert_eq!(
            LIGHTING_CONSISTENCY.grade(0.2).status,
            SectionStatus::Warning
        );
        assert_eq!(
            LIGHTING_CONSISTENCY.grade(0.31),
            Section {
                status: SectionStatus::Fail,
                description: "Inconsistent lighting detected across frames.",
            }
        );
    }

    #[test]
    fn stats_aggregate_mean_extremes_and_ratio() {
        let stats = score_stats(&[0.2, 0.6, 0.9, 0.3]);
        assert!((stats.mean - 0.5).abs() < 1e-12);
        assert!((stats.max - 0.9).abs() < 1e-12);
        assert!((stats.min - 0.2).abs() < 1e-12);
        // 0.6 and 0.9 sit strictly above the threshold.
        assert!((stats.above_threshold_ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn stats_on_empty_series_are_zero() {
        let stats = score_stats(&[]);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.above_threshold_ratio, 0.0);
    }

    #[test]
    fn argmax_takes_the_first_of_tied_maxima() {
        assert_eq!(argmax(&[0.1, 0.8, 0.8, 0.3]), Some(1));
        assert_eq!(argmax(&[0.5]), Some(0));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn timestamps_format_with_two_decimals() {
        assert_eq!(frame_timestamp(45, 30.0), "1.50s");
        assert_eq!(frame_timestamp(0, 30.0), "0.00s");
        assert_eq!(frame_timestamp(29, 29.0), "1.00s");
    }

    #[test]
    fn zero_fps_pins_timestamps_to_zero() {
        assert_eq!(frame_timestamp(120, 0.0), "0.00s");
    }

    #[test]
    fn image_report_shape() {
        let report = build_image_report("face.png", 0.8, "orig".into(), "heat".into(), 0.5);
        assert!((report.confidence - 80.0).abs() < 1e-9);
        assert_eq!(report.classification, CLASSIFICATION_FAKE);
        assert_eq!(report.details.file_name, "face.png");
        assert!((report.details.ai_confidence - 80.0).abs() < 1e-9);
        assert_eq!(
            report.analysis_sections.facial_analysis.status,
            SectionStatus::Warning
        );
        assert_eq!(
            report.analysis_sections.frequency_analysis.status,
            SectionStatus::Fail
        );

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["original_image"], "orig");
        assert_eq!(value["heatmap_image"], "heat");
        assert_eq!(
            value["analysis_sections"]["frequency_analysis"]["status"],
            "fail"
        );
    }

    #[test]
    fn video_report_aggregates_and_timeline() {
        let scores = [0.2, 0.9, 0.1];
        let indices = [0, 30, 60];
        let report = build_video_report(
            "clip.mp4",
            &scores,
            &indices,
            30.0,
            2.0,
            "orig".into(),
            "heat".into(),
            1.2,
        );

        assert!((report.confidence - 40.0).abs() < 1e-9);
        assert_eq!(report.classification, CLASSIFICATION_AUTHENTIC);
        assert_eq!(report.details.media_length, "2.0 seconds");
        assert_eq!(report.details.ai_confidence, "40.0%");

        // Peak 0.9 fails facial motion; spread 0.7 fails lighting.
        assert_eq!(
            report.analysis_sections.facial_analysis.status,
            SectionStatus::Fail
        );
        assert_eq!(
            report.analysis_sections.lighting_consistency.status,
            SectionStatus::Fail
        );
        // One of three frames above threshold: sync passes.
        assert_eq!(
            report.analysis_sections.audio_visual_sync.status,
            SectionStatus::Pass
        );

        assert_eq!(report.frame_analysis.len(), 3);
        assert_eq!(report.frame_analysis[1].frame_index, 30);
        assert_eq!(report.frame_analysis[1].time, "1.00s");
        assert!((report.frame_analysis[1].score - 90.0).abs() < 1e-9);
    }

    #[test]
    fn media_report_serializes_without_a_tag() {
        let report = MediaReport::Image(build_image_report(
            "a.png",
            0.1,
            "o".into(),
            "h".into(),
            0.2,
        ));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["classification"], CLASSIFICATION_AUTHENTIC);
        assert!(value.get("Image").is_none());
    }
}
