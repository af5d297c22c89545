//! Veriframe core domain logic.
//!
//! This crate provides the building blocks shared by the analysis
//! pipeline and the API server:
//!
//! - [`media`] -- upload extension policy and media kind dispatch.
//! - [`ffmpeg`] -- ffprobe/ffmpeg subprocess integration.
//! - [`sampler`] -- interval-based video frame sampling.
//! - [`heatmap`] -- confidence overlay rendering.
//! - [`encode`] -- base64 PNG encoding for inline report images.
//! - [`report`] -- threshold scales and analysis report construction.

pub mod encode;
pub mod ffmpeg;
pub mod heatmap;
pub mod media;
pub mod report;
pub mod sampler;
