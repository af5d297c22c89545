//! ViT deepfake classifier backed by candle.
//!
//! Wraps the `dima806/deepfake_vs_real_image_detection` checkpoint: a
//! two-class ViT fine-tune whose second logit carries the fake
//! probability. Weights load either from the Hugging Face hub (cached
//! locally by `hf-hub`) or from a local directory.

use std::path::Path;
use std::sync::Mutex;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::vit;
use hf_hub::{api::sync::Api, Repo, RepoType};
use image::RgbImage;

use crate::{Classifier, ClassifierError};

/// Default Hugging Face model repository.
pub const DEFAULT_MODEL_REPO: &str = "dima806/deepfake_vs_real_image_detection";

/// Model input edge length in pixels.
const IMAGE_SIZE: usize = 224;
/// Output classes: real (0) and fake (1).
const NUM_CLASSES: usize = 2;
/// Class index carrying the fake probability.
const FAKE_CLASS_INDEX: usize = 1;
/// Frames per forward pass. Keeps peak tensor memory bounded when a
/// long video is scored in one call.
const BATCH_SIZE: usize = 8;

/// The model was trained with mean 0.5, std 0.5 on all channels.
const NORM_MEAN: f32 = 0.5;
const NORM_STD: f32 = 0.5;

pub struct VitClassifier {
    model: Mutex<vit::Model>,
    device: Device,
}

impl VitClassifier {
    /// Load the classifier from a Hugging Face model repository.
    pub fn from_hub(repo_id: &str) -> Result<Self, ClassifierError> {
        let api = Api::new().map_err(|e| ClassifierError::Fetch(e.to_string()))?;
        let repo = api.repo(Repo::new(repo_id.to_string(), RepoType::Model));

        let weights_path = repo
            .get("model.safetensors")
            .map_err(|e| ClassifierError::Fetch(e.to_string()))?;
        let config_path = repo
            .get("config.json")
            .map_err(|e| ClassifierError::Fetch(e.to_string()))?;

        Self::from_files(&config_path, &weights_path)
    }

    /// Load the classifier from local `config.json` and
    /// `model.safetensors` files.
    pub fn from_files(config_path: &Path, weights_path: &Path) -> Result<Self, ClassifierError> {
        let device = Device::Cpu;

        let raw = std::fs::read_to_string(config_path)
            .map_err(|e| ClassifierError::Load(e.to_string()))?;
        let config: vit::Config =
            serde_json::from_str(&raw).map_err(|e| ClassifierError::Load(e.to_string()))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(|e| ClassifierError::Load(e.to_string()))?
        };
        let model = vit::Model::new(&config, NUM_CLASSES, vb)
            .map_err(|e| ClassifierError::Load(e.to_string()))?;

        tracing::info!(classes = NUM_CLASSES, "ViT classifier loaded");

        Ok(Self {
            model: Mutex::new(model),
            device,
        })
    }

    /// Resize, normalize, and pack a batch of frames into a CHW tensor.
    fn preprocess_batch(&self, images: &[RgbImage]) -> Result<Tensor, ClassifierError> {
        let batch_size = images.len();
        let mut data = vec![0f32; batch_size * 3 * IMAGE_SIZE * IMAGE_SIZE];

        for (batch_idx, image) in images.iter().enumerate() {
            let resized = image::imageops::resize(
                image,
                IMAGE_SIZE as u32,
                IMAGE_SIZE as u32,
                image::imageops::FilterType::Triangle,
            );

            let offset = batch_idx * 3 * IMAGE_SIZE * IMAGE_SIZE;
            for (i, pixel) in resized.pixels().enumerate() {
                let r = pixel[0] as f32 / 255.0;
                let g = pixel[1] as f32 / 255.0;
                let b = pixel[2] as f32 / 255.0;

                data[offset + i] = (r - NORM_MEAN) / NORM_STD;
                data[offset + IMAGE_SIZE * IMAGE_SIZE + i] = (g - NORM_MEAN) / NORM_STD;
                data[offset + 2 * IMAGE_SIZE * IMAGE_SIZE + i] = (b - NORM_MEAN) / NORM_STD;
            }
        }

        Tensor::from_vec(data, (batch_size, 3, IMAGE_SIZE, IMAGE_SIZE), &self.device)
            .map_err(|e| ClassifierError::Inference(e.to_string()))
    }
}

impl Classifier for VitClassifier {
    fn classify(&self, images: &[RgbImage]) -> Result<Vec<f64>, ClassifierError> {
        if images.is_empty() {
            return Ok(Vec::new());
        }

        let mut scores = Vec::with_capacity(images.len());

        for chunk in images.chunks(BATCH_SIZE) {
            let input = self.preprocess_batch(chunk)?;

            let model = self
                .model
                .lock()
                .map_err(|e| ClassifierError::Inference(format!("model lock poisoned: {e}")))?;
            let logits = model
                .forward(&input)
                .map_err(|e| ClassifierError::Inference(e.to_string()))?;
            drop(model);

            // Shape is (chunk_len, NUM_CLASSES).
            let probs = candle_nn::ops::softmax(&logits, 1)
                .map_err(|e| ClassifierError::Inference(e.to_string()))?;
            let probs_vec: Vec<f32> = probs
                .flatten_all()
                .and_then(|t| t.to_vec1())
                .map_err(|e| ClassifierError::Inference(e.to_string()))?;

            for batch_idx in 0..chunk.len() {
                let fake = probs_vec
                    .get(batch_idx * NUM_CLASSES + FAKE_CLASS_INDEX)
                    .copied()
                    .unwrap_or(0.0);
                scores.push(f64::from(fake));
            }
        }

        tracing::debug!(frames = images.len(), "classified frame batch");
        Ok(scores)
    }
}
