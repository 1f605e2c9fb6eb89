//! Crop classifier inference

use crate::config::ModelConfig;
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::types::prediction::Prediction;
use crate::types::request::{PredictionRequest, FEATURE_COUNT};
use anyhow::{Context, Result};
use ort::value::Tensor;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info};

/// Anything that maps a feature vector to a crop name
pub trait CropClassifier: Send + Sync {
    /// Short description of the classifier for logs
    fn name(&self) -> &str;

    /// Predict the crop label for one feature vector
    fn classify(&self, features: &[f32; FEATURE_COUNT]) -> Result<String>;
}

/// Classifier backed by an ONNX Runtime session
pub struct OnnxCropClassifier {
    /// Session needs exclusive access to run
    model: Mutex<LoadedModel>,
    /// Class names for models that emit integer class ids
    labels: Vec<String>,
}

impl OnnxCropClassifier {
    /// Load the classifier described by the model configuration
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let model = ModelLoader::with_threads(config.onnx_threads).load(&config.path)?;
        Ok(Self {
            model: Mutex::new(model),
            labels: config.labels.clone(),
        })
    }
}

impl CropClassifier for OnnxCropClassifier {
    fn name(&self) -> &str {
        "onnx"
    }

    fn classify(&self, features: &[f32; FEATURE_COUNT]) -> Result<String> {
        let shape = vec![1_i64, FEATURE_COUNT as i64];
        let input_tensor =
            Tensor::from_array((shape, features.to_vec())).context("Failed to create input tensor")?;

        let mut guard = self
            .model
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        let model = &mut *guard;

        let outputs = model
            .session
            .run(ort::inputs![model.input_name.as_str() => input_tensor])?;

        let output = outputs
            .get(model.label_output.as_str())
            .with_context(|| format!("Model output '{}' missing", model.label_output))?;

        // String labels when trained on crop names, class ids when label-encoded
        if let Ok((_, labels)) = output.try_extract_strings() {
            return labels
                .into_iter()
                .next()
                .context("Model returned no label");
        }

        let (_, ids) = output
            .try_extract_tensor::<i64>()
            .context("Model label output is neither string nor int64")?;
        let id = ids.first().copied().context("Model returned no label")?;
        label_for_class(&self.labels, id)
    }
}

/// Map a class id onto the configured label list
pub fn label_for_class(labels: &[String], id: i64) -> Result<String> {
    usize::try_from(id)
        .ok()
        .and_then(|index| labels.get(index))
        .cloned()
        .with_context(|| format!("No label configured for class id {}", id))
}

/// Runs requests through a classifier and times them
#[derive(Clone)]
pub struct InferenceEngine {
    classifier: Arc<dyn CropClassifier>,
}

impl InferenceEngine {
    /// Create an inference engine from model configuration
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let classifier = OnnxCropClassifier::load(config)?;
        info!(path = %config.path, labels = config.labels.len(), "Inference engine initialized");
        Ok(Self::with_classifier(Arc::new(classifier)))
    }

    /// Create an inference engine around an existing classifier
    pub fn with_classifier(classifier: Arc<dyn CropClassifier>) -> Self {
        Self { classifier }
    }

    /// Name of the underlying classifier
    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Predict the crop for a validated request. Blocks on the classifier.
    pub fn predict(&self, request: &PredictionRequest) -> Result<Prediction> {
        let start = Instant::now();
        let crop = self.classifier.classify(&request.to_features())?;
        let latency = start.elapsed();

        let crop = crop.trim().to_string();
        if crop.is_empty() {
            anyhow::bail!("Classifier returned an empty label");
        }

        let prediction = Prediction::new(crop, latency);
        debug!(
            prediction_id = %prediction.prediction_id,
            crop = %prediction.crop,
            latency_us = latency.as_micros(),
            "Inference complete"
        );

        Ok(prediction)
    }
}
