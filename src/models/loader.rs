//! ONNX model loader

use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// Loaded ONNX classifier with the tensor names needed to run it
pub struct LoadedModel {
    /// ONNX Runtime session
    pub session: Session,
    /// Name of the feature input
    pub input_name: String,
    /// Name of the predicted label output
    pub label_output: String,
}

/// Loader for ONNX models
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load the classifier from file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadedModel> {
        let path = path.as_ref();

        if !path.exists() {
            anyhow::bail!("Model file not found: {}", path.display());
        }

        info!(path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let label_output = select_label_output(&output_names)
            .with_context(|| format!("Model {} declares no outputs", path.display()))?;

        info!(
            input = %input_name,
            output = %label_output,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            session,
            input_name,
            label_output,
        })
    }
}

/// Pick the output holding the predicted class. Classifier exports name it
/// `output_label` or `label`; otherwise the first output is used.
fn select_label_output(names: &[String]) -> Option<String> {
    names
        .iter()
        .find(|name| name.contains("label"))
        .or_else(|| names.first())
        .cloned()
}
