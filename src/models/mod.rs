//! ML model loading and inference

pub mod inference;
pub mod loader;

pub use inference::{CropClassifier, InferenceEngine, OnnxCropClassifier};
pub use loader::ModelLoader;
