//! Crop Recommendation Service Library
//!
//! Accepts soil and climate measurements through an HTML form, runs them
//! through a pre-trained ONNX classifier and renders the recommended crop.

pub mod config;
pub mod form;
pub mod metrics;
pub mod models;
pub mod presenter;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use models::inference::{CropClassifier, InferenceEngine};
pub use presenter::Presenter;
pub use server::{build_router, AppState};
pub use types::{prediction::Prediction, request::PredictionRequest};
