//! Classifier output for a single request

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Crop predicted for one set of measurements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Identifier used to correlate log lines for this prediction
    pub prediction_id: String,

    /// Predicted crop name
    pub crop: String,

    /// Time spent in the classifier, in milliseconds
    pub latency_ms: f64,

    /// When the prediction was made
    pub timestamp: DateTime<Utc>,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(crop: String, latency: Duration) -> Self {
        Self {
            prediction_id: uuid::Uuid::new_v4().to_string(),
            crop,
            latency_ms: latency.as_secs_f64() * 1000.0,
            timestamp: Utc::now(),
        }
    }
}
