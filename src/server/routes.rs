//! HTTP handlers

use crate::form::parse_form;
use crate::metrics::MetricsSnapshot;
use crate::server::error::AppError;
use crate::server::AppState;
use crate::types::prediction::Prediction;
use crate::types::request::{PredictionRequest, REJECTION_MESSAGE};
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Envelope for JSON API responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.to_string()),
        }
    }
}

/// `GET /`
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.presenter.render_home()?))
}

/// `GET /Predict`
pub async fn prediction_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.presenter.render_form()?))
}

/// `POST /form`
pub async fn submit_form(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Html<String>, AppError> {
    debug!(form = ?fields, "Received prediction form");

    let request = match parse_form(&fields) {
        Ok(request) => request,
        Err(e) => {
            state.metrics.record_invalid_form();
            info!(error = %e, "Malformed prediction form");
            return Err(e.into());
        }
    };

    if let Err(e) = request.validate() {
        state.metrics.record_rejection();
        info!(reason = %e, "Rejected prediction request");
        return Err(e.into());
    }

    let prediction = run_prediction(&state, request).await?;
    Ok(Html(state.presenter.render_prediction(&prediction.crop)?))
}

/// `POST /api/predict`
pub async fn api_predict(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> Response {
    if let Err(e) = request.validate() {
        state.metrics.record_rejection();
        info!(reason = %e, "Rejected prediction request");
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::<Prediction>::error(REJECTION_MESSAGE)),
        )
            .into_response();
    }

    match run_prediction(&state, request).await {
        Ok(prediction) => Json(ApiResponse::success(prediction)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Prediction failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Prediction>::error("Prediction failed")),
            )
                .into_response()
        }
    }
}

/// `GET /api/health`
pub async fn health_check() -> Json<ApiResponse<String>> {
    Json(ApiResponse::success("OK".to_string()))
}

/// `GET /api/stats`
pub async fn stats(State(state): State<AppState>) -> Json<ApiResponse<MetricsSnapshot>> {
    Json(ApiResponse::success(state.metrics.snapshot()))
}

/// Run the classifier off the async executor and record the outcome
async fn run_prediction(
    state: &AppState,
    request: PredictionRequest,
) -> Result<Prediction, AppError> {
    let engine = state.engine.clone();
    let result = tokio::task::spawn_blocking(move || engine.predict(&request))
        .await
        .map_err(|e| AppError::Inference(anyhow::anyhow!("Inference task failed: {}", e)))?;

    match result {
        Ok(prediction) => {
            state.metrics.record_prediction(
                &prediction.crop,
                Duration::from_secs_f64(prediction.latency_ms / 1000.0),
            );
            info!(
                prediction_id = %prediction.prediction_id,
                crop = %prediction.crop,
                latency_ms = prediction.latency_ms,
                "Prediction served"
            );
            Ok(prediction)
        }
        Err(e) => {
            state.metrics.record_inference_failure();
            Err(AppError::Inference(e))
        }
    }
}
