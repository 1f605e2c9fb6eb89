//! Request errors and their HTTP responses

use crate::form::FormError;
use crate::types::request::{ValidationError, REJECTION_MESSAGE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use handlebars::RenderError;
use thiserror::Error;
use tracing::error;

/// Failure while handling a page request
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("prediction failed: {0:#}")]
    Inference(anyhow::Error),

    #[error("failed to render page: {0}")]
    Render(#[from] RenderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Form(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            // The form page answers out-of-range input with a message, not an error status
            AppError::Validation(_) => (StatusCode::OK, REJECTION_MESSAGE).into_response(),
            AppError::Inference(e) => {
                error!(error = %format!("{:#}", e), "Prediction failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Prediction failed").into_response()
            }
            AppError::Render(e) => {
                error!(error = %e, "Template rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let form = AppError::from(FormError::MissingField("ph")).into_response();
        assert_eq!(form.status(), StatusCode::BAD_REQUEST);

        let rejected = AppError::from(ValidationError::PhOutOfRange(15.0)).into_response();
        assert_eq!(rejected.status(), StatusCode::OK);

        let failed = AppError::Inference(anyhow::anyhow!("session crashed")).into_response();
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_form_error_message() {
        let err = AppError::from(FormError::InvalidNumber {
            field: "Nitrogen",
            value: "lots".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "form field 'Nitrogen' is not a number: 'lots'"
        );
    }
}
