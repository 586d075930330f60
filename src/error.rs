//! HTTP-facing error type

use crate::checkout::{flow::CheckoutError, validation::ValidationError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unknown product: {0}")]
    ProductNotFound(String),

    #[error("Your cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart => AppError::EmptyCart,
            CheckoutError::Invalid(e) => AppError::Validation(e),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmptyCart => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation(e) => json!({ "error": e.message(), "field": e.field() }),
            other => json!({ "error": other.to_string() }),
        };
        if status.is_client_error() {
            tracing::debug!(%status, error = %self, "request rejected");
        }
        (status, Json(body)).into_response()
    }
}
