use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::catalog::{LANGUAGES, MODELS};

/// Failures of the translation service operations.
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Invalid model name. Available models are: {}", MODELS.join(", "))]
    InvalidModel(String),

    #[error("Invalid language. Available languages are: {}", LANGUAGES.join(", "))]
    InvalidLanguage(String),

    #[error("Error updating model: {0}")]
    ModelInit(String),

    #[error("Error updating language: {0}")]
    Upstream(String),

    #[error("Error invoking chain: {0}")]
    Invocation(String),
}

impl TranslateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TranslateError::InvalidModel(_) | TranslateError::InvalidLanguage(_) => {
                StatusCode::BAD_REQUEST
            }
            TranslateError::ModelInit(_)
            | TranslateError::Upstream(_)
            | TranslateError::Invocation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.status_code() == StatusCode::BAD_REQUEST
    }
}

impl IntoResponse for TranslateError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
