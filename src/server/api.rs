//! Request and response bodies for the HTTP surface

use crate::core::error::VrmError;
use crate::core::types::{Category, Parameter};
use crate::params::store::ParameterSet;
use crate::session::ChatMessage;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub success: bool,
    pub parameters: Vec<Parameter>,
    pub message: String,
}

/// Manual edit of a single parameter
#[derive(Debug, Deserialize)]
pub struct SetParameterRequest {
    pub category: Category,
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct ParametersResponse {
    pub success: bool,
    pub parameters: ParameterSet,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub natural_language: bool,
    pub processing: bool,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

/// Failure reply: `{ success: false, error }` with a matching status
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<VrmError> for ApiError {
    fn from(err: VrmError) -> Self {
        let status = match &err {
            VrmError::EmptyCommand => StatusCode::BAD_REQUEST,
            VrmError::OutOfRange { .. } => StatusCode::BAD_REQUEST,
            VrmError::UnknownParameter { .. } => StatusCode::NOT_FOUND,
            VrmError::NaturalLanguageDisabled => StatusCode::SERVICE_UNAVAILABLE,
            VrmError::Busy => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match err {
            VrmError::EmptyCommand => "Command is required".to_string(),
            other => other.to_string(),
        };
        Self::new(status, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
