use crate::params::schema::ParameterSchema;
use crate::server::api::{
    ApiError, ChatResponse, CommandRequest, CommandResponse, HealthResponse, ParametersResponse,
    SetParameterRequest,
};
use crate::server::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, warn};

pub async fn command(
    State(state): State<AppState>,
    body: Result<Json<CommandRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let command = request.command.unwrap_or_default();

    info!(command = %command, "Command received");
    let result = state.session.submit_detached(&command).await?;

    if !result.success {
        warn!(kind = ?result.error_kind, stage = ?result.failed_stage, "Command failed");
        return Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            result.feedback,
        ));
    }

    Ok(Json(CommandResponse {
        success: true,
        parameters: result.parameters,
        message: result.feedback,
    }))
}

pub async fn parameters(State(state): State<AppState>) -> Json<ParametersResponse> {
    Json(ParametersResponse {
        success: true,
        parameters: state.session.parameters(),
    })
}

pub async fn set_parameter(
    State(state): State<AppState>,
    body: Result<Json<SetParameterRequest>, JsonRejection>,
) -> Result<Json<ParametersResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    state
        .session
        .set_parameter(request.category, &request.name, request.value)?;

    Ok(Json(ParametersResponse {
        success: true,
        parameters: state.session.parameters(),
    }))
}

pub async fn reset(State(state): State<AppState>) -> Json<ParametersResponse> {
    state.session.reset();
    Json(ParametersResponse {
        success: true,
        parameters: state.session.parameters(),
    })
}

pub async fn chat(State(state): State<AppState>) -> Json<ChatResponse> {
    Json(ChatResponse {
        messages: state.session.chat(),
    })
}

pub async fn schema(State(state): State<AppState>) -> Json<ParameterSchema> {
    Json(state.session.schema().clone())
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        natural_language: state.session.natural_language_enabled(),
        processing: state.session.is_processing(),
    })
}
