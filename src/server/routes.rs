//! axum handlers for the Harbinger API.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use crate::agent::{AgentRunner, GenerationOutcome, GenerationRequest};
use crate::capture::{CaptureOutcome, CaptureRequest};
use crate::error::HarbingerError;
use crate::har::extract::{Extraction, extract_endpoints_from_json};
use crate::har::openapi::synthesize_openapi;
use crate::server::AppState;

/// JSON error body returned by all failing handlers.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Handler error: a status code plus the collaborator's message, verbatim.
#[derive(Debug)]
pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(ErrorBody { error: self.1 })).into_response()
    }
}

impl From<HarbingerError> for ApiError {
    fn from(err: HarbingerError) -> Self {
        let status = match &err {
            HarbingerError::MalformedHar(_) | HarbingerError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            HarbingerError::HarFileNotFound(_) => StatusCode::NOT_FOUND,
            HarbingerError::GenerationTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Extract classified endpoints from raw HAR text.
pub async fn har_endpoints(body: String) -> Result<Json<Extraction>, ApiError> {
    let extraction = extract_endpoints_from_json(&body)?;
    tracing::info!(
        endpoints = extraction.endpoints.len(),
        skipped = extraction.skipped,
        "extracted endpoints"
    );
    Ok(Json(extraction))
}

/// Extract endpoints and render them as an OpenAPI-style document.
pub async fn har_openapi(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<Value>, ApiError> {
    let extraction = extract_endpoints_from_json(&body)?;
    let doc = synthesize_openapi(&extraction.endpoints, &state.config.generate.server_name);
    Ok(Json(doc))
}

/// Trigger MCP server generation via the configured coding agent.
pub async fn mcp_from_har(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<GenerationOutcome>, ApiError> {
    tracing::info!(har_paths = ?request.har_paths, "starting MCP generation from HAR");
    let runner = AgentRunner::new(&state.config.agent, &state.config.generate);
    let outcome = runner.generate(request).await?;
    Ok(Json(outcome))
}

/// Forward a recording request to the capture backend.
pub async fn capture(
    State(state): State<AppState>,
    Json(request): Json<CaptureRequest>,
) -> Result<Json<CaptureOutcome>, ApiError> {
    let Some(client) = &state.capture else {
        return Err(ApiError(
            StatusCode::SERVICE_UNAVAILABLE,
            "no capture backend configured".to_string(),
        ));
    };
    let outcome = client.record(&request).await?;
    Ok(Json(outcome))
}
