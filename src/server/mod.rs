//! HTTP API surface for Harbinger.
//!
//! A small axum router over shared state: extraction and the OpenAPI-style
//! view take raw HAR text, generation and capture take JSON requests and
//! delegate to their collaborators.

pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::capture::CaptureClient;
use crate::config::HarbingerConfig;

/// Shared state for all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<HarbingerConfig>,
    /// Present only when a `[capture]` backend is configured.
    pub capture: Option<Arc<CaptureClient>>,
}

impl AppState {
    /// Build state from validated config.
    pub fn from_config(config: HarbingerConfig) -> crate::Result<Self> {
        let capture = match &config.capture {
            Some(capture_config) => Some(Arc::new(CaptureClient::new(capture_config)?)),
            None => None,
        };
        Ok(Self {
            config: Arc::new(config),
            capture,
        })
    }
}

/// Build the Harbinger API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/har/endpoints", post(routes::har_endpoints))
        .route("/har/openapi", post(routes::har_openapi))
        .route("/mcp/from-har", post(routes::mcp_from_har))
        .route("/capture", post(routes::capture))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CaptureConfig;

    #[test]
    fn test_state_without_capture_backend() {
        let state = AppState::from_config(HarbingerConfig::default()).unwrap();
        assert!(state.capture.is_none());
    }

    #[tokio::test]
    async fn test_state_with_capture_backend() {
        let config = HarbingerConfig {
            capture: Some(CaptureConfig {
                url: "http://127.0.0.1:8000".to_string(),
                timeout_secs: 120,
            }),
            ..Default::default()
        };
        let state = AppState::from_config(config).unwrap();
        assert!(state.capture.is_some());
    }

    #[test]
    fn test_router_builds() {
        let state = AppState::from_config(HarbingerConfig::default()).unwrap();
        let _app = router(state);
    }
}
