//! Pass-through client for the remote browser-capture backend.
//!
//! Harbinger does not automate a browser itself. Recording requests are
//! forwarded to an external capture service and its response body is
//! relayed verbatim — success/failure branching only, no interpretation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::CaptureConfig;
use crate::error::HarbingerError;

/// A recording request forwarded to the capture backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureRequest {
    /// Page to open.
    pub url: String,
    /// Natural-language instruction for what to do on the page.
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub har_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies_path: Option<String>,
}

/// The capture backend's response, relayed as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureOutcome {
    pub success: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub action_taken: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub har_path: Option<String>,
    #[serde(default)]
    pub cookies_path: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// HTTP client for the capture backend.
pub struct CaptureClient {
    http: reqwest::Client,
    base_url: String,
}

impl CaptureClient {
    /// Build a client from config. The request timeout covers the whole
    /// recording run on the backend side.
    pub fn new(config: &CaptureConfig) -> crate::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HarbingerError::CaptureFailed(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    /// Forward a recording request and relay the backend's outcome.
    ///
    /// Transport errors, non-2xx statuses, and undecodable bodies all
    /// surface as `CaptureFailed` with the backend's message — Harbinger
    /// imposes no contract of its own on the failure text.
    pub async fn record(&self, request: &CaptureRequest) -> crate::Result<CaptureOutcome> {
        let endpoint = format!("{}/browser/execute-with-recording", self.base_url);

        tracing::info!(
            url = %request.url,
            instruction = %request.instruction,
            har_path = ?request.har_path,
            "forwarding capture request"
        );

        let response = self
            .http
            .post(&endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| HarbingerError::CaptureFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HarbingerError::CaptureFailed(format!(
                "backend returned {status}: {body}"
            )));
        }

        response
            .json::<CaptureOutcome>()
            .await
            .map_err(|e| HarbingerError::CaptureFailed(e.to_string()))
    }
}
