//! HAR 1.2 document model and parsing.
//!
//! Deserializes the subset of the HTTP Archive log schema that Harbinger
//! consumes. Unknown fields are ignored so captures from any browser load;
//! a document without `log.entries` is rejected as malformed, with no
//! partial results.

pub mod extract;
pub mod openapi;

use serde::Deserialize;

use crate::error::HarbingerError;

/// Top-level HAR container.
#[derive(Debug, Clone, Deserialize)]
pub struct Har {
    pub log: HarLog,
}

/// The `log` object — only `entries` matters to Harbinger.
#[derive(Debug, Clone, Deserialize)]
pub struct HarLog {
    pub entries: Vec<HarEntry>,
}

/// One captured request/response pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarEntry {
    pub request: HarRequest,
    pub response: HarResponse,
    #[serde(default)]
    pub started_date_time: Option<String>,
    /// Total entry time in milliseconds, as recorded by the capture.
    #[serde(default)]
    pub time: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarRequest {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: Vec<HarHeader>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarResponse {
    pub status: u16,
    #[serde(default)]
    pub headers: Vec<HarHeader>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarHeader {
    pub name: String,
    pub value: String,
}

impl Har {
    /// Parse a HAR document from JSON text.
    ///
    /// Fails with `MalformedHar` when the text is not valid JSON or the
    /// required `log.entries` structure is absent.
    pub fn from_json(raw: &str) -> crate::Result<Self> {
        serde_json::from_str(raw).map_err(|e| HarbingerError::MalformedHar(e.to_string()))
    }
}
