//! Harbinger — HAR capture gateway and MCP generation trigger.
//! Extracts classified API endpoints from HTTP Archive traces, synthesizes
//! an OpenAPI-style view, proxies recording runs to a remote capture
//! backend, and delegates MCP server generation to an external coding
//! agent invoked as an opaque CLI collaborator.

pub mod agent;
pub mod capture;
pub mod config;
pub mod error;
pub mod har;
pub mod server;

pub use agent::{AgentRunner, GenerationOutcome, GenerationRequest};
pub use capture::{CaptureClient, CaptureOutcome, CaptureRequest};
pub use config::{
    AgentConfig, CaptureConfig, GenerateConfig, HarbingerConfig, parse_env_ref, resolve_env_vars,
};
pub use error::{HarbingerError, Result};
pub use har::extract::{Endpoint, Extraction, extract_endpoints, extract_endpoints_from_json};
pub use har::openapi::synthesize_openapi;
pub use har::{Har, HarEntry, HarHeader, HarLog, HarRequest, HarResponse};
pub use server::{AppState, router};
