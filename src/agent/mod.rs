//! MCP generation trigger.
//!
//! Harbinger does not synthesize API-client code itself — it delegates that
//! to an external coding-agent CLI and relays what the agent reports. This
//! module carries the request/outcome types and the process runner.

pub mod prompt;
pub mod runner;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use runner::AgentRunner;

/// A request to generate an MCP server from one or more HAR files.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    /// HAR file paths the agent is asked to analyze.
    pub har_paths: Vec<PathBuf>,
    /// Human-friendly server name; falls back to the configured default.
    #[serde(default)]
    pub server_name: Option<String>,
    /// HTTP port suggested in the run command; falls back to the default.
    #[serde(default)]
    pub port: Option<u16>,
    /// Target directory for the generated files; falls back to the default.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// What one agent run produced.
///
/// `success` is true iff the agent emitted its sentinel completion line; a
/// clean exit without it is reported here rather than as an error, with the
/// captured log tail for diagnosis.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub success: bool,
    pub final_message: Option<String>,
    /// Where the agent was instructed to write the server file.
    pub server_path: String,
    /// Command to start the generated server (not executed by Harbinger).
    pub run_command: String,
    /// Bounded tail of the agent's stdout.
    pub logs: Vec<String>,
}
