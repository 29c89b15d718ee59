//! Harbinger configuration — deserialization and validation.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use url::Url;

use crate::error::HarbingerError;

/// Strip an env var reference to its variable name.
///
/// Accepts `${VAR_NAME}` syntax only. Returns `None` if the value is not a
/// valid env-var reference.
pub fn parse_env_ref(value: &str) -> Option<&str> {
    value.strip_prefix("${").and_then(|s| s.strip_suffix('}'))
}

/// Resolve a map of env-var references to their actual values.
///
/// Each value must be `${VAR}`. Unknown variables resolve to the empty
/// string (same as shell `${UNSET-}`).
pub fn resolve_env_vars(env: &HashMap<String, String>) -> HashMap<String, String> {
    env.iter()
        .map(|(k, v)| {
            let resolved = match parse_env_ref(v) {
                Some(var_name) => std::env::var(var_name).unwrap_or_default(),
                None => v.clone(), // caught by validate(), but handle gracefully
            };
            (k.clone(), resolved)
        })
        .collect()
}

/// Top-level Harbinger configuration, parsed from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarbingerConfig {
    #[serde(default)]
    pub agent: AgentConfig,
    /// Optional remote capture backend; capture routes return 503 when absent.
    pub capture: Option<CaptureConfig>,
    #[serde(default)]
    pub generate: GenerateConfig,
}

/// Configuration for the external coding-agent CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// The executable to run (e.g., an agent CLI on PATH).
    #[serde(default)]
    pub command: String,
    /// Args always passed before the generation prompt.
    #[serde(default)]
    pub args: Vec<String>,
    /// Env var references (`${VAR}`), resolved at spawn time.
    #[serde(default)]
    pub env: HashMap<String, String>,
    /// Wall-clock budget for one generation run; the child is killed on expiry.
    #[serde(default = "default_agent_timeout_secs")]
    pub timeout_secs: u64,
    /// Directory the agent writes the generated server files into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Mirror agent stdout lines into tracing while the run is in flight.
    #[serde(default = "default_stream_logs")]
    pub stream_logs: bool,
    /// Bound on the log tail carried in the generation outcome.
    #[serde(default = "default_max_log_lines")]
    pub max_log_lines: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            args: Vec::new(),
            env: HashMap::new(),
            timeout_secs: default_agent_timeout_secs(),
            output_dir: default_output_dir(),
            stream_logs: default_stream_logs(),
            max_log_lines: default_max_log_lines(),
        }
    }
}

/// Configuration for the remote browser-capture backend.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureConfig {
    /// Base URL of the capture service.
    pub url: String,
    #[serde(default = "default_capture_timeout_secs")]
    pub timeout_secs: u64,
}

/// Defaults applied to generation requests that omit them.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateConfig {
    /// HTTP port suggested in the generated server's run command.
    #[serde(default = "default_generate_port")]
    pub port: u16,
    /// Human-friendly name for the generated MCP server.
    #[serde(default = "default_server_name")]
    pub server_name: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            port: default_generate_port(),
            server_name: default_server_name(),
        }
    }
}

fn default_agent_timeout_secs() -> u64 {
    600
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("mcp")
}

fn default_stream_logs() -> bool {
    true
}

fn default_max_log_lines() -> usize {
    100
}

fn default_capture_timeout_secs() -> u64 {
    120
}

fn default_generate_port() -> u16 {
    8111
}

fn default_server_name() -> String {
    "HAR MCP Server".to_string()
}

impl HarbingerConfig {
    /// Validate the config, failing fast on misconfigurations before
    /// anything is spawned or served.
    pub fn validate(&self) -> crate::Result<()> {
        // 1. Agent command is mandatory — everything else has defaults
        if self.agent.command.is_empty() {
            return Err(HarbingerError::InvalidConfig(
                "agent".to_string(),
                "command must not be empty".to_string(),
            ));
        }

        if self.agent.timeout_secs == 0 {
            return Err(HarbingerError::InvalidConfig(
                "agent".to_string(),
                "timeout_secs must be > 0".to_string(),
            ));
        }

        if self.agent.max_log_lines == 0 {
            return Err(HarbingerError::InvalidConfig(
                "agent".to_string(),
                "max_log_lines must be > 0".to_string(),
            ));
        }

        // 2. Env values must be ${VAR} references — never literal secrets
        for (key, value) in &self.agent.env {
            if parse_env_ref(value).is_none() {
                return Err(HarbingerError::InvalidConfig(
                    "agent".to_string(),
                    format!(
                        "env value for key '{}' must be a ${{VAR}} reference, got '{}'",
                        key, value
                    ),
                ));
            }
        }

        // 3. Capture backend URL must be an absolute http(s) URL
        if let Some(capture) = &self.capture {
            let parsed = Url::parse(&capture.url).map_err(|e| {
                HarbingerError::InvalidConfig(
                    "capture".to_string(),
                    format!("url '{}' is not a valid URL: {}", capture.url, e),
                )
            })?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(HarbingerError::InvalidConfig(
                    "capture".to_string(),
                    format!("url scheme must be http or https, got '{}'", parsed.scheme()),
                ));
            }
            if capture.timeout_secs == 0 {
                return Err(HarbingerError::InvalidConfig(
                    "capture".to_string(),
                    "timeout_secs must be > 0".to_string(),
                ));
            }
        }

        // 4. Generation defaults
        if self.generate.port == 0 {
            return Err(HarbingerError::InvalidConfig(
                "generate".to_string(),
                "port must be non-zero".to_string(),
            ));
        }
        if self.generate.server_name.is_empty() {
            return Err(HarbingerError::InvalidConfig(
                "generate".to_string(),
                "server_name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
