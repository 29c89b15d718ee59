//! Agent runner — spawns the coding-agent CLI with timeout-kill, streams
//! its output, and reports the generation outcome.
//!
//! The agent is an opaque collaborator: Harbinger builds the prompt, runs
//! the configured command via `tokio::process::Command` (never a shell),
//! and judges success solely by the sentinel completion line. Everything
//! else the agent prints is relayed as logs.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

use crate::agent::prompt::{DONE_PREFIX, build_prompt};
use crate::agent::{GenerationOutcome, GenerationRequest};
use crate::config::{AgentConfig, GenerateConfig, resolve_env_vars};
use crate::error::HarbingerError;

/// File name the agent is instructed to write the generated server to.
const SERVER_FILE: &str = "har_api_server.py";
/// README the agent writes alongside the server.
const README_FILE: &str = "README.md";

/// Runtime handle for the configured coding agent.
pub struct AgentRunner {
    command: String,
    args: Vec<String>,
    /// Resolved env vars (values already extracted from `${VAR}` references)
    env: HashMap<String, String>,
    timeout: Duration,
    output_dir: PathBuf,
    stream_logs: bool,
    max_log_lines: usize,
    defaults: GenerateConfig,
}

impl AgentRunner {
    /// Build a runner from config. Env references are resolved here, once,
    /// so repeated runs see a consistent environment.
    pub fn new(agent: &AgentConfig, defaults: &GenerateConfig) -> Self {
        Self {
            command: agent.command.clone(),
            args: agent.args.clone(),
            env: resolve_env_vars(&agent.env),
            timeout: Duration::from_secs(agent.timeout_secs),
            output_dir: agent.output_dir.clone(),
            stream_logs: agent.stream_logs,
            max_log_lines: agent.max_log_lines,
            defaults: defaults.clone(),
        }
    }

    /// Run one generation: verify inputs, build the prompt, spawn the agent,
    /// and collect the outcome.
    ///
    /// # Errors
    /// - `InvalidRequest` when no HAR paths are given
    /// - `HarFileNotFound` before any spawn when a path is missing
    /// - `AgentSpawn` / `AgentIo` on process failures
    /// - `GenerationTimeout` when the budget expires (the child is killed,
    ///   not just the future)
    ///
    /// A run that completes without the sentinel line is NOT an error — it
    /// returns `success = false` with the captured logs.
    pub async fn generate(&self, request: GenerationRequest) -> crate::Result<GenerationOutcome> {
        if request.har_paths.is_empty() {
            return Err(HarbingerError::InvalidRequest(
                "at least one HAR path is required".to_string(),
            ));
        }
        for path in &request.har_paths {
            if !path.exists() {
                return Err(HarbingerError::HarFileNotFound(path.display().to_string()));
            }
        }

        let port = request.port.unwrap_or(self.defaults.port);
        let server_name = request
            .server_name
            .as_deref()
            .unwrap_or(&self.defaults.server_name);
        let output_dir = request
            .output_dir
            .clone()
            .unwrap_or_else(|| self.output_dir.clone());

        tokio::fs::create_dir_all(&output_dir).await.map_err(|e| {
            HarbingerError::AgentIo(format!(
                "failed to create output dir {}: {}",
                output_dir.display(),
                e
            ))
        })?;

        let server_path = output_dir.join(SERVER_FILE).display().to_string();
        let readme_path = output_dir.join(README_FILE).display().to_string();
        let run_command =
            format!("fastmcp run {server_path}:mcp --transport http --port {port}");

        let har_paths: Vec<String> = request
            .har_paths
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        let generation_prompt =
            build_prompt(&har_paths, server_name, &server_path, &readme_path, port);

        tracing::info!(
            command = %self.command,
            har_paths = ?har_paths,
            server = %server_name,
            port,
            "starting agent generation run"
        );

        let mut cmd = tokio::process::Command::new(&self.command);
        cmd.args(&self.args);
        cmd.arg(&generation_prompt);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        for (k, v) in &self.env {
            cmd.env(k, v);
        }

        let start = Instant::now();
        let mut child = cmd.spawn().map_err(|e| {
            HarbingerError::AgentSpawn(self.command.clone(), e.to_string())
        })?;

        // Take pipes before waiting so the child stays killable on timeout
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        let mut logs: Vec<String> = Vec::new();
        let mut final_message: Option<String> = None;

        let (status, stderr_bytes) = tokio::select! {
            result = async {
                if let Some(out) = stdout_pipe {
                    let mut lines = BufReader::new(out).lines();
                    while let Ok(Some(line)) = lines.next_line().await {
                        if self.stream_logs {
                            tracing::info!(line = %line, "agent output");
                        }
                        if line.contains(DONE_PREFIX) {
                            final_message = Some(line.trim().to_string());
                        }
                        logs.push(line);
                    }
                }
                let mut stderr_bytes = Vec::new();
                if let Some(mut err) = stderr_pipe {
                    let _ = err.read_to_end(&mut stderr_bytes).await;
                }
                let status = child.wait().await.map_err(|e| {
                    HarbingerError::AgentIo(format!("process wait error: {}", e))
                })?;
                Ok::<_, HarbingerError>((status, stderr_bytes))
            } => result?,
            _ = tokio::time::sleep(self.timeout) => {
                // Timeout: kill the child process (not just cancel the future)
                let _ = child.kill().await;
                return Err(HarbingerError::GenerationTimeout(self.timeout.as_secs()));
            }
        };

        let elapsed = start.elapsed().as_millis();
        let exit_code = status.code().unwrap_or(-1);
        let stderr_text = String::from_utf8_lossy(&stderr_bytes).into_owned();

        tracing::info!(
            command = %self.command,
            exit_code = %exit_code,
            duration_ms = %elapsed,
            sentinel_seen = final_message.is_some(),
            "agent run finished"
        );

        if !stderr_text.is_empty() {
            tracing::debug!(stderr = %stderr_text, "agent stderr");
        }

        // Bound the log tail carried back to the caller
        if logs.len() > self.max_log_lines {
            logs.drain(..logs.len() - self.max_log_lines);
        }

        Ok(GenerationOutcome {
            success: final_message.is_some(),
            final_message,
            server_path,
            run_command,
            logs,
        })
    }
}
