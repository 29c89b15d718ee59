//! Generation prompt assembly for the external coding agent.
//!
//! The prompt is the whole contract with the agent: which HAR files to
//! read, where to write the server, and the exact sentinel line that marks
//! a successful run.

/// Prefix of the sentinel line the agent must emit for a run to count as
/// successful. The port is appended when the prompt is built.
pub const DONE_PREFIX: &str = "done MCP created and running on http://127.0.0.1:";

/// Build the generation prompt for one run.
///
/// `har_paths` are rendered as a bullet list the agent is told to read;
/// `server_path` / `readme_path` are where it must write; `port` feeds both
/// the suggested run command and the sentinel line.
pub fn build_prompt(
    har_paths: &[String],
    server_name: &str,
    server_path: &str,
    readme_path: &str,
    port: u16,
) -> String {
    let files_list = har_paths
        .iter()
        .map(|p| format!("- {p}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert backend engineer and MCP implementer. Your task:\n\
         \n\
         1) Analyze the network traffic captured in these HAR files (use the Read tool):\n\
         {files_list}\n\
         \n\
         2) Create a minimal but functional FastMCP server named \"{server_name}\" that \
         exposes tools to call the APIs you infer from the HAR capture. The goal is an \
         SDK-friendly MCP server a client can connect to and invoke API calls through.\n\
         \n\
         Implementation requirements:\n\
         - Server file path: {server_path}\n\
         - The file must define a top-level FastMCP instance variable named `mcp`.\n\
         - Implement at least one tool per distinct API endpoint observed in the HAR.\n\
         - Use httpx for HTTP calls inside the tools.\n\
         - Keep the implementation minimal and dependency-light. Add docstrings for each \
         tool with input params and expected output.\n\
         - Create a short README at {readme_path} explaining how to run the server, with \
         a \"Next Steps\" section pointing at the run command in step 3.\n\
         - Do NOT hardcode secrets; read base URLs and headers from tool parameters where \
         appropriate.\n\
         \n\
         3) Provide a run command (do not execute) to start the MCP server via HTTP \
         transport on port {port}:\n\
         \x20  fastmcp run {server_path}:mcp --transport http --port {port}\n\
         \n\
         4) When you finish writing files, respond EXACTLY with the final line (no extra \
         text):\n\
         \x20  {DONE_PREFIX}{port}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_har_files() {
        let prompt = build_prompt(
            &["captures/a.har".to_string(), "captures/b.har".to_string()],
            "Shop API",
            "mcp/har_api_server.py",
            "mcp/README.md",
            8111,
        );
        assert!(prompt.contains("- captures/a.har"));
        assert!(prompt.contains("- captures/b.har"));
    }

    #[test]
    fn test_prompt_carries_paths_and_name() {
        let prompt = build_prompt(
            &["x.har".to_string()],
            "Shop API",
            "mcp/har_api_server.py",
            "mcp/README.md",
            8111,
        );
        assert!(prompt.contains("mcp/har_api_server.py"));
        assert!(prompt.contains("mcp/README.md"));
        assert!(prompt.contains("\"Shop API\""));
    }

    #[test]
    fn test_prompt_ends_with_sentinel_for_port() {
        let prompt = build_prompt(
            &["x.har".to_string()],
            "s",
            "mcp/server.py",
            "mcp/README.md",
            9001,
        );
        assert!(prompt.ends_with(&format!("{DONE_PREFIX}9001")));
        assert!(prompt.contains("--port 9001"));
    }
}
