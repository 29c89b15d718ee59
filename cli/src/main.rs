//! Harbinger — HAR capture gateway and MCP generation CLI.
//!
//! Three subcommands:
//! - `harbinger serve`: HTTP API for extraction, capture, and MCP generation
//! - `harbinger extract`: one-shot endpoint extraction from a HAR file
//! - `harbinger generate`: one-shot MCP generation from HAR files

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use harbinger::{
    AgentRunner, AppState, GenerationRequest, HarbingerConfig, extract_endpoints_from_json,
    router, synthesize_openapi,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Harbinger — HAR capture gateway and MCP generation trigger.
#[derive(Parser)]
#[command(
    name = "harbinger",
    version,
    about = "Harbinger — extract API endpoints from HAR traces and generate MCP servers"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API (extraction, OpenAPI view, capture, generation)
    Serve {
        /// Path to harbinger.toml [default: ./harbinger.toml or ~/.config/harbinger/harbinger.toml]
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// HTTP port to listen on
        #[arg(short, long, default_value = "8200")]
        port: u16,
        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Extract API endpoints from a HAR file and print them as JSON
    Extract {
        /// HAR file to read
        har: PathBuf,
        /// Emit an OpenAPI-style document instead of the endpoint list
        #[arg(long)]
        openapi: bool,
        /// Title for the OpenAPI-style document
        #[arg(long, default_value = "HAR API")]
        title: String,
    },
    /// Generate an MCP server from HAR files via the configured coding agent
    Generate {
        /// HAR files the agent should analyze
        #[arg(required = true)]
        har: Vec<PathBuf>,
        /// Path to harbinger.toml [default: ./harbinger.toml or ~/.config/harbinger/harbinger.toml]
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Name for the generated MCP server
        #[arg(short, long)]
        name: Option<String>,
        /// HTTP port suggested in the run command
        #[arg(short, long)]
        port: Option<u16>,
        /// Directory to write the generated server files
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with env filter (RUST_LOG controls verbosity)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cancel = CancellationToken::new();

    // Ctrl-C handler — cancels the root token for graceful shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Shutting down Harbinger...");
        cancel_for_signal.cancel();
    });

    match cli.command {
        Commands::Serve { config, port, host } => {
            let config_path = resolve_config(config)?;
            run_serve(config_path, host, port, cancel).await?;
        }
        Commands::Extract { har, openapi, title } => {
            run_extract(har, openapi, &title).await?;
        }
        Commands::Generate {
            har,
            config,
            name,
            port,
            output_dir,
        } => {
            let config_path = resolve_config(config)?;
            run_generate(config_path, har, name, port, output_dir).await?;
        }
    }

    Ok(())
}

/// Start the Harbinger HTTP API.
///
/// Loads harbinger.toml, validates it, builds the shared state, then serves
/// the axum router until ctrl-c.
async fn run_serve(
    config_path: PathBuf,
    host: String,
    port: u16,
    cancel: CancellationToken,
) -> Result<()> {
    let config = load_config(&config_path).await?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid config {:?}: {}", config_path, e))?;
    let state = AppState::from_config(config)
        .map_err(|e| anyhow::anyhow!("Failed to build server state: {}", e))?;
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!(host = %host, port = %port, "Harbinger API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| anyhow::anyhow!("Harbinger API server error: {}", e))?;

    tracing::info!("Harbinger API stopped");
    Ok(())
}

/// Extract endpoints from a HAR file and print JSON to stdout.
async fn run_extract(har: PathBuf, openapi: bool, title: &str) -> Result<()> {
    let raw = tokio::fs::read_to_string(&har)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read HAR file {:?}: {}", har, e))?;
    let extraction = extract_endpoints_from_json(&raw)?;

    if extraction.skipped > 0 {
        tracing::warn!(
            skipped = extraction.skipped,
            "entries with unparseable URLs were skipped"
        );
    }

    let output = if openapi {
        serde_json::to_string_pretty(&synthesize_openapi(&extraction.endpoints, title))?
    } else {
        serde_json::to_string_pretty(&extraction)?
    };
    println!("{output}");
    Ok(())
}

/// Run the configured coding agent against the given HAR files.
async fn run_generate(
    config_path: PathBuf,
    har: Vec<PathBuf>,
    name: Option<String>,
    port: Option<u16>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(&config_path).await?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid config {:?}: {}", config_path, e))?;

    let runner = AgentRunner::new(&config.agent, &config.generate);
    let outcome = runner
        .generate(GenerationRequest {
            har_paths: har,
            server_name: name,
            port,
            output_dir,
        })
        .await?;

    if outcome.success {
        tracing::info!(server = %outcome.server_path, "MCP server generated");
        println!("{}", outcome.run_command);
        Ok(())
    } else {
        for line in &outcome.logs {
            eprintln!("{line}");
        }
        Err(anyhow::anyhow!(
            "agent finished without reporting completion — see logs above"
        ))
    }
}

/// Resolve config file path: explicit flag → ./harbinger.toml → ~/.config/harbinger/harbinger.toml.
fn resolve_config(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    let local = Path::new("harbinger.toml");
    if local.exists() {
        return Ok(local.to_path_buf());
    }

    if let Some(config_dir) = dirs::config_dir() {
        let xdg = config_dir.join("harbinger").join("harbinger.toml");
        if xdg.exists() {
            return Ok(xdg);
        }
    }

    Err(anyhow::anyhow!(
        "No harbinger.toml found. Searched ./harbinger.toml and ~/.config/harbinger/harbinger.toml. \
         Use --config to specify a path."
    ))
}

/// Load and parse a harbinger.toml config file.
async fn load_config(config_path: &PathBuf) -> Result<HarbingerConfig> {
    let content = tokio::fs::read_to_string(config_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read config file {:?}: {}", config_path, e))?;
    let config: HarbingerConfig = toml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse config file {:?}: {}", config_path, e))?;
    Ok(config)
}
