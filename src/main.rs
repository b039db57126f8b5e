//! Nexus Agent command-line entry point.
//!
//! Reads one model response from a file (or stdin), executes its tool calls,
//! and prints the JSON envelope on stdout. Logs go to stderr.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use nexus_agent::{AgentExecutor, ConfigOverrides, ConfigService};

#[derive(Parser, Debug)]
#[command(
    name = "nexus-agent",
    version,
    about = "Execute the tool calls embedded in an LLM response"
)]
struct Cli {
    /// File holding the model response, or `-` for stdin
    #[arg(value_name = "RESPONSE_FILE", required_unless_present = "info")]
    response_file: Option<PathBuf>,

    /// Directory every file operation is confined to
    #[arg(value_name = "WORKSPACE_ROOT")]
    workspace_root: Option<PathBuf>,

    /// Configuration file (default: ~/.nexus-agent/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable every operation, including the ones disabled by default
    #[arg(long)]
    allow_all: bool,

    /// Reject responses with nested or overlapping sections
    #[arg(long)]
    strict: bool,

    /// Print agent information and exit
    #[arg(long)]
    info: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut service = ConfigService::load(cli.config.as_deref())?;
    service.apply_overrides(ConfigOverrides {
        workspace_root: cli.workspace_root,
        allow_all: cli.allow_all,
        strict: cli.strict,
    })?;
    let agent = AgentExecutor::new(service.into_config())?;

    if cli.info {
        println!("{}", serde_json::to_string_pretty(&agent.info_envelope())?);
        return Ok(());
    }

    let path = cli
        .response_file
        .context("RESPONSE_FILE is required unless --info is given")?;
    let text = read_input(&path)?;

    let response = agent.process_envelope(&text).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    if !response.success {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read response from stdin")?;
        return Ok(text);
    }
    tracing::info!("Reading response file: {}", path.display());
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read response file {}", path.display()))
}
