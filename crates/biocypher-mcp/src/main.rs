//! BioCypher MCP server.
//!
//! Serves adapter-creation guidance over stdio:
//!
//! ```bash
//! biocypher-mcp                    # serve
//! biocypher-mcp --resources-dir .  # serve, reading adapter_framework.md from .
//! biocypher-mcp init               # register with Claude Code / Codex in this project
//! biocypher-mcp --resources-dir ./guides init
//! ```

use std::path::PathBuf;

use biocypher_core::framework::bundled_dir;
use biocypher_core::FrameworkDocument;
use clap::{Parser, Subcommand};
use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

mod init;
mod server;

use server::BiocypherServer;

#[derive(Debug, Parser)]
#[command(name = "biocypher-mcp", version, about = "MCP server for BioCypher adapter creation")]
struct Cli {
    /// Directory containing adapter_framework.md
    #[arg(long, env = "BIOCYPHER_MCP_RESOURCES")]
    resources_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write project-scoped MCP config for the agent clients found on PATH,
    /// passing --resources-dir through when given
    Init,
}

impl Cli {
    /// Directories searched for the framework guide, in order.
    fn resource_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Some(dir) = &self.resources_dir {
            dirs.push(dir.clone());
        }
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.join("resources")))
        {
            dirs.push(exe_dir);
        }
        dirs.push(bundled_dir());
        dirs
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(Command::Init) = cli.command {
        let written = init::init_project(&std::env::current_dir()?, cli.resources_dir.as_deref())?;
        tracing::info!("biocypher-mcp registered in {} config file(s)", written.len());
        return Ok(());
    }

    let framework = FrameworkDocument::load(&cli.resource_dirs());
    tracing::info!("starting biocypher-mcp on stdio");

    let service = BiocypherServer::new(framework)
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| tracing::error!("MCP server error: {}", e))?;
    service.waiting().await?;
    Ok(())
}
