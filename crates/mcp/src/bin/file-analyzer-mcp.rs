// Standalone MCP server binary

use anyhow::{Context, Result};
use clap::Parser;
use file_analyzer_core::sample::bootstrap;
use file_analyzer_core::FileStore;
use file_analyzer_mcp::config::ServerConfig;
use file_analyzer_mcp::http;
use file_analyzer_mcp::resources::{ResourceRegistry, SchemaResource};
use file_analyzer_mcp::server::McpServer;
use file_analyzer_mcp::tools::{dataset_tools, ToolRegistry};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "file-analyzer-mcp")]
#[command(about = "MCP server for CSV and Parquet file analysis", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "file-analyzer.toml")]
    config: PathBuf,

    /// Directory holding the data files; nothing outside it is read or written
    #[arg(short, long, env = "FILE_ANALYZER_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Serve over HTTP on this address (e.g. 127.0.0.1:8000) instead of stdio
    #[arg(long, value_name = "ADDR")]
    http: Option<String>,

    /// Do not write the sample files on startup
    #[arg(long)]
    no_seed: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the stdio protocol
    let default_filter = if args.verbose {
        "file_analyzer=debug"
    } else {
        "file_analyzer=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::info!("Starting MCP File Analyzer Server...");
    tracing::info!("Data directory: {}", args.data_dir.display());

    let config = ServerConfig::load(&args.config, args.data_dir)?;
    let store = Arc::new(FileStore::new(&config.data_dir)?);

    if config.data.seed_samples && !args.no_seed {
        bootstrap(&store).context("Failed to create sample data")?;
    }

    let mut tools = ToolRegistry::new();
    for tool in dataset_tools(store.clone()) {
        tools.register(tool)?;
    }

    let mut resources = ResourceRegistry::new();
    resources.register(Arc::new(SchemaResource))?;

    tracing::info!(
        "Registered {} tools and {} resources",
        tools.len(),
        resources.len()
    );

    let server = Arc::new(McpServer::new(config.server_info(), tools, resources));
    match args.http {
        Some(addr) => http::serve(&addr, server).await?,
        None => server.start().await?,
    }

    Ok(())
}
