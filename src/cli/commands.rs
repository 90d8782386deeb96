//! CLI command implementations
//!
//! `serve` boots in a fixed order: configuration, logging, seed, post
//! service, HTTP server. The post service is constructed once here and
//! handed to the router; nothing else creates one.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::http_server::{HttpServer, ServerConfig};
use crate::observability::{init_logging, log_event, log_event_with_fields, Event};
use crate::posts::PostService;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::Init { config, force } => init(&config, force),
    }
}

/// Write a default configuration file
pub fn init(config_path: &Path, force: bool) -> CliResult<()> {
    if config_path.exists() && !force {
        return Err(CliError::already_exists(config_path.display()));
    }

    let mut content = serde_json::to_string_pretty(&ServerConfig::default())?;
    content.push('\n');
    fs::write(config_path, content)?;

    println!("Wrote default configuration to {}", config_path.display());
    Ok(())
}

/// Load the configuration, or defaults when no file is given, and apply
/// the command line port override.
pub fn resolve_config(config_path: Option<&Path>, port: Option<u16>) -> CliResult<ServerConfig> {
    let mut config = match config_path {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };

    if let Some(port) = port {
        config.port = port;
    }
    config.validate()?;

    Ok(config)
}

/// Build the post service over the configured seed set
pub fn build_service(config: &ServerConfig) -> CliResult<PostService> {
    let seed = config.load_seed()?;
    let count = seed.len().to_string();
    let service = PostService::with_seed(seed);
    log_event_with_fields(Event::SeedLoaded, &[("posts", count.as_str())]);
    Ok(service)
}

/// Start the HTTP server and block until it shuts down
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let config = resolve_config(config_path, port)?;

    init_logging(&config.log_filter)?;
    log_event(Event::BootStart);
    let addr = config.socket_addr();
    log_event_with_fields(Event::ConfigLoaded, &[("addr", addr.as_str())]);

    let service = Arc::new(build_service(&config)?);
    let server = HttpServer::new(config, service);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}
