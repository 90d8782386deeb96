//! CLI module for posts-api
//!
//! Provides command-line interface for:
//! - serve: Load config and seed, then run the HTTP server
//! - init: Write a default configuration file

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{build_service, init, resolve_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
