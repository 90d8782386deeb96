//! CLI argument definitions using clap
//!
//! Commands:
//! - posts-api serve [--config <path>] [--port <port>]
//! - posts-api init [--config <path>] [--force]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// posts-api - an in-memory REST CRUD service for posts
#[derive(Parser, Debug)]
#[command(name = "posts-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on, overriding the configuration
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write a default configuration file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./posts-api.json")]
        config: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
