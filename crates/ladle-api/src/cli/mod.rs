//! CLI command definitions for the `ladle` binary.

pub mod chat;
pub mod context;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Streaming recipe chat: server and terminal widget.
#[derive(Parser)]
#[command(name = "ladle", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Path to a config file (default: <data dir>/ladle.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat HTTP server.
    Serve {
        /// Port to listen on (default from config: 3000).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default from config: 127.0.0.1).
        #[arg(long)]
        host: Option<String>,
    },

    /// Chat with the recipe assistant from the terminal.
    Chat {
        /// Base URL of a running `ladle serve`.
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
    },

    /// Print the knowledge context that grounds every chat turn.
    Context,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
