//! CLI command definitions for the `oration` binary.
//!
//! Uses clap derive macros for argument parsing. Commands follow a
//! noun-verb pattern (e.g., `oration session list`).

pub mod chat;
pub mod provider;
pub mod session;

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Career-advice chat: run the API server or talk to it locally.
#[derive(Parser)]
#[command(name = "oration", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true, env = "ORATION_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Host to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Send one message through the chat pipeline.
    Send {
        /// Message text.
        content: String,

        /// Continue an existing session instead of starting a new one.
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Browse and manage chat sessions.
    #[command(alias = "sessions")]
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },

    /// Show which reply source the next message would use.
    Providers,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// List sessions, newest first.
    #[command(alias = "ls")]
    List {
        /// Start at this session id (inclusive).
        #[arg(long)]
        cursor: Option<String>,

        /// Page size (1-50).
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Create an empty session.
    Create {
        /// Session title.
        #[arg(long)]
        title: Option<String>,
    },

    /// Print the messages of a session.
    Messages {
        /// Session id.
        id: Uuid,
    },

    /// Delete a session and its messages.
    #[command(alias = "rm")]
    Delete {
        /// Session id.
        id: Uuid,
    },
}
