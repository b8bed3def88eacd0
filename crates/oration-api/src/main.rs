//! Oration CLI and REST API entry point.
//!
//! Binary name: `oration`
//!
//! Parses CLI arguments, initializes tracing, the database and services, then
//! dispatches to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;

use cli::{Cli, Commands, SessionCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flags.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,oration=debug",
        _ => "trace",
    };
    oration_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!(e))?;

    let state = AppState::init().await?;

    let result = run(cli, state).await;
    oration_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| state.server.host.clone());
            let port = port.unwrap_or(state.server.port);
            serve(state, &host, port, cli.quiet).await?;
        }

        Commands::Send { content, session } => {
            cli::chat::send(&state, content, session, cli.json, cli.quiet).await?;
        }

        Commands::Session { action } => match action {
            SessionCommand::List { cursor, limit } => {
                cli::session::list_sessions(&state, cursor.as_deref(), limit, cli.json).await?;
            }
            SessionCommand::Create { title } => {
                cli::session::create_session(&state, title, cli.json).await?;
            }
            SessionCommand::Messages { id } => {
                cli::session::show_messages(&state, id, cli.json).await?;
            }
            SessionCommand::Delete { id } => {
                cli::session::delete_session(&state, id, cli.json).await?;
            }
        },

        Commands::Providers => {
            cli::provider::show(&state, cli.json)?;
        }
    }

    Ok(())
}

async fn serve(state: AppState, host: &str, port: u16, quiet: bool) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, "REST API listening");
    if !quiet {
        println!(
            "  {} Oration API listening on {}",
            console::style("⚡").bold(),
            console::style(format!("http://{addr}")).cyan()
        );
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if !quiet {
        println!("\n  Server stopped.");
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// If a handler cannot be installed, that branch never resolves and the
/// other one still stops the server.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
