//! Ladle chat server and terminal widget entry point.
//!
//! Binary name: `ladle`
//!
//! Parses CLI arguments, loads configuration, then starts the HTTP server,
//! the terminal chat, or prints the knowledge context.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::{AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or logging
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "ladle", &mut std::io::stdout());
        return Ok(());
    }

    let filter = ladle_observe::tracing_setup::filter_for_verbosity(cli.verbose, cli.quiet);
    ladle_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let settings = Settings::load(cli.config.as_deref()).await;

    let result = match cli.command {
        Commands::Serve { port, host } => serve(settings, host, port).await,
        Commands::Chat { endpoint } => cli::chat::loop_runner::run_chat_loop(&settings, endpoint).await,
        Commands::Context => cli::context::print_context(&settings).await,
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    ladle_observe::tracing_setup::shutdown_tracing();
    result
}

async fn serve(settings: Settings, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.config.server.host.clone());
    let port = port.unwrap_or(settings.config.server.port);
    let state = AppState::init(&settings)?;

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} Ladle chat API listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());
    tracing::info!(%addr, provider = "cosmic", "server started");

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
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
