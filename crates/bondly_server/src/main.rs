//! Bondly - couple message exchange server.

use anyhow::Result;
use bondly_server::{AppState, Cli, Command, ServerConfig, apply_overrides, migrate, router};
use clap::Parser;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            store,
            database_path,
        } => {
            let config = ServerConfig::load(config.as_deref())?;
            let config = apply_overrides(config, host, port, store, database_path);
            run_server(config).await
        }
        Command::Migrate { database_path } => {
            let applied = migrate(&database_path)?;
            info!(applied, database_path = %database_path, "Database is up to date");
            Ok(())
        }
    }
}

/// Run the HTTP API server until interrupted.
#[instrument(skip(config), fields(address = %config.bind_address(), store = %config.store()))]
async fn run_server(config: ServerConfig) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("Server ready at http://{}/", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
