//! Command-line interface for the Bondly server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{ServerConfig, StoreBackend};

/// Bondly - turn-based couple messaging server
#[derive(Parser, Debug)]
#[command(name = "bondly")]
#[command(about = "Turn-based couple message exchange over HTTP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long, env = "BONDLY_CONFIG")]
        config: Option<PathBuf>,

        /// Host to bind to (overrides the config file)
        #[arg(long, env = "BONDLY_HOST")]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long, env = "BONDLY_PORT")]
        port: Option<u16>,

        /// Store backend: memory or sqlite (overrides the config file)
        #[arg(long, env = "BONDLY_STORE")]
        store: Option<StoreBackend>,

        /// SQLite database path (overrides the config file)
        #[arg(long, env = "BONDLY_DATABASE_PATH")]
        database_path: Option<String>,
    },

    /// Apply pending SQLite migrations and exit
    Migrate {
        /// SQLite database path (created if it doesn't exist)
        #[arg(long, default_value = "bondly.db", env = "BONDLY_DATABASE_PATH")]
        database_path: String,
    },
}

/// Applies command-line overrides on top of a loaded config.
pub fn apply_overrides(
    config: ServerConfig,
    host: Option<String>,
    port: Option<u16>,
    store: Option<StoreBackend>,
    database_path: Option<String>,
) -> ServerConfig {
    let config = match host {
        Some(host) => config.with_host(host),
        None => config,
    };
    let config = match port {
        Some(port) => config.with_port(port),
        None => config,
    };
    let config = match store {
        Some(store) => config.with_store(store),
        None => config,
    };
    match database_path {
        Some(path) => config.with_database_path(path),
        None => config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::try_parse_from([
            "bondly", "serve", "--port", "8080", "--store", "sqlite", "--host", "0.0.0.0",
        ])
        .unwrap();
        match cli.command {
            Command::Serve {
                port, store, host, ..
            } => {
                assert_eq!(port, Some(8080));
                assert_eq!(store, Some(StoreBackend::Sqlite));
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_store_rejected() {
        assert!(Cli::try_parse_from(["bondly", "serve", "--store", "redis"]).is_err());
    }

    #[test]
    fn test_overrides_only_touch_given_fields() {
        let config = apply_overrides(ServerConfig::default(), None, Some(9000), None, None);
        assert_eq!(*config.port(), 9000);
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.store(), StoreBackend::Memory);
    }
}
