//! Bondly server library - HTTP API over the couple message exchange.
//!
//! # Architecture
//!
//! - **Routes**: axum handlers for submit, list, turn, and game master presence
//! - **State**: the turn validator and registry, built once per process
//! - **Config**: TOML file plus command-line overrides
//! - **Db**: SQLite [`TurnStore`](bondly_turns::TurnStore) with embedded migrations
//!
//! # Example
//!
//! ```no_run
//! use bondly_server::{AppState, router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let app = router(AppState::in_memory());
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod cli;
mod config;
mod db;
mod error;
mod routes;
mod state;

pub use api::{
    CoupleRequest, ErrorBody, ListQuery, PresenceResponse, SubmitRequest, TurnResponse,
};
pub use cli::{Cli, Command, apply_overrides};
pub use config::{ConfigError, ServerConfig, StoreBackend};
pub use db::{DbError, MIGRATIONS, MessageRow, NewMessageRow, SqliteTurnStore, migrate};
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
