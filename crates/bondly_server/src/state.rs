//! Shared application state.

use std::sync::Arc;

use bondly_turns::{GameMasterRegistry, InMemoryTurnStore, TurnStore, TurnValidator};
use tracing::{info, instrument};

use crate::config::{ServerConfig, StoreBackend};
use crate::db::{DbError, SqliteTurnStore};

/// State owned by the server process and handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Turn validator and, through it, the couple logs.
    pub validator: Arc<TurnValidator>,
    /// Game master presence.
    pub registry: Arc<GameMasterRegistry>,
}

impl AppState {
    /// Wraps an existing store with a fresh validator and registry.
    #[instrument(skip(store))]
    pub fn with_store(store: Arc<dyn TurnStore>) -> Self {
        Self {
            validator: Arc::new(TurnValidator::new(store)),
            registry: Arc::new(GameMasterRegistry::new()),
        }
    }

    /// State backed by an in-memory store.
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(InMemoryTurnStore::new()))
    }

    /// Builds state from configuration, opening the SQLite store if selected.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the SQLite database cannot be opened.
    #[instrument(skip(config), fields(store = %config.store()))]
    pub fn from_config(config: &ServerConfig) -> Result<Self, DbError> {
        let store: Arc<dyn TurnStore> = match config.store() {
            StoreBackend::Memory => Arc::new(InMemoryTurnStore::new()),
            StoreBackend::Sqlite => Arc::new(SqliteTurnStore::open(config.database_path())?),
        };
        info!("Application state ready");
        Ok(Self::with_store(store))
    }
}
