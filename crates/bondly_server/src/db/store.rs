//! SQLite-backed [`TurnStore`].

use std::sync::{Mutex, MutexGuard};

use bondly_turns::{CoupleId, Message, MessageDraft, StoreError, TurnStore};
use chrono::Utc;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, MessageRow, NewMessageRow, schema};

/// Schema migrations bundled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applies pending migrations to the database at `db_path`.
///
/// Returns the number of migrations applied.
///
/// # Errors
///
/// Returns [`DbError`] if the database cannot be opened or a migration fails.
#[instrument(skip(db_path), fields(db_path = %db_path))]
pub fn migrate(db_path: &str) -> Result<usize, DbError> {
    let mut conn = SqliteConnection::establish(db_path)?;
    run_migrations(&mut conn)
}

fn run_migrations(conn: &mut SqliteConnection) -> Result<usize, DbError> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
    info!(count = applied.len(), "Migrations applied");
    Ok(applied.len())
}

/// Durable store keeping every couple's log in one SQLite table.
///
/// A single connection is shared behind a mutex, which also makes `":memory:"`
/// usable since the database lives as long as the connection.
pub struct SqliteTurnStore {
    db_path: String,
    conn: Mutex<SqliteConnection>,
}

impl SqliteTurnStore {
    /// Opens the database at `db_path`, applying pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: &str) -> Result<Self, DbError> {
        info!(path = %db_path, "Opening SQLite turn store");
        let mut conn = SqliteConnection::establish(db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", db_path, e)))?;
        run_migrations(&mut conn)?;
        Ok(Self {
            db_path: db_path.to_string(),
            conn: Mutex::new(conn),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, SqliteConnection>, DbError> {
        self.conn
            .lock()
            .map_err(|_| DbError::new("SQLite connection lock poisoned"))
    }

    fn load(&self, couple_id: &CoupleId, offset: i64) -> Result<Vec<Message>, DbError> {
        use schema::messages::dsl;

        let mut conn = self.connection()?;
        let rows: Vec<MessageRow> = dsl::messages
            .filter(dsl::couple_id.eq(couple_id.as_str()))
            .order(dsl::id.asc())
            .offset(offset)
            .select(MessageRow::as_select())
            .load(&mut *conn)?;

        rows.into_iter().map(MessageRow::into_message).collect()
    }
}

impl std::fmt::Debug for SqliteTurnStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteTurnStore")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl TurnStore for SqliteTurnStore {
    #[instrument(skip(self, couple_id, draft), fields(couple_id = %couple_id, sender = %draft.sender()))]
    fn append(&self, couple_id: &CoupleId, draft: MessageDraft) -> Result<Message, StoreError> {
        let new_row = NewMessageRow::new(
            couple_id.as_str().to_string(),
            draft.sender().to_string(),
            draft.text().clone(),
            Utc::now().naive_utc(),
        );

        let mut conn = self.connection()?;
        let row: MessageRow = diesel::insert_into(schema::messages::table)
            .values(&new_row)
            .returning(MessageRow::as_returning())
            .get_result(&mut *conn)
            .map_err(DbError::from)?;

        let message = row.into_message()?;
        info!(message_id = %message.id(), "Message persisted");
        Ok(message)
    }

    #[instrument(skip(self, couple_id), fields(couple_id = %couple_id))]
    fn list(&self, couple_id: &CoupleId) -> Result<Vec<Message>, StoreError> {
        let log = self.load(couple_id, 0)?;
        debug!(count = log.len(), "Loaded messages");
        Ok(log)
    }

    #[instrument(skip(self, couple_id), fields(couple_id = %couple_id))]
    fn list_since(&self, couple_id: &CoupleId, offset: usize) -> Result<Vec<Message>, StoreError> {
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let log = self.load(couple_id, offset)?;
        debug!(offset, count = log.len(), "Loaded messages since offset");
        Ok(log)
    }

    #[instrument(skip(self, couple_id), fields(couple_id = %couple_id))]
    fn last(&self, couple_id: &CoupleId) -> Result<Option<Message>, StoreError> {
        use schema::messages::dsl;

        let mut conn = self.connection()?;
        let row: Option<MessageRow> = dsl::messages
            .filter(dsl::couple_id.eq(couple_id.as_str()))
            .order(dsl::id.desc())
            .select(MessageRow::as_select())
            .first(&mut *conn)
            .optional()
            .map_err(DbError::from)?;

        Ok(row.map(MessageRow::into_message).transpose()?)
    }
}
