//! SQLite persistence for couple message logs.

mod error;
mod models;
mod schema;
mod store;

pub use error::DbError;
pub use models::{MessageRow, NewMessageRow};
pub use store::{MIGRATIONS, SqliteTurnStore, migrate};
