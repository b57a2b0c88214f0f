//! Database models for stored messages.

use std::str::FromStr;

use bondly_turns::{CoupleId, Message, MessageId, Sender};
use chrono::NaiveDateTime;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::{DbError, schema};

/// Stored message row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = schema::messages)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MessageRow {
    id: i64,
    couple_id: String,
    sender: String,
    text: String,
    created_at: NaiveDateTime,
}

impl MessageRow {
    /// Converts the row into a domain [`Message`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the row holds an unknown sender or a negative id.
    #[instrument(skip(self), fields(id = self.id))]
    pub fn into_message(self) -> Result<Message, DbError> {
        let sender = Sender::from_str(&self.sender)
            .map_err(|_| DbError::new(format!("Invalid sender in row: '{}'", self.sender)))?;
        let id = u64::try_from(self.id)
            .map_err(|_| DbError::new(format!("Invalid message id: {}", self.id)))?;

        Ok(Message::new(
            MessageId::from(id),
            self.text,
            sender,
            self.created_at.and_utc(),
            CoupleId::from(self.couple_id),
        ))
    }
}

/// Insertable message row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::messages)]
pub struct NewMessageRow {
    couple_id: String,
    sender: String,
    text: String,
    created_at: NaiveDateTime,
}
