//! Append-only per-couple message logs.

use crate::{CoupleId, Message, MessageDraft, MessageId, StoreError};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, instrument};

/// Storage for couple message logs.
///
/// A store only records what it is given; turn order is enforced by
/// [`TurnValidator`](crate::TurnValidator) before anything reaches it.
pub trait TurnStore: Send + Sync {
    /// Assigns an id and timestamp to `draft` and appends it to the couple's log.
    fn append(&self, couple_id: &CoupleId, draft: MessageDraft) -> Result<Message, StoreError>;

    /// Returns the couple's full log in insertion order.
    ///
    /// An unknown couple has an empty log.
    fn list(&self, couple_id: &CoupleId) -> Result<Vec<Message>, StoreError>;

    /// Returns the log starting at `offset`. Offsets past the end yield an empty log.
    fn list_since(&self, couple_id: &CoupleId, offset: usize) -> Result<Vec<Message>, StoreError> {
        let mut log = self.list(couple_id)?;
        Ok(log.split_off(offset.min(log.len())))
    }

    /// Returns the most recent message of the couple's log.
    fn last(&self, couple_id: &CoupleId) -> Result<Option<Message>, StoreError> {
        Ok(self.list(couple_id)?.pop())
    }
}

/// Process-lifetime store keeping every log in memory.
#[derive(Debug, Default)]
pub struct InMemoryTurnStore {
    logs: Mutex<HashMap<CoupleId, Vec<Message>>>,
    next_id: AtomicU64,
}

impl InMemoryTurnStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory turn store");
        Self::default()
    }

    fn with_log<T>(
        &self,
        couple_id: &CoupleId,
        f: impl FnOnce(&mut Vec<Message>) -> T,
    ) -> Result<T, StoreError> {
        let mut logs = self
            .logs
            .lock()
            .map_err(|_| StoreError::new("Turn store lock poisoned"))?;
        let log = logs.entry(couple_id.clone()).or_default();
        Ok(f(log))
    }
}

impl TurnStore for InMemoryTurnStore {
    #[instrument(skip(self, couple_id, draft), fields(couple_id = %couple_id, sender = %draft.sender()))]
    fn append(&self, couple_id: &CoupleId, draft: MessageDraft) -> Result<Message, StoreError> {
        let id = MessageId::from(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let message = Message::new(
            id,
            draft.text().clone(),
            *draft.sender(),
            Utc::now(),
            couple_id.clone(),
        );

        let len = self.with_log(couple_id, |log| {
            log.push(message.clone());
            log.len()
        })?;

        info!(message_id = %id, log_len = len, "Message appended");
        Ok(message)
    }

    #[instrument(skip(self, couple_id), fields(couple_id = %couple_id))]
    fn list(&self, couple_id: &CoupleId) -> Result<Vec<Message>, StoreError> {
        let log = self.with_log(couple_id, |log| log.clone())?;
        debug!(count = log.len(), "Listed messages");
        Ok(log)
    }

    #[instrument(skip(self, couple_id), fields(couple_id = %couple_id))]
    fn list_since(&self, couple_id: &CoupleId, offset: usize) -> Result<Vec<Message>, StoreError> {
        let log = self.with_log(couple_id, |log| {
            log.get(offset..).map(<[Message]>::to_vec).unwrap_or_default()
        })?;
        debug!(offset, count = log.len(), "Listed messages since offset");
        Ok(log)
    }

    #[instrument(skip(self, couple_id), fields(couple_id = %couple_id))]
    fn last(&self, couple_id: &CoupleId) -> Result<Option<Message>, StoreError> {
        self.with_log(couple_id, |log| log.last().cloned())
    }
}
