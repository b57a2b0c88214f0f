//! Turn alternation enforcement in front of a [`TurnStore`].

use crate::{CoupleId, Message, MessageDraft, Sender, StoreError, TurnError, TurnStore};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Guards a store so every couple's log alternates senders, starting with player1.
///
/// Submissions for the same couple are serialized by a per-couple lock held
/// from the turn check through the append; different couples never contend.
pub struct TurnValidator {
    store: Arc<dyn TurnStore>,
    couple_locks: Mutex<HashMap<CoupleId, Arc<Mutex<()>>>>,
}

impl TurnValidator {
    /// Creates a validator in front of `store`.
    #[instrument(skip(store))]
    pub fn new(store: Arc<dyn TurnStore>) -> Self {
        info!("Creating turn validator");
        Self {
            store,
            couple_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the underlying store for read access.
    pub fn store(&self) -> &Arc<dyn TurnStore> {
        &self.store
    }

    /// Returns the role allowed to send the next message.
    ///
    /// Player1 opens an empty log; afterwards the opponent of the last sender.
    #[instrument(skip(self, couple_id), fields(couple_id = %couple_id))]
    pub fn next_sender(&self, couple_id: &CoupleId) -> Result<Sender, StoreError> {
        let next = expected_after(self.store.last(couple_id)?.as_ref());
        debug!(next = %next, "Computed next sender");
        Ok(next)
    }

    /// Checks whether `sender` may send the next message for the couple.
    #[instrument(skip(self, couple_id), fields(couple_id = %couple_id))]
    pub fn can_send(&self, couple_id: &CoupleId, sender: Sender) -> Result<bool, StoreError> {
        Ok(self.next_sender(couple_id)? == sender)
    }

    /// Validates and appends a message from a raw sender role.
    ///
    /// Checks run in a fixed order: the role must parse, the text must be
    /// non-blank, and only then is turn order consulted.
    ///
    /// Leading and trailing whitespace is trimmed; the stored message holds
    /// the trimmed text.
    ///
    /// # Errors
    ///
    /// - [`TurnError::InvalidSender`] if `sender` is not `player1` or `player2`.
    /// - [`TurnError::EmptyText`] if `text` is blank.
    /// - [`TurnError::OutOfTurn`] if it is the other participant's turn.
    /// - [`TurnError::Storage`] if the store fails.
    #[instrument(skip(self, couple_id, text), fields(couple_id = %couple_id))]
    pub fn submit(
        &self,
        couple_id: &CoupleId,
        sender: &str,
        text: &str,
    ) -> Result<Message, TurnError> {
        let sender = Sender::from_str(sender).map_err(|_| {
            warn!(sender, "Rejected unknown sender role");
            TurnError::InvalidSender(sender.to_string())
        })?;
        self.submit_as(couple_id, sender, text)
    }

    /// Validates and appends a message from a known role.
    ///
    /// # Errors
    ///
    /// Same as [`TurnValidator::submit`], minus `InvalidSender`.
    #[instrument(skip(self, couple_id, sender, text), fields(couple_id = %couple_id, sender = %sender))]
    pub fn submit_as(
        &self,
        couple_id: &CoupleId,
        sender: Sender,
        text: &str,
    ) -> Result<Message, TurnError> {
        let text = text.trim();
        if text.is_empty() {
            warn!("Rejected empty message");
            return Err(TurnError::EmptyText);
        }

        let couple_lock = self.couple_lock(couple_id);
        let _turn = couple_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let previous = self.store.last(couple_id)?;
        let expected = expected_after(previous.as_ref());
        if expected != sender {
            warn!(expected = %expected, "Rejected out-of-turn message");
            return Err(TurnError::OutOfTurn { expected });
        }

        let message = self
            .store
            .append(couple_id, MessageDraft::new(sender, text.to_string()))?;

        #[cfg(debug_assertions)]
        audit_tail(couple_id, previous, &message);

        info!(message_id = %message.id(), "Message accepted");
        Ok(message)
    }

    /// Returns the lock serializing submissions for one couple.
    fn couple_lock(&self, couple_id: &CoupleId) -> Arc<Mutex<()>> {
        let mut locks = self
            .couple_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(couple_id.clone()).or_default())
    }
}

/// Player1 opens an empty log; afterwards the opponent of the last sender.
fn expected_after(last: Option<&Message>) -> Sender {
    last.map_or(Sender::Player1, |last| last.sender().opponent())
}

/// Checks the log's new tail. Everything before `previous` was checked when it
/// was accepted, so an opening message gets the full set and later ones only
/// the pairwise invariants.
#[cfg(debug_assertions)]
fn audit_tail(couple_id: &CoupleId, previous: Option<Message>, accepted: &Message) {
    use crate::invariants::{
        AlternatingSenderInvariant, InvariantSet, SingleCoupleInvariant, check_log,
    };

    type TailInvariants = (AlternatingSenderInvariant, SingleCoupleInvariant);

    let result = match previous {
        None => check_log(std::slice::from_ref(accepted)),
        Some(previous) => {
            let tail = [previous, accepted.clone()];
            <TailInvariants as InvariantSet<[Message]>>::check_all(&tail[..])
        }
    };

    if let Err(violations) = result {
        for violation in violations {
            warn!(
                couple_id = %couple_id,
                invariant = %violation.description,
                "Couple log invariant violated"
            );
        }
    }
}

impl std::fmt::Debug for TurnValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnValidator").finish_non_exhaustive()
    }
}
