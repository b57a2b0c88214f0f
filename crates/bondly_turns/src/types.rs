//! Core domain types for the couple message exchange.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_more::{Display, From};
use derive_new::new;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// One of the two participant roles in a couple.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    /// Player 1 (always opens the exchange).
    #[display("player1")]
    Player1,
    /// Player 2.
    #[display("player2")]
    Player2,
}

impl Sender {
    /// Returns the other participant.
    pub fn opponent(self) -> Self {
        match self {
            Sender::Player1 => Sender::Player2,
            Sender::Player2 => Sender::Player1,
        }
    }
}

/// Identifies the conversation a message belongs to.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct CoupleId(String);

impl CoupleId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CoupleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for CoupleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Store-assigned message identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    /// Returns the raw identifier.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A message that passed validation and is waiting to be appended.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct MessageDraft {
    /// Role sending the message.
    sender: Sender,
    /// Trimmed, non-empty content.
    text: String,
}

/// A message stored in a couple's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Assigned at append time.
    id: MessageId,
    /// Non-empty message content.
    text: String,
    /// Which participant sent the message.
    sender: Sender,
    /// When the store accepted the message.
    timestamp: DateTime<Utc>,
    /// Owning conversation.
    couple_id: CoupleId,
}
