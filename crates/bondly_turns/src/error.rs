//! Error types for turn submission and storage.

use derive_more::{Display, Error};
use tracing::instrument;

/// Storage failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Why a submission was rejected.
#[derive(Debug, Clone, Display, Error)]
pub enum TurnError {
    /// The sender is not one of the two recognized roles.
    #[display("Invalid sender '{}': expected player1 or player2", _0)]
    InvalidSender(#[error(not(source))] String),
    /// The sender already sent the previous message, or player2 tried to open.
    #[display("Not your turn: waiting for {}", expected)]
    OutOfTurn {
        /// Role allowed to send next.
        expected: crate::Sender,
    },
    /// The text is empty after trimming.
    #[display("Message text is empty")]
    EmptyText,
    /// The underlying store failed.
    #[display("{}", _0)]
    Storage(StoreError),
}

impl From<StoreError> for TurnError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err)
    }
}

impl TurnError {
    /// Stable tag for the error variant.
    pub fn kind(&self) -> &'static str {
        match self {
            TurnError::InvalidSender(_) => "InvalidSender",
            TurnError::OutOfTurn { .. } => "OutOfTurn",
            TurnError::EmptyText => "EmptyText",
            TurnError::Storage(_) => "Storage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_tracks_location() {
        let err = StoreError::new("boom");
        assert_eq!(err.message, "boom");
        assert!(err.file.ends_with("error.rs"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_store_error_converts_to_turn_error() {
        let err: TurnError = StoreError::new("disk gone").into();
        assert_eq!(err.kind(), "Storage");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(TurnError::InvalidSender("x".into()).kind(), "InvalidSender");
        assert_eq!(
            TurnError::OutOfTurn {
                expected: crate::Sender::Player2
            }
            .kind(),
            "OutOfTurn"
        );
        assert_eq!(TurnError::EmptyText.kind(), "EmptyText");
    }
}
