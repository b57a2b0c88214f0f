//! First sender invariant: player1 opens every log.

use super::Invariant;
use crate::{Message, Sender};

/// Invariant: the first message of a non-empty log is from player1.
pub struct FirstSenderInvariant;

impl Invariant<[Message]> for FirstSenderInvariant {
    fn holds(log: &[Message]) -> bool {
        log.first()
            .is_none_or(|first| *first.sender() == Sender::Player1)
    }

    fn description() -> &'static str {
        "Player1 sends the first message"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sender::{Player1, Player2};
    use crate::invariants::test_support::log_of;

    #[test]
    fn test_empty_log_holds() {
        assert!(FirstSenderInvariant::holds(&log_of("C1", &[])[..]));
    }

    #[test]
    fn test_player1_opening_holds() {
        assert!(FirstSenderInvariant::holds(&log_of("C1", &[Player1, Player2])[..]));
    }

    #[test]
    fn test_player2_opening_violates() {
        assert!(!FirstSenderInvariant::holds(&log_of("C1", &[Player2, Player1])[..]));
    }
}
