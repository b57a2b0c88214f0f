//! Alternating sender invariant: player1, player2, player1, ...

use super::Invariant;
use crate::Message;

/// Invariant: adjacent messages never share a sender.
pub struct AlternatingSenderInvariant;

impl Invariant<[Message]> for AlternatingSenderInvariant {
    fn holds(log: &[Message]) -> bool {
        log.windows(2).all(|pair| pair[0].sender() != pair[1].sender())
    }

    fn description() -> &'static str {
        "Senders alternate (player1, player2, player1, ...)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sender::{Player1, Player2};
    use crate::invariants::test_support::log_of;

    #[test]
    fn test_empty_log_holds() {
        assert!(AlternatingSenderInvariant::holds(&log_of("C1", &[])[..]));
    }

    #[test]
    fn test_single_message_holds() {
        assert!(AlternatingSenderInvariant::holds(&log_of("C1", &[Player2])[..]));
    }

    #[test]
    fn test_alternating_sequence_holds() {
        let log = log_of("C1", &[Player1, Player2, Player1, Player2, Player1]);
        assert!(AlternatingSenderInvariant::holds(&log[..]));
    }

    #[test]
    fn test_same_sender_twice_violates() {
        let log = log_of("C1", &[Player1, Player2, Player2]);
        assert!(!AlternatingSenderInvariant::holds(&log[..]));
    }
}
