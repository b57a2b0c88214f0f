//! Single couple invariant: a log never mixes conversations.

use super::Invariant;
use crate::Message;

/// Invariant: every message in a log carries the same couple id.
pub struct SingleCoupleInvariant;

impl Invariant<[Message]> for SingleCoupleInvariant {
    fn holds(log: &[Message]) -> bool {
        match log.first() {
            None => true,
            Some(first) => log.iter().all(|m| m.couple_id() == first.couple_id()),
        }
    }

    fn description() -> &'static str {
        "All messages belong to one couple"
    }
}
