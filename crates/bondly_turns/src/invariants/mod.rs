//! First-class invariants over a couple's message log.
//!
//! Invariants are logical properties that must hold for every log the
//! validator produces. They are testable independently and document the
//! guarantees of the exchange.

use crate::Message;

/// A logical property that must hold for a given state.
pub trait Invariant<S: ?Sized> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implementations are provided for tuples.
pub trait InvariantSet<S: ?Sized> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    S: ?Sized,
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    S: ?Sized,
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

mod alternating_sender;
mod first_sender;
mod single_couple;

pub use alternating_sender::AlternatingSenderInvariant;
pub use first_sender::FirstSenderInvariant;
pub use single_couple::SingleCoupleInvariant;

/// Every invariant a couple's log must satisfy.
pub type CoupleLogInvariants = (
    FirstSenderInvariant,
    AlternatingSenderInvariant,
    SingleCoupleInvariant,
);

/// Checks a log against [`CoupleLogInvariants`].
pub fn check_log(log: &[Message]) -> Result<(), Vec<InvariantViolation>> {
    CoupleLogInvariants::check_all(log)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{CoupleId, Message, MessageId, Sender};
    use chrono::Utc;

    /// Builds a log for `couple` with the given sender sequence.
    pub fn log_of(couple: &str, senders: &[Sender]) -> Vec<Message> {
        senders
            .iter()
            .enumerate()
            .map(|(i, sender)| {
                Message::new(
                    MessageId::from(i as u64 + 1),
                    format!("message {}", i + 1),
                    *sender,
                    Utc::now(),
                    CoupleId::from(couple),
                )
            })
            .collect()
    }
}
