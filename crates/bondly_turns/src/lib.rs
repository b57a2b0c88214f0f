//! Bondly turns - the couple message exchange.
//!
//! Two participants of a couple take turns sending messages into a shared,
//! append-only log. A game master may observe a couple without taking part.
//!
//! # Architecture
//!
//! - **Store**: per-couple message logs behind the [`TurnStore`] trait
//! - **Validator**: strict alternation, player1 first ([`TurnValidator`])
//! - **Registry**: game master presence ([`GameMasterRegistry`])
//! - **Invariants**: checkable properties of a couple's log
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use bondly_turns::{CoupleId, InMemoryTurnStore, TurnError, TurnValidator};
//!
//! let validator = TurnValidator::new(Arc::new(InMemoryTurnStore::new()));
//! let couple = CoupleId::from("C1");
//!
//! validator.submit(&couple, "player1", "hi").unwrap();
//! let err = validator.submit(&couple, "player1", "again").unwrap_err();
//! assert!(matches!(err, TurnError::OutOfTurn { .. }));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod invariants;
mod registry;
mod store;
mod types;
mod validator;

pub use error::{StoreError, TurnError};
pub use registry::{GameMasterRegistry, ObserverState, RegistryStatus};
pub use store::{InMemoryTurnStore, TurnStore};
pub use types::{CoupleId, Message, MessageDraft, MessageId, Sender};
pub use validator::TurnValidator;
