//! Game master presence tracking.

use crate::CoupleId;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, instrument};

/// Whether a game master is watching a couple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObserverState {
    /// No observer attached.
    #[default]
    Disconnected,
    /// An observer is attached.
    Connected,
}

/// Snapshot of the couples currently observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStatus {
    /// Number of connected couples.
    count: usize,
    /// Connected couples, sorted by id.
    couple_ids: Vec<CoupleId>,
}

/// Tracks which couples have a game master session attached.
///
/// Presence is advisory: it never gates or alters a couple's message log.
#[derive(Debug, Default)]
pub struct GameMasterRegistry {
    sessions: Mutex<BTreeMap<CoupleId, DateTime<Utc>>>,
}

impl GameMasterRegistry {
    /// Creates an empty registry; every couple starts disconnected.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating game master registry");
        Self::default()
    }

    /// Attaches an observer to the couple. Reconnecting refreshes the session.
    #[instrument(skip(self, couple_id), fields(couple_id = %couple_id))]
    pub fn connect(&self, couple_id: &CoupleId) {
        let previous = self.sessions().insert(couple_id.clone(), Utc::now());
        info!(reconnect = previous.is_some(), "Game master connected");
    }

    /// Detaches the couple's observer. Disconnecting twice is a no-op.
    #[instrument(skip(self, couple_id), fields(couple_id = %couple_id))]
    pub fn disconnect(&self, couple_id: &CoupleId) {
        match self.sessions().remove(couple_id) {
            Some(_) => info!("Game master disconnected"),
            None => debug!("Game master was not connected"),
        }
    }

    /// Returns the couple's presence state.
    #[instrument(skip(self, couple_id), fields(couple_id = %couple_id))]
    pub fn state(&self, couple_id: &CoupleId) -> ObserverState {
        if self.sessions().contains_key(couple_id) {
            ObserverState::Connected
        } else {
            ObserverState::Disconnected
        }
    }

    /// Returns `true` if an observer is attached to the couple.
    pub fn is_connected(&self, couple_id: &CoupleId) -> bool {
        self.state(couple_id) == ObserverState::Connected
    }

    /// Returns when the couple's current session was opened.
    pub fn connected_at(&self, couple_id: &CoupleId) -> Option<DateTime<Utc>> {
        self.sessions().get(couple_id).copied()
    }

    /// Snapshots connected couples, sorted by id.
    #[instrument(skip(self))]
    pub fn status(&self) -> RegistryStatus {
        let couple_ids: Vec<CoupleId> = self.sessions().keys().cloned().collect();
        debug!(count = couple_ids.len(), "Game master status");
        RegistryStatus {
            count: couple_ids.len(),
            couple_ids,
        }
    }

    // The map holds no cross-entry invariants, so a poisoned lock is still usable.
    fn sessions(&self) -> std::sync::MutexGuard<'_, BTreeMap<CoupleId, DateTime<Utc>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_disconnected() {
        let registry = GameMasterRegistry::new();
        assert_eq!(registry.state(&"C1".into()), ObserverState::Disconnected);
        assert_eq!(*registry.status().count(), 0);
    }

    #[test]
    fn test_connect_then_disconnect() {
        let registry = GameMasterRegistry::new();
        let couple = CoupleId::from("C2");

        registry.connect(&couple);
        assert!(registry.is_connected(&couple));
        assert!(registry.connected_at(&couple).is_some());
        let status = registry.status();
        assert_eq!(*status.count(), 1);
        assert_eq!(status.couple_ids(), &vec![couple.clone()]);

        registry.disconnect(&couple);
        assert!(!registry.is_connected(&couple));
        assert!(registry.connected_at(&couple).is_none());
        assert_eq!(*registry.status().count(), 0);
        assert!(registry.status().couple_ids().is_empty());
    }

    #[test]
    fn test_connect_is_idempotent() {
        let registry = GameMasterRegistry::new();
        let couple = CoupleId::from("C1");
        registry.connect(&couple);
        registry.connect(&couple);
        let status = registry.status();
        assert_eq!(*status.count(), 1);
        assert_eq!(
            status.couple_ids().iter().filter(|id| **id == couple).count(),
            1
        );
    }

    #[test]
    fn test_disconnect_unknown_is_noop() {
        let registry = GameMasterRegistry::new();
        registry.disconnect(&CoupleId::from("ghost"));
        registry.disconnect(&CoupleId::from("ghost"));
        assert_eq!(*registry.status().count(), 0);
    }

    #[test]
    fn test_status_is_sorted() {
        let registry = GameMasterRegistry::new();
        for id in ["b", "c", "a"] {
            registry.connect(&CoupleId::from(id));
        }
        let status = registry.status();
        let ids: Vec<&str> = status
            .couple_ids()
            .iter()
            .map(CoupleId::as_str)
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_status_serializes_camel_case() {
        let registry = GameMasterRegistry::new();
        registry.connect(&CoupleId::from("C2"));
        let json = serde_json::to_value(registry.status()).unwrap();
        assert_eq!(json, serde_json::json!({ "count": 1, "coupleIds": ["C2"] }));
    }
}
