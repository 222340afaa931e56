// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The acknowledgment gate.
//!
//! ## State Machine
//!
//! ```text
//!            set_item(true)              all four true + commit
//! Locked ─────────────────▶ PartiallyAcknowledged ─────────────────▶ Unlocked
//!    ▲                            │                                     │
//!    └──── every item cleared ────┘                                     │
//!    └───────────────────────────── reset ──────────────────────────────┘
//! ```
//!
//! Checklist progress lives in memory for the session. Only the final
//! unlocked flag is persisted, through an [`AcknowledgmentStore`]. Reads fail
//! closed: a missing record or a store error means locked.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use crate::models::Identity;

use super::state::{is_complete, AcknowledgmentItem, AcknowledgmentState, GateStatus};
use super::store::{storage_key, AcknowledgmentStore, StoreError};

/// Result of [`AcknowledgmentGate::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Flag persisted; the identity is unlocked.
    Unlocked,
    /// Not every item is confirmed; nothing was written.
    Incomplete,
    /// The store rejected the write; the identity stays locked.
    NotPersisted,
}

/// Per-identity security acknowledgment gate.
pub struct AcknowledgmentGate {
    store: Arc<dyn AcknowledgmentStore>,
    sessions: Mutex<HashMap<Identity, AcknowledgmentState>>,
}

impl AcknowledgmentGate {
    pub fn new(store: Arc<dyn AcknowledgmentStore>) -> Self {
        Self {
            store,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<Identity, AcknowledgmentState>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// True iff the persisted flag for `identity` is set.
    pub fn is_unlocked(&self, identity: &Identity) -> bool {
        match self.store.load(&storage_key(identity)) {
            Ok(Some(unlocked)) => unlocked,
            Ok(None) => false,
            Err(e) => {
                warn!(
                    identity = %identity,
                    error = %e,
                    "Acknowledgment store read failed, treating gate as locked"
                );
                false
            }
        }
    }

    /// Current checklist for `identity`.
    ///
    /// Unseen identities read as all-false without being recorded. Unlocked
    /// identities report every item as acknowledged.
    pub fn state(&self, identity: &Identity) -> AcknowledgmentState {
        if self.is_unlocked(identity) {
            return AcknowledgmentState::all_acknowledged();
        }
        self.sessions().get(identity).copied().unwrap_or_default()
    }

    /// Set a single checklist item and return the updated checklist.
    ///
    /// No-op once unlocked. An all-false checklist is dropped from the
    /// session map.
    pub fn set_item(
        &self,
        identity: &Identity,
        item: AcknowledgmentItem,
        value: bool,
    ) -> AcknowledgmentState {
        if self.is_unlocked(identity) {
            return AcknowledgmentState::all_acknowledged();
        }

        let mut sessions = self.sessions();
        let mut state = sessions.get(identity).copied().unwrap_or_default();
        state.set(item, value);
        if state.any() {
            sessions.insert(identity.clone(), state);
        } else {
            sessions.remove(identity);
        }
        state
    }

    #[cfg(test)]
    fn session_count(&self) -> usize {
        self.sessions().len()
    }

    /// Persist the unlocked flag once every item is confirmed.
    pub fn commit(&self, identity: &Identity) -> CommitOutcome {
        if self.is_unlocked(identity) {
            return CommitOutcome::Unlocked;
        }

        let state = self.sessions().get(identity).copied().unwrap_or_default();
        if !is_complete(&state) {
            return CommitOutcome::Incomplete;
        }

        match self.store.save(&storage_key(identity), true) {
            Ok(()) => {
                self.sessions().remove(identity);
                info!(identity = %identity, "Self-custody acknowledgment committed");
                CommitOutcome::Unlocked
            }
            Err(e) => {
                warn!(
                    identity = %identity,
                    error = %e,
                    "Failed to persist acknowledgment, gate stays locked"
                );
                CommitOutcome::NotPersisted
            }
        }
    }

    /// Where `identity` sits in the state machine.
    pub fn status(&self, identity: &Identity) -> GateStatus {
        if self.is_unlocked(identity) {
            return GateStatus::Unlocked;
        }

        let any_acknowledged = self
            .sessions()
            .get(identity)
            .map(|state| state.any())
            .unwrap_or(false);

        if any_acknowledged {
            GateStatus::PartiallyAcknowledged
        } else {
            GateStatus::Locked
        }
    }

    /// Clear the persisted flag and the session checklist.
    pub fn reset(&self, identity: &Identity) -> Result<(), StoreError> {
        self.store.clear(&storage_key(identity))?;
        self.sessions().remove(identity);
        info!(identity = %identity, "Self-custody acknowledgment reset");
        Ok(())
    }
}
