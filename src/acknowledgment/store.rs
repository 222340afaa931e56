// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Persistence port for the acknowledgment gate.
//!
//! The gate only ever persists one boolean per identity. Backends:
//!
//! - [`crate::storage::FileAcknowledgmentStore`] - one JSON file per identity
//! - [`crate::storage::RedbAcknowledgmentStore`] - embedded redb table
//! - [`InMemoryAcknowledgmentStore`] - process-local, for tests and dev

use std::collections::HashMap;
use std::sync::RwLock;

use crate::models::Identity;

/// Prefix of every persisted acknowledgment key.
pub const ACK_KEY_PREFIX: &str = "self-custody-ack:";

/// Derive the storage key for an identity.
pub fn storage_key(identity: &Identity) -> String {
    format!("{ACK_KEY_PREFIX}{identity}")
}

/// Persistence failure. The gate treats every failure as "locked".
#[derive(Debug, thiserror::Error)]
#[error("acknowledgment store unavailable: {0}")]
pub struct StoreError(pub String);

/// Durable per-identity key-value storage for the unlocked flag.
pub trait AcknowledgmentStore: Send + Sync {
    /// Persisted flag for `key`, `None` if never written.
    fn load(&self, key: &str) -> Result<Option<bool>, StoreError>;

    /// Persist the flag for `key`.
    fn save(&self, key: &str, unlocked: bool) -> Result<(), StoreError>;

    /// Remove any persisted flag for `key`.
    fn clear(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryAcknowledgmentStore {
    entries: RwLock<HashMap<String, bool>>,
}

impl InMemoryAcknowledgmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AcknowledgmentStore for InMemoryAcknowledgmentStore {
    fn load(&self, key: &str) -> Result<Option<bool>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError("lock poisoned".to_string()))?;
        Ok(entries.get(key).copied())
    }

    fn save(&self, key: &str, unlocked: bool) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError("lock poisoned".to_string()))?;
        entries.insert(key.to_string(), unlocked);
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError("lock poisoned".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_is_prefixed() {
        let key = storage_key(&Identity::new("user_1"));
        assert_eq!(key, "self-custody-ack:user_1");
    }

    #[test]
    fn in_memory_store_round_trip() {
        let store = InMemoryAcknowledgmentStore::new();
        assert_eq!(store.load("k").unwrap(), None);

        store.save("k", true).unwrap();
        assert_eq!(store.load("k").unwrap(), Some(true));

        store.clear("k").unwrap();
        assert_eq!(store.load("k").unwrap(), None);
    }
}
