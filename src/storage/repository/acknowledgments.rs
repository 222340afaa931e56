// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! File-backed acknowledgment store.
//!
//! Each identity gets one JSON record under `acknowledgments/`. The file name
//! is the SHA-256 of the storage key, so arbitrary identity strings (slashes,
//! dots, unicode) never reach the filesystem as path components.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::acknowledgment::{AcknowledgmentStore, StoreError};

use super::super::{FileStorage, StorageError, StorageResult};

/// Persisted acknowledgment record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredAcknowledgment {
    /// Full storage key (`self-custody-ack:{identity}`)
    pub key: String,
    pub unlocked: bool,
    pub updated_at: DateTime<Utc>,
}

fn key_hash(key: &str) -> String {
    format!("{:x}", Sha256::digest(key.as_bytes()))
}

impl From<StorageError> for StoreError {
    fn from(e: StorageError) -> Self {
        StoreError(e.to_string())
    }
}

/// [`AcknowledgmentStore`] writing one JSON file per identity.
#[derive(Debug, Clone)]
pub struct FileAcknowledgmentStore {
    storage: FileStorage,
}

impl FileAcknowledgmentStore {
    /// `storage` must already be initialized.
    pub fn new(storage: FileStorage) -> Self {
        Self { storage }
    }

    /// Read the full record for a key.
    pub fn get(&self, key: &str) -> StorageResult<Option<StoredAcknowledgment>> {
        let path = self.storage.paths().acknowledgment(&key_hash(key));
        if !self.storage.exists(&path) {
            return Ok(None);
        }

        let record: StoredAcknowledgment = self.storage.read_json(path)?;
        if record.key != key {
            return Err(StorageError::IntegrityViolation(format!(
                "acknowledgment record key mismatch for {key}"
            )));
        }
        Ok(Some(record))
    }
}

impl AcknowledgmentStore for FileAcknowledgmentStore {
    fn load(&self, key: &str) -> Result<Option<bool>, StoreError> {
        Ok(self.get(key)?.map(|record| record.unlocked))
    }

    fn save(&self, key: &str, unlocked: bool) -> Result<(), StoreError> {
        let record = StoredAcknowledgment {
            key: key.to_string(),
            unlocked,
            updated_at: Utc::now(),
        };
        self.storage
            .write_json(self.storage.paths().acknowledgment(&key_hash(key)), &record)?;
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        let path = self.storage.paths().acknowledgment(&key_hash(key));
        if !self.storage.exists(&path) {
            return Ok(());
        }
        self.storage.delete(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::acknowledgment::{
        storage_key, AcknowledgmentGate, AcknowledgmentItem, CommitOutcome,
    };
    use crate::models::Identity;
    use crate::storage::StoragePaths;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStorage) {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(StoragePaths::new(temp.path()));
        storage.initialize().unwrap();
        (temp, storage)
    }

    #[test]
    fn load_missing_key_is_none() {
        let (_temp, storage) = setup();
        let store = FileAcknowledgmentStore::new(storage);

        assert_eq!(store.load("self-custody-ack:nobody").unwrap(), None);
    }

    #[test]
    fn save_load_clear() {
        let (_temp, storage) = setup();
        let store = FileAcknowledgmentStore::new(storage);
        let key = storage_key(&Identity::new("user_1"));

        store.save(&key, true).unwrap();
        assert_eq!(store.load(&key).unwrap(), Some(true));
        assert_eq!(store.get(&key).unwrap().unwrap().key, key);

        store.clear(&key).unwrap();
        assert_eq!(store.load(&key).unwrap(), None);
        // Clearing twice is fine.
        store.clear(&key).unwrap();
    }

    #[test]
    fn awkward_identities_stay_inside_the_data_dir() {
        let (_temp, storage) = setup();
        let store = FileAcknowledgmentStore::new(storage.clone());
        let key = storage_key(&Identity::new("../../etc/passwd"));

        store.save(&key, true).unwrap();

        let files: Vec<String> = std::fs::read_dir(storage.paths().acknowledgments_dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].len(), 64 + ".json".len());
        assert_eq!(store.load(&key).unwrap(), Some(true));
    }

    #[test]
    fn gate_unlock_survives_process_restart() {
        let (temp, storage) = setup();
        let alice = Identity::new("alice");

        {
            let gate = AcknowledgmentGate::new(Arc::new(FileAcknowledgmentStore::new(storage)));
            for item in AcknowledgmentItem::ALL {
                gate.set_item(&alice, item, true);
            }
            assert_eq!(gate.commit(&alice), CommitOutcome::Unlocked);
        }

        // Fresh storage handle over the same directory.
        let mut reopened = FileStorage::new(StoragePaths::new(temp.path()));
        reopened.initialize().unwrap();
        let gate = AcknowledgmentGate::new(Arc::new(FileAcknowledgmentStore::new(reopened)));

        assert!(gate.is_unlocked(&alice));
        assert!(!gate.is_unlocked(&Identity::new("bob")));
    }

    #[test]
    fn corrupt_record_reads_as_error() {
        let (_temp, storage) = setup();
        let key = storage_key(&Identity::new("alice"));
        std::fs::write(storage.paths().acknowledgment(&key_hash(&key)), b"{not json").unwrap();

        let store = FileAcknowledgmentStore::new(storage);
        assert!(store.load(&key).is_err());
    }
}
