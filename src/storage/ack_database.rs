// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded acknowledgment database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `acknowledgments`: storage key → serialized [`StoredAcknowledgment`]

use std::path::Path;

use chrono::Utc;
use redb::{Database, ReadableDatabase, TableDefinition};

use crate::acknowledgment::{AcknowledgmentStore, StoreError};

use super::repository::StoredAcknowledgment;

/// Storage key → serialized StoredAcknowledgment (JSON bytes).
const ACKNOWLEDGMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("acknowledgments");

#[derive(Debug, thiserror::Error)]
pub enum AckDbError {
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AckDbResult<T> = Result<T, AckDbError>;

impl From<AckDbError> for StoreError {
    fn from(e: AckDbError) -> Self {
        StoreError(e.to_string())
    }
}

/// [`AcknowledgmentStore`] over a single redb file.
pub struct RedbAcknowledgmentStore {
    db: Database,
}

impl RedbAcknowledgmentStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> AckDbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create the table so read transactions never see it missing.
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACKNOWLEDGMENTS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    pub fn get(&self, key: &str) -> AckDbResult<Option<StoredAcknowledgment>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACKNOWLEDGMENTS)?;
        match table.get(key)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn put(&self, record: &StoredAcknowledgment) -> AckDbResult<()> {
        let json = serde_json::to_vec(record)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ACKNOWLEDGMENTS)?;
            table.insert(record.key.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> AckDbResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ACKNOWLEDGMENTS)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

impl AcknowledgmentStore for RedbAcknowledgmentStore {
    fn load(&self, key: &str) -> Result<Option<bool>, StoreError> {
        Ok(self.get(key)?.map(|record| record.unlocked))
    }

    fn save(&self, key: &str, unlocked: bool) -> Result<(), StoreError> {
        self.put(&StoredAcknowledgment {
            key: key.to_string(),
            unlocked,
            updated_at: Utc::now(),
        })?;
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.remove(key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db() -> (RedbAcknowledgmentStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = RedbAcknowledgmentStore::open(&dir.path().join("acks.redb")).unwrap();
        (db, dir)
    }

    #[test]
    fn missing_key_is_none() {
        let (db, _dir) = temp_db();
        assert_eq!(db.load("self-custody-ack:ghost").unwrap(), None);
    }

    #[test]
    fn save_load_clear() {
        let (db, _dir) = temp_db();

        db.save("self-custody-ack:alice", true).unwrap();
        assert_eq!(db.load("self-custody-ack:alice").unwrap(), Some(true));
        assert_eq!(db.load("self-custody-ack:bob").unwrap(), None);

        db.clear("self-custody-ack:alice").unwrap();
        assert_eq!(db.load("self-custody-ack:alice").unwrap(), None);
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("acks.redb");

        {
            let db = RedbAcknowledgmentStore::open(&path).unwrap();
            db.save("self-custody-ack:alice", true).unwrap();
        }

        let db = RedbAcknowledgmentStore::open(&path).unwrap();
        let record = db.get("self-custody-ack:alice").unwrap().unwrap();
        assert!(record.unlocked);
        assert_eq!(record.key, "self-custody-ack:alice");
    }
}
