// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Plain filesystem storage under the data root.
//!
//! JSON records are written to a sibling `.tmp` file and renamed into place,
//! so a reader sees either the old record or the new one.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::StoragePaths;

const HEALTH_MARKER: &str = ".health_check";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage not initialized")]
    NotInitialized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[source] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),
}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(e.to_string()),
            _ => StorageError::Io(e),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Filesystem storage rooted at [`StoragePaths::root`].
///
/// Every operation except [`FileStorage::exists`] refuses to run before
/// [`FileStorage::initialize`] has created the directory layout.
#[derive(Debug, Clone)]
pub struct FileStorage {
    paths: StoragePaths,
    initialized: bool,
}

impl FileStorage {
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            paths,
            initialized: false,
        }
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Create the acknowledgment and audit directories. Idempotent.
    pub fn initialize(&mut self) -> StorageResult<()> {
        fs::create_dir_all(self.paths.acknowledgments_dir())?;
        fs::create_dir_all(self.paths.audit_dir())?;
        self.initialized = true;
        Ok(())
    }

    fn ensure_initialized(&self) -> StorageResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(StorageError::NotInitialized)
        }
    }

    /// Round-trip a marker file through the data root. Backs `/health/ready`.
    pub fn health_check(&self) -> StorageResult<()> {
        self.ensure_initialized()?;

        let marker = self.paths.root().join(HEALTH_MARKER);
        let expected = HEALTH_MARKER.as_bytes();

        fs::write(&marker, expected)?;
        let found = fs::read(&marker);
        fs::remove_file(&marker)?;

        if found? != expected {
            return Err(StorageError::IntegrityViolation(
                "health marker read back differently".to_string(),
            ));
        }
        Ok(())
    }

    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StorageResult<T> {
        self.ensure_initialized()?;
        let reader = BufReader::new(File::open(path.as_ref())?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Replace the file at `path` with `value`, creating parent directories.
    pub fn write_json<T: Serialize>(&self, path: impl AsRef<Path>, value: &T) -> StorageResult<()> {
        self.ensure_initialized()?;
        let path = path.as_ref();
        create_parent(path)?;

        let staged = path.with_extension("tmp");
        let mut writer = BufWriter::new(File::create(&staged)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        drop(writer);

        fs::rename(&staged, path)?;
        Ok(())
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().is_file()
    }

    pub fn delete(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        self.ensure_initialized()?;
        fs::remove_file(path.as_ref())?;
        Ok(())
    }

    /// Append `data` to the file at `path`, creating it if needed.
    pub fn append_raw(&self, path: impl AsRef<Path>, data: &[u8]) -> StorageResult<()> {
        self.ensure_initialized()?;
        let path = path.as_ref();
        create_parent(path)?;

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(data)?;
        file.flush()?;
        Ok(())
    }
}

fn create_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    fn test_storage() -> (TempDir, FileStorage) {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(StoragePaths::new(temp.path()));
        storage
            .initialize()
            .expect("Failed to initialize test storage");
        (temp, storage)
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Record {
        identity: String,
        unlocked: bool,
    }

    fn record(identity: &str) -> Record {
        Record {
            identity: identity.to_string(),
            unlocked: true,
        }
    }

    #[test]
    fn initialize_creates_directories() {
        let (_temp, storage) = test_storage();

        assert!(storage.paths().acknowledgments_dir().is_dir());
        assert!(storage.paths().audit_dir().is_dir());
    }

    #[test]
    fn write_json_replaces_and_leaves_no_staging_file() {
        let (_temp, storage) = test_storage();
        let path = storage.paths().acknowledgment("alice");

        storage.write_json(&path, &record("alice")).unwrap();
        storage
            .write_json(
                &path,
                &Record {
                    identity: "alice".to_string(),
                    unlocked: false,
                },
            )
            .unwrap();

        let read: Record = storage.read_json(&path).unwrap();
        assert!(!read.unlocked);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn append_raw_accumulates() {
        let (_temp, storage) = test_storage();
        let path = storage.paths().audit_events_file("2026-01-01");

        storage.append_raw(&path, b"one\n").unwrap();
        storage.append_raw(&path, b"two\n").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"one\ntwo\n");
    }

    #[test]
    fn health_check_cleans_up_marker() {
        let (_temp, storage) = test_storage();
        storage.health_check().expect("Health check should pass");
        assert!(!storage.paths().root().join(HEALTH_MARKER).exists());
    }

    #[test]
    fn delete_removes_record() {
        let (_temp, storage) = test_storage();
        let path = storage.paths().acknowledgment("bob");
        storage.write_json(&path, &record("bob")).unwrap();

        assert!(storage.exists(&path));
        storage.delete(&path).unwrap();
        assert!(!storage.exists(&path));
        assert!(matches!(
            storage.delete(&path),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn missing_file_is_not_found() {
        let (_temp, storage) = test_storage();
        let result = storage.read_json::<Record>(storage.paths().acknowledgment("nope"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn uninitialized_storage_refuses_work() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::new(StoragePaths::new(temp.path()));
        let path = storage.paths().acknowledgment("alice");

        assert!(matches!(
            storage.read_json::<Record>(&path),
            Err(StorageError::NotInitialized)
        ));
        assert!(matches!(
            storage.write_json(&path, &record("alice")),
            Err(StorageError::NotInitialized)
        ));
        assert!(matches!(
            storage.append_raw(storage.paths().audit_events_file("2026-01-01"), b"x"),
            Err(StorageError::NotInitialized)
        ));
        assert!(matches!(
            storage.health_check(),
            Err(StorageError::NotInitialized)
        ));
    }
}
