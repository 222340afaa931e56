// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent state for the gateway. The only durable business fact is the
//! per-identity acknowledgment flag; everything else (wallets, balances,
//! transfers) lives in the custody backend.
//!
//! ## Storage Layout
//!
//! ```text
//! /data/
//!   acknowledgments/
//!     {sha256(key)}.json       # ACK_STORE=file
//!   acknowledgments.redb       # ACK_STORE=redb
//!   audit/
//!     {date}/events.jsonl      # Daily audit logs
//! ```

pub mod ack_database;
pub mod audit;
pub mod file_storage;
pub mod paths;
pub mod repository;

pub use ack_database::{AckDbError, RedbAcknowledgmentStore};
pub use audit::{AuditEvent, AuditEventType, AuditRepository};
pub use file_storage::{FileStorage, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{FileAcknowledgmentStore, StoredAcknowledgment};
