// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer history projection and its per-identity cache.
//!
//! The platform owns transfer records and their status. This module only
//! orders them (newest first) and decorates them for display. A transfer
//! stuck in `Pending` for longer than the configured threshold is flagged
//! `stalePending`; its status is left exactly as the platform reported it.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::amount;
use crate::models::{Identity, SelfCustodyTransfer, TransferStatus};

/// Newest first by `timestamp_nanos`. Ties keep their input order.
pub fn sort_descending(transfers: &[SelfCustodyTransfer]) -> Vec<SelfCustodyTransfer> {
    let mut sorted = transfers.to_vec();
    // `sort_by` is stable.
    sorted.sort_by(|a, b| b.timestamp_nanos.cmp(&a.timestamp_nanos));
    sorted
}

/// One row of the history view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub destination: String,
    pub amount_satoshis: u64,
    /// e.g. `"0.015 BTC"`
    pub amount_display: String,
    pub timestamp_nanos: u64,
    pub status: TransferStatus,
    /// Pending for longer than the stale threshold
    pub stale_pending: bool,
}

impl HistoryEntry {
    fn from_transfer(transfer: SelfCustodyTransfer, now_nanos: u128, stale_after: Duration) -> Self {
        let age = now_nanos.saturating_sub(u128::from(transfer.timestamp_nanos));
        let stale_pending =
            transfer.status == TransferStatus::Pending && age > stale_after.as_nanos();

        Self {
            amount_display: amount::display_btc(transfer.amount_satoshis),
            id: transfer.id,
            destination: transfer.destination,
            amount_satoshis: transfer.amount_satoshis,
            timestamp_nanos: transfer.timestamp_nanos,
            status: transfer.status,
            stale_pending,
        }
    }
}

/// Sort and decorate a history as of `now`.
pub fn project_history(
    transfers: &[SelfCustodyTransfer],
    now: DateTime<Utc>,
    stale_after: Duration,
) -> Vec<HistoryEntry> {
    let now_nanos = now
        .timestamp_nanos_opt()
        .and_then(|n| u128::try_from(n).ok())
        .unwrap_or(0);

    sort_descending(transfers)
        .into_iter()
        .map(|t| HistoryEntry::from_transfer(t, now_nanos, stale_after))
        .collect()
}

struct CacheEntry {
    transfers: Vec<SelfCustodyTransfer>,
    inserted_at: Instant,
}

/// In-process LRU of the last fetched history per identity.
pub struct HistoryCache {
    cache: Mutex<LruCache<Identity, CacheEntry>>,
    ttl: Duration,
}

impl HistoryCache {
    /// - `capacity`: max number of identities kept.
    /// - `ttl`: time-to-live for each entry.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl,
        }
    }

    /// Cached history, `None` if missing or expired.
    pub fn get(&self, identity: &Identity) -> Option<Vec<SelfCustodyTransfer>> {
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(identity) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.transfers.clone());
            }
            cache.pop(identity);
        }
        None
    }

    pub fn put(&self, identity: &Identity, transfers: Vec<SelfCustodyTransfer>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                identity.clone(),
                CacheEntry {
                    transfers,
                    inserted_at: Instant::now(),
                },
            );
        }
    }

    pub fn invalidate(&self, identity: &Identity) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.pop(identity);
        }
    }
}
