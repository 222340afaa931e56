// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Duration;

use crate::acknowledgment::{AcknowledgmentGate, AcknowledgmentStore};
use crate::backend::CustodyBackend;
use crate::config::{DEFAULT_HISTORY_CACHE_TTL_SECS, DEFAULT_PENDING_STALE_AFTER_SECS};
use crate::storage::FileStorage;
use crate::transfer::{HistoryCache, InFlightSubmissions};

/// Identities kept in the history cache.
const HISTORY_CACHE_CAPACITY: usize = 1024;

/// JWT verification settings used by the `Auth` extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthConfig {
    /// HS256 secret. `None` selects development mode (no signature check).
    pub secret: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<FileStorage>,
    pub gate: Arc<AcknowledgmentGate>,
    pub backend: Arc<dyn CustodyBackend>,
    pub history_cache: Arc<HistoryCache>,
    pub submissions: Arc<InFlightSubmissions>,
    pub auth_config: Arc<AuthConfig>,
    pub pending_stale_after: Duration,
}

impl AppState {
    /// `storage` must already be initialized (audit log + readiness probe).
    pub fn new(
        storage: FileStorage,
        ack_store: Arc<dyn AcknowledgmentStore>,
        backend: Arc<dyn CustodyBackend>,
    ) -> Self {
        Self {
            storage: Arc::new(storage),
            gate: Arc::new(AcknowledgmentGate::new(ack_store)),
            backend,
            history_cache: Arc::new(HistoryCache::new(
                HISTORY_CACHE_CAPACITY,
                Duration::from_secs(DEFAULT_HISTORY_CACHE_TTL_SECS),
            )),
            submissions: Arc::new(InFlightSubmissions::new()),
            auth_config: Arc::new(AuthConfig::default()),
            pending_stale_after: Duration::from_secs(DEFAULT_PENDING_STALE_AFTER_SECS),
        }
    }

    pub fn with_auth_config(mut self, auth_config: AuthConfig) -> Self {
        self.auth_config = Arc::new(auth_config);
        self
    }

    pub fn with_history_cache_ttl(mut self, ttl: Duration) -> Self {
        self.history_cache = Arc::new(HistoryCache::new(HISTORY_CACHE_CAPACITY, ttl));
        self
    }

    pub fn with_pending_stale_after(mut self, threshold: Duration) -> Self {
        self.pending_stale_after = threshold;
        self
    }
}
