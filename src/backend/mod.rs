// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Custody Backend Port
//!
//! Wallet storage, key generation, balances and transfer persistence all live
//! in the platform backend. This module defines the port the rest of the crate
//! talks to, plus the HTTP adapter used in production.
//!
//! Every call is scoped to a [`Caller`]: the authenticated identity plus the
//! bearer credential forwarded to the platform.

use async_trait::async_trait;

use crate::models::{
    GeneratedWallet, Identity, SelfCustodyTransfer, SelfCustodyWallet, TransferReceipt,
    TransferRequest,
};

pub mod http;
#[cfg(test)]
pub mod memory;

pub use http::HttpCustodyBackend;

/// Authenticated principal on whose behalf a backend call is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub identity: Identity,
    /// Raw bearer token, forwarded as-is
    pub credential: String,
}

impl Caller {
    pub fn new(identity: Identity, credential: impl Into<String>) -> Self {
        Self {
            identity,
            credential: credential.into(),
        }
    }
}

/// Failure reported by (or while reaching) the platform backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The platform answered and refused the request.
    #[error("{0}")]
    Rejected(String),

    /// The platform could not be reached.
    #[error("custody backend unavailable: {0}")]
    Unavailable(String),

    /// The platform answered with something we could not decode.
    #[error("invalid response from custody backend: {0}")]
    InvalidResponse(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Operations the platform backend exposes for self-custody.
#[async_trait]
pub trait CustodyBackend: Send + Sync {
    /// Ask the platform to generate a new self-custody address.
    async fn generate_self_custody_wallet(&self, caller: &Caller) -> BackendResult<GeneratedWallet>;

    async fn list_self_custody_wallets(&self, caller: &Caller)
        -> BackendResult<Vec<SelfCustodyWallet>>;

    /// Caller's platform (custodial) balance in satoshis.
    async fn get_caller_balance(&self, caller: &Caller) -> BackendResult<u64>;

    /// Create a transfer record. The platform assigns id and status.
    async fn create_self_custody_transfer(
        &self,
        caller: &Caller,
        request: &TransferRequest,
    ) -> BackendResult<TransferReceipt>;

    async fn list_self_custody_transfer_history(
        &self,
        caller: &Caller,
    ) -> BackendResult<Vec<SelfCustodyTransfer>>;
}
