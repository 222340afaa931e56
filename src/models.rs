// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Domain Models
//!
//! Data shapes shared by the gate, the transfer orchestrator, the platform
//! backend client and the HTTP API. All types serialize as `camelCase` JSON,
//! matching the platform backend's payloads.
//!
//! ## Ownership
//!
//! - [`SelfCustodyWallet`] and [`SelfCustodyTransfer`] are produced and
//!   mutated exclusively by the platform backend. This service only reads them.
//! - [`TransferRequest`] is built transiently by the orchestrator and is
//!   never persisted here.
//!
//! Every amount is an integral number of satoshis (`u64`).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Opaque principal identifier of an authenticated user.
///
/// Taken from the JWT `sub` claim. Never interpreted beyond equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct Identity(String);

impl Identity {
    pub fn new(principal: impl Into<String>) -> Self {
        Self(principal.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Bitcoin network a self-custody address belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BitcoinNetwork {
    Mainnet,
    Testnet,
    Signet,
    Regtest,
}

/// A user-held Bitcoin address, as reported by the platform backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelfCustodyWallet {
    /// Bitcoin address (the user holds its private key)
    pub address: String,
    /// Network the address is valid on
    pub network: BitcoinNetwork,
    /// On-chain balance in satoshis
    pub balance_satoshis: u64,
    /// When the backend generated the address
    pub created_at: DateTime<Utc>,
    /// BIP-32 derivation path, when the backend discloses it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivation_path: Option<String>,
}

/// Result of a wallet generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedWallet {
    /// Newly generated self-custody address
    pub address: String,
}

/// Request sent to the platform to move funds to a self-custody address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Amount in satoshis
    pub amount_satoshis: u64,
    /// One of the caller's self-custody addresses
    pub destination_address: String,
}

/// Platform acknowledgment of a created transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    /// Platform-assigned transfer identifier
    pub transfer_id: String,
}

/// Transfer status, assigned and updated by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    /// Accepted by the platform, not yet settled on-chain
    Pending,
    /// Settled on-chain
    Confirmed,
    /// Rejected or reverted
    Failed,
}

/// A historical transfer record owned by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelfCustodyTransfer {
    /// Platform-assigned transfer identifier
    pub id: String,
    /// Destination self-custody address
    pub destination: String,
    /// Amount in satoshis
    pub amount_satoshis: u64,
    /// Creation time, nanoseconds since the Unix epoch
    pub timestamp_nanos: u64,
    /// Current status
    pub status: TransferStatus,
}

/// Outcome of a successful transfer submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferConfirmation {
    /// Platform-assigned transfer identifier
    pub transfer_id: String,
    /// Destination self-custody address
    pub destination: String,
    /// Amount in satoshis
    pub amount_satoshis: u64,
    /// Human-readable amount, e.g. `"2.5 BTC"`
    pub amount_display: String,
}
