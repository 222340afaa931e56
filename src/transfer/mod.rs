// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Transfers to Self-Custody
//!
//! - [`WalletRegistry`] - read-only view of the caller's wallets
//! - [`TransferOrchestrator`] - validate, then one platform call
//! - [`TransferForm`] / [`InFlightSubmissions`] - submission state
//! - [`history`] - newest-first projection plus a short-lived cache

pub mod form;
pub mod history;
pub mod orchestrator;
pub mod registry;

pub use form::{InFlightSubmissions, SubmissionGuard, TransferForm};
pub use history::{project_history, sort_descending, HistoryCache, HistoryEntry};
pub use orchestrator::{prepare_transfer, TransferError, TransferOrchestrator};
pub use registry::WalletRegistry;
