// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Self-Custody Gateway - Bitcoin self-custody transfers
//!
//! Moves funds from a user's custodial platform balance to Bitcoin addresses
//! the user holds keys for. Key generation, balances and transfer records
//! live in the platform backend; this service validates, gates and
//! orchestrates.
//!
//! ## Modules
//!
//! - `acknowledgment` - per-identity security checklist gate
//! - `amount` - BTC text to satoshi validation (integer only)
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer JWT authentication
//! - `backend` - custody platform port and HTTP adapter
//! - `storage` - acknowledgment persistence and audit log
//! - `transfer` - wallet registry, orchestration and history projection

pub mod acknowledgment;
pub mod amount;
pub mod api;
pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod storage;
pub mod transfer;

#[cfg(test)]
pub(crate) mod test_support;
