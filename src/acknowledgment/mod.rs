// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Self-Custody Acknowledgment Gate
//!
//! Before a user may generate a self-custody address or move funds to one,
//! they confirm four statements (key security, backup, no platform recovery,
//! funds leave platform protection). Once all four are confirmed and
//! committed, the identity is unlocked for good; the flag is persisted so
//! later sessions do not re-prompt.

pub mod gate;
pub mod state;
pub mod store;

pub use gate::{AcknowledgmentGate, CommitOutcome};
pub use state::{is_complete, AcknowledgmentItem, AcknowledgmentState, GateStatus, UnknownItem};
pub use store::{
    storage_key, AcknowledgmentStore, InMemoryAcknowledgmentStore, StoreError, ACK_KEY_PREFIX,
};
