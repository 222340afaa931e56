// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The four-item self-custody checklist.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One checklist entry the user must confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AcknowledgmentItem {
    /// The user alone is responsible for the private key.
    Security,
    /// The user has a backup of the key material.
    Backup,
    /// Lost keys cannot be recovered by the platform.
    Recovery,
    /// Funds sent to a self-custody address leave the platform's protection.
    Funds,
}

impl AcknowledgmentItem {
    pub const ALL: [AcknowledgmentItem; 4] = [
        AcknowledgmentItem::Security,
        AcknowledgmentItem::Backup,
        AcknowledgmentItem::Recovery,
        AcknowledgmentItem::Funds,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AcknowledgmentItem::Security => "security",
            AcknowledgmentItem::Backup => "backup",
            AcknowledgmentItem::Recovery => "recovery",
            AcknowledgmentItem::Funds => "funds",
        }
    }
}

impl fmt::Display for AcknowledgmentItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown checklist key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown acknowledgment item: {0}")]
pub struct UnknownItem(pub String);

impl FromStr for AcknowledgmentItem {
    type Err = UnknownItem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "security" => Ok(AcknowledgmentItem::Security),
            "backup" => Ok(AcknowledgmentItem::Backup),
            "recovery" => Ok(AcknowledgmentItem::Recovery),
            "funds" => Ok(AcknowledgmentItem::Funds),
            _ => Err(UnknownItem(s.to_string())),
        }
    }
}

/// Checklist state for one identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AcknowledgmentState {
    pub security: bool,
    pub backup: bool,
    pub recovery: bool,
    pub funds: bool,
}

impl AcknowledgmentState {
    /// Every item confirmed; used for identities whose gate is already unlocked.
    pub const fn all_acknowledged() -> Self {
        Self {
            security: true,
            backup: true,
            recovery: true,
            funds: true,
        }
    }

    pub fn get(&self, item: AcknowledgmentItem) -> bool {
        match item {
            AcknowledgmentItem::Security => self.security,
            AcknowledgmentItem::Backup => self.backup,
            AcknowledgmentItem::Recovery => self.recovery,
            AcknowledgmentItem::Funds => self.funds,
        }
    }

    /// Set exactly one field.
    pub fn set(&mut self, item: AcknowledgmentItem, value: bool) {
        let field = match item {
            AcknowledgmentItem::Security => &mut self.security,
            AcknowledgmentItem::Backup => &mut self.backup,
            AcknowledgmentItem::Recovery => &mut self.recovery,
            AcknowledgmentItem::Funds => &mut self.funds,
        };
        *field = value;
    }

    pub fn any(&self) -> bool {
        self.security || self.backup || self.recovery || self.funds
    }

    pub fn acknowledged_count(&self) -> usize {
        AcknowledgmentItem::ALL
            .iter()
            .filter(|item| self.get(**item))
            .count()
    }
}

/// True when all four items are confirmed.
pub fn is_complete(state: &AcknowledgmentState) -> bool {
    state.security && state.backup && state.recovery && state.funds
}

/// Position of an identity in the gate's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    /// Nothing acknowledged yet (or after a reset).
    Locked,
    /// Some items confirmed, gate not committed.
    PartiallyAcknowledged,
    /// All items confirmed and committed to durable storage.
    Unlocked,
}
