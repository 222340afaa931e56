// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer form state and per-identity in-flight tracking.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use crate::amount;
use crate::models::{Identity, SelfCustodyWallet};

use super::WalletRegistry;

/// What the user has typed into the transfer form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    pub amount: String,
    pub destination: String,
    /// Set while a submission is awaiting the platform.
    pub in_flight: bool,
}

impl TransferForm {
    pub fn new(amount: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            destination: destination.into(),
            in_flight: false,
        }
    }

    /// Back to the initial empty state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether the submit action should be enabled.
    ///
    /// `None` means "not loaded yet" for both the balance and the wallet list.
    pub fn can_submit(
        &self,
        available_balance: Option<u64>,
        wallets: Option<&[SelfCustodyWallet]>,
    ) -> bool {
        let (Some(balance), Some(wallets)) = (available_balance, wallets) else {
            return false;
        };

        !self.in_flight
            && WalletRegistry::new(wallets).contains(&self.destination)
            && amount::validate(&self.amount, Some(balance))
    }
}

/// Identities with a transfer submission currently awaiting the platform.
#[derive(Debug, Default)]
pub struct InFlightSubmissions {
    active: Mutex<HashSet<Identity>>,
}

impl InFlightSubmissions {
    pub fn new() -> Self {
        Self::default()
    }

    fn active(&self) -> MutexGuard<'_, HashSet<Identity>> {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claim the submission slot for `identity`. `None` if already taken.
    pub fn try_acquire(&self, identity: &Identity) -> Option<SubmissionGuard<'_>> {
        if !self.active().insert(identity.clone()) {
            return None;
        }
        Some(SubmissionGuard {
            owner: self,
            identity: identity.clone(),
        })
    }
}

/// Releases the slot on drop, including when the request future is dropped.
#[derive(Debug)]
pub struct SubmissionGuard<'a> {
    owner: &'a InFlightSubmissions,
    identity: Identity,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.owner.active().remove(&self.identity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BitcoinNetwork;
    use chrono::Utc;

    fn wallets() -> Vec<SelfCustodyWallet> {
        vec![SelfCustodyWallet {
            address: "tb1qdest".to_string(),
            network: BitcoinNetwork::Testnet,
            balance_satoshis: 0,
            created_at: Utc::now(),
            derivation_path: None,
        }]
    }

    #[test]
    fn cannot_submit_until_balance_and_wallets_load() {
        let form = TransferForm::new("0.1", "tb1qdest");
        let wallets = wallets();

        assert!(!form.can_submit(None, Some(&wallets)));
        assert!(!form.can_submit(Some(100_000_000), None));
        assert!(form.can_submit(Some(100_000_000), Some(&wallets)));
    }

    #[test]
    fn cannot_submit_invalid_or_in_flight() {
        let wallets = wallets();

        assert!(!TransferForm::new("abc", "tb1qdest").can_submit(Some(1), Some(&wallets)));
        assert!(!TransferForm::new("2", "tb1qdest").can_submit(Some(100_000_000), Some(&wallets)));
        assert!(!TransferForm::new("0.1", "tb1qother").can_submit(Some(u64::MAX), Some(&wallets)));

        let mut form = TransferForm::new("0.1", "tb1qdest");
        form.in_flight = true;
        assert!(!form.can_submit(Some(u64::MAX), Some(&wallets)));
    }

    #[test]
    fn clear_resets_everything() {
        let mut form = TransferForm::new("1", "tb1qdest");
        form.clear();
        assert_eq!(form, TransferForm::default());
    }

    #[test]
    fn one_submission_per_identity() {
        let submissions = InFlightSubmissions::new();
        let alice = Identity::new("alice");
        let bob = Identity::new("bob");

        let guard = submissions.try_acquire(&alice).unwrap();
        assert!(submissions.try_acquire(&alice).is_none());
        assert!(submissions.try_acquire(&bob).is_some());

        drop(guard);
        assert!(submissions.try_acquire(&alice).is_some());
        assert!(submissions.active().is_empty());
    }
}
