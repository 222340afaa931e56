// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-only view of a caller's self-custody wallets.

use crate::models::SelfCustodyWallet;

/// Borrowed wallet list as fetched from the platform.
#[derive(Debug, Clone, Copy)]
pub struct WalletRegistry<'a> {
    wallets: &'a [SelfCustodyWallet],
}

impl<'a> WalletRegistry<'a> {
    pub fn new(wallets: &'a [SelfCustodyWallet]) -> Self {
        Self { wallets }
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    /// Exact address match.
    pub fn contains(&self, address: &str) -> bool {
        self.find(address).is_some()
    }

    pub fn find(&self, address: &str) -> Option<&'a SelfCustodyWallet> {
        self.wallets.iter().find(|w| w.address == address)
    }

    /// Sum of on-chain balances, saturating at `u64::MAX`.
    pub fn total_balance_satoshis(&self) -> u64 {
        self.wallets
            .iter()
            .fold(0u64, |acc, w| acc.saturating_add(w.balance_satoshis))
    }
}
