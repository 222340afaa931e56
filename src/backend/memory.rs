// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory platform fake for orchestrator and router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::{BackendError, BackendResult, Caller, CustodyBackend};
use crate::models::{
    BitcoinNetwork, GeneratedWallet, Identity, SelfCustodyTransfer, SelfCustodyWallet,
    TransferReceipt, TransferRequest, TransferStatus,
};

#[derive(Default)]
struct Account {
    balance: Option<u64>,
    wallets: Vec<SelfCustodyWallet>,
    transfers: Vec<SelfCustodyTransfer>,
}

/// Scriptable [`CustodyBackend`]. Unknown identities have no wallets and an
/// unavailable balance.
#[derive(Default)]
pub struct InMemoryCustodyBackend {
    accounts: Mutex<HashMap<Identity, Account>>,
    reject_transfers: Mutex<Option<String>>,
    wallets_unavailable: Mutex<bool>,
    transfer_delay: Mutex<Option<Duration>>,
    transfer_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl InMemoryCustodyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(self, identity: &str, satoshis: u64) -> Self {
        self.account(identity, |a| a.balance = Some(satoshis));
        self
    }

    pub fn with_wallet(self, identity: &str, address: &str) -> Self {
        let wallet = SelfCustodyWallet {
            address: address.to_string(),
            network: BitcoinNetwork::Testnet,
            balance_satoshis: 0,
            created_at: Utc::now(),
            derivation_path: None,
        };
        self.account(identity, |a| a.wallets.push(wallet));
        self
    }

    pub fn with_transfer(self, identity: &str, transfer: SelfCustodyTransfer) -> Self {
        self.account(identity, |a| a.transfers.push(transfer));
        self
    }

    /// Every subsequent transfer creation fails with `message`.
    pub fn rejecting_transfers(self, message: &str) -> Self {
        *self.reject_transfers.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn with_wallets_unavailable(self) -> Self {
        *self.wallets_unavailable.lock().unwrap() = true;
        self
    }

    /// Hold each transfer creation open for `delay`.
    pub fn with_transfer_delay(self, delay: Duration) -> Self {
        *self.transfer_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn transfer_calls(&self) -> usize {
        self.transfer_calls.load(Ordering::SeqCst)
    }

    fn account(&self, identity: &str, f: impl FnOnce(&mut Account)) {
        let mut accounts = self.accounts.lock().unwrap();
        f(accounts.entry(Identity::new(identity)).or_default());
    }
}

#[async_trait]
impl CustodyBackend for InMemoryCustodyBackend {
    async fn generate_self_custody_wallet(&self, caller: &Caller) -> BackendResult<GeneratedWallet> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let address = format!("tb1qgenerated{n}");
        self.account(caller.identity.as_str(), |a| {
            a.wallets.push(SelfCustodyWallet {
                address: address.clone(),
                network: BitcoinNetwork::Testnet,
                balance_satoshis: 0,
                created_at: Utc::now(),
                derivation_path: Some(format!("m/84'/1'/0'/0/{n}")),
            })
        });
        Ok(GeneratedWallet { address })
    }

    async fn list_self_custody_wallets(
        &self,
        caller: &Caller,
    ) -> BackendResult<Vec<SelfCustodyWallet>> {
        if *self.wallets_unavailable.lock().unwrap() {
            return Err(BackendError::Unavailable("wallet service down".to_string()));
        }
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .get(&caller.identity)
            .map(|a| a.wallets.clone())
            .unwrap_or_default())
    }

    async fn get_caller_balance(&self, caller: &Caller) -> BackendResult<u64> {
        let accounts = self.accounts.lock().unwrap();
        accounts
            .get(&caller.identity)
            .and_then(|a| a.balance)
            .ok_or_else(|| BackendError::Unavailable("balance service down".to_string()))
    }

    async fn create_self_custody_transfer(
        &self,
        caller: &Caller,
        request: &TransferRequest,
    ) -> BackendResult<TransferReceipt> {
        self.transfer_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.transfer_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.reject_transfers.lock().unwrap().clone() {
            return Err(BackendError::Rejected(message));
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let transfer_id = format!("transfer-{n}");
        let timestamp_nanos = Utc::now()
            .timestamp_nanos_opt()
            .and_then(|t| u64::try_from(t).ok())
            .unwrap_or_default();

        self.account(caller.identity.as_str(), |a| {
            a.transfers.push(SelfCustodyTransfer {
                id: transfer_id.clone(),
                destination: request.destination_address.clone(),
                amount_satoshis: request.amount_satoshis,
                timestamp_nanos,
                status: TransferStatus::Pending,
            })
        });

        Ok(TransferReceipt { transfer_id })
    }

    async fn list_self_custody_transfer_history(
        &self,
        caller: &Caller,
    ) -> BackendResult<Vec<SelfCustodyTransfer>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .get(&caller.identity)
            .map(|a| a.transfers.clone())
            .unwrap_or_default())
    }
}
