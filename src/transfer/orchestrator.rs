// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer submission: precondition checks, then exactly one platform call.
//!
//! ## Precondition Order
//!
//! 1. At least one self-custody wallet exists (`NoWalletsAvailable`). Amount
//!    and destination are not looked at when this fails.
//! 2. The destination is one of those wallets (`InvalidDestination`).
//! 3. The amount passes [`crate::amount::validate_amount`] (`InvalidAmount`).
//!
//! The platform call is never retried here. A failure comes back as
//! `ExternalFailure` with the platform's message untouched.

use tracing::{info, warn};

use crate::amount::{self, AmountError};
use crate::backend::{Caller, CustodyBackend};
use crate::models::{SelfCustodyWallet, TransferConfirmation, TransferRequest};

use super::{TransferForm, WalletRegistry};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("no self-custody wallets available")]
    NoWalletsAvailable,

    #[error("destination is not one of your self-custody wallets")]
    InvalidDestination,

    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("{0}")]
    ExternalFailure(String),

    #[error("a transfer is already being submitted")]
    SubmissionInFlight,
}

/// Check preconditions and build the request the platform would receive.
pub fn prepare_transfer(
    amount_input: &str,
    destination: &str,
    available_balance: Option<u64>,
    wallets: &[SelfCustodyWallet],
) -> Result<TransferRequest, TransferError> {
    let registry = WalletRegistry::new(wallets);
    if registry.is_empty() {
        return Err(TransferError::NoWalletsAvailable);
    }
    if !registry.contains(destination) {
        return Err(TransferError::InvalidDestination);
    }

    let amount_satoshis = amount::validate_amount(amount_input, available_balance)?;

    Ok(TransferRequest {
        amount_satoshis,
        destination_address: destination.to_string(),
    })
}

/// Submits transfers on behalf of one caller.
pub struct TransferOrchestrator<'a> {
    backend: &'a dyn CustodyBackend,
    caller: &'a Caller,
}

impl<'a> TransferOrchestrator<'a> {
    pub fn new(backend: &'a dyn CustodyBackend, caller: &'a Caller) -> Self {
        Self { backend, caller }
    }

    /// Validate and submit. `available_balance = None` skips the balance rule.
    pub async fn submit(
        &self,
        amount_input: &str,
        destination: &str,
        available_balance: Option<u64>,
        wallets: &[SelfCustodyWallet],
    ) -> Result<TransferConfirmation, TransferError> {
        let request = prepare_transfer(amount_input, destination, available_balance, wallets)?;

        match self
            .backend
            .create_self_custody_transfer(self.caller, &request)
            .await
        {
            Ok(receipt) => {
                info!(
                    identity = %self.caller.identity,
                    transfer_id = %receipt.transfer_id,
                    amount_satoshis = request.amount_satoshis,
                    destination = %request.destination_address,
                    "Self-custody transfer created"
                );
                Ok(TransferConfirmation {
                    transfer_id: receipt.transfer_id,
                    amount_display: amount::display_btc(request.amount_satoshis),
                    destination: request.destination_address,
                    amount_satoshis: request.amount_satoshis,
                })
            }
            Err(e) => {
                warn!(
                    identity = %self.caller.identity,
                    error = %e,
                    "Self-custody transfer creation failed"
                );
                Err(TransferError::ExternalFailure(e.to_string()))
            }
        }
    }

    /// Submit from form state.
    ///
    /// Refuses while `form.in_flight`. On success the form is cleared; on any
    /// error the typed values are kept.
    pub async fn submit_form(
        &self,
        form: &mut TransferForm,
        available_balance: Option<u64>,
        wallets: &[SelfCustodyWallet],
    ) -> Result<TransferConfirmation, TransferError> {
        let TransferForm {
            amount,
            destination,
            in_flight,
        } = &mut *form;
        if *in_flight {
            return Err(TransferError::SubmissionInFlight);
        }

        let flag = InFlightFlag::raise(in_flight);
        let result = self
            .submit(amount.as_str(), destination.as_str(), available_balance, wallets)
            .await;
        drop(flag);

        if result.is_ok() {
            form.clear();
        }
        result
    }
}

/// Keeps `TransferForm::in_flight` raised until dropped, including when the
/// submission future is.
struct InFlightFlag<'a>(&'a mut bool);

impl<'a> InFlightFlag<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlightFlag<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
