// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfers from the platform balance to the caller's self-custody wallets.
//!
//! ## Submission Flow
//!
//! 1. Gate must be unlocked ([`Acknowledged`])
//! 2. At most one submission in flight per identity (409 otherwise)
//! 3. Wallets and balance are loaded concurrently; either failing refuses
//!    the submission (503)
//! 4. [`TransferOrchestrator`] validates and makes exactly one platform call
//! 5. The cached history is dropped so the new Pending record shows up

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    audit_log,
    auth::{Acknowledged, Auth},
    backend::BackendError,
    error::ApiError,
    models::TransferConfirmation,
    state::AppState,
    storage::{AuditEvent, AuditEventType},
    transfer::{project_history, HistoryEntry, TransferError, TransferForm, TransferOrchestrator},
};

/// Transfer form as submitted by the wallet UI.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransferRequest {
    /// BTC amount as typed, e.g. `"0.015"`. Up to 8 decimals.
    pub amount: String,
    /// One of the caller's self-custody addresses.
    pub destination: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferHistoryResponse {
    /// Newest first.
    pub transfers: Vec<HistoryEntry>,
    pub total: usize,
}

fn not_loaded(what: &str, error: BackendError) -> ApiError {
    tracing::warn!(error = %error, "Could not load {what} for transfer");
    ApiError::service_unavailable(format!(
        "Your {what} could not be loaded, please try again"
    ))
}

/// Submit a transfer to one of the caller's self-custody wallets.
#[utoipa::path(
    post,
    path = "/v1/self-custody/transfers",
    tag = "Self-Custody",
    security(("bearer_auth" = [])),
    request_body = CreateTransferRequest,
    responses(
        (status = 201, description = "Transfer created", body = TransferConfirmation),
        (status = 400, description = "Invalid amount or destination"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Acknowledgment required"),
        (status = 409, description = "A transfer is already being submitted"),
        (status = 422, description = "No self-custody wallets"),
        (status = 502, description = "Platform rejected the transfer"),
        (status = 503, description = "Wallets or balance unavailable")
    )
)]
pub async fn create_transfer(
    Acknowledged(user): Acknowledged,
    State(state): State<AppState>,
    Json(request): Json<CreateTransferRequest>,
) -> Result<(StatusCode, Json<TransferConfirmation>), ApiError> {
    let _guard = state
        .submissions
        .try_acquire(&user.identity)
        .ok_or(TransferError::SubmissionInFlight)?;

    let caller = user.caller();
    let (wallets, balance) = tokio::join!(
        state.backend.list_self_custody_wallets(&caller),
        state.backend.get_caller_balance(&caller),
    );
    let wallets = wallets.map_err(|e| not_loaded("wallets", e))?;
    let balance = balance.map_err(|e| not_loaded("balance", e))?;

    let mut form = TransferForm::new(request.amount, request.destination);
    let orchestrator = TransferOrchestrator::new(state.backend.as_ref(), &caller);

    match orchestrator
        .submit_form(&mut form, Some(balance), &wallets)
        .await
    {
        Ok(confirmation) => {
            state.history_cache.invalidate(&user.identity);
            audit_log!(
                &state.storage,
                AuditEvent::new(AuditEventType::TransferSubmitted)
                    .with_user(user.identity.as_str())
                    .with_resource("transfer", &confirmation.transfer_id)
                    .with_details(serde_json::json!({
                        "destination": confirmation.destination,
                        "amountSatoshis": confirmation.amount_satoshis,
                    }))
            );
            Ok((StatusCode::CREATED, Json(confirmation)))
        }
        Err(e) => {
            audit_log!(
                &state.storage,
                AuditEvent::new(AuditEventType::TransferRejected)
                    .with_user(user.identity.as_str())
                    .with_details(serde_json::json!({
                        "destination": form.destination,
                        "amount": form.amount,
                    }))
                    .failed(e.to_string())
            );
            Err(e.into())
        }
    }
}

/// Self-custody transfer history, newest first.
#[utoipa::path(
    get,
    path = "/v1/self-custody/transfers",
    tag = "Self-Custody",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Transfer history", body = TransferHistoryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Platform unavailable")
    )
)]
pub async fn list_transfers(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<TransferHistoryResponse>, ApiError> {
    let transfers = match state.history_cache.get(&user.identity) {
        Some(cached) => cached,
        None => {
            let fetched = state
                .backend
                .list_self_custody_transfer_history(&user.caller())
                .await
                .map_err(|e| {
                    tracing::warn!(identity = %user.identity, error = %e, "Transfer history failed");
                    ApiError::from(e)
                })?;
            state.history_cache.put(&user.identity, fetched.clone());
            fetched
        }
    };

    let entries = project_history(&transfers, Utc::now(), state.pending_stale_after);
    Ok(Json(TransferHistoryResponse {
        total: entries.len(),
        transfers: entries,
    }))
}
