// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Self-custody wallet endpoints.
//!
//! Keys are generated and held by the platform backend. Listing only needs
//! authentication; generation also needs an unlocked acknowledgment gate.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    amount, audit_log,
    auth::{Acknowledged, Auth},
    error::ApiError,
    models::{GeneratedWallet, SelfCustodyWallet},
    state::AppState,
    storage::{AuditEvent, AuditEventType},
    transfer::WalletRegistry,
};

/// The caller's self-custody wallets.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletListResponse {
    pub wallets: Vec<SelfCustodyWallet>,
    pub total: usize,
    /// Sum of the reported on-chain balances (saturating).
    pub total_balance_satoshis: u64,
    pub total_balance_display: String,
}

/// List the caller's self-custody wallets.
#[utoipa::path(
    get,
    path = "/v1/self-custody/wallets",
    tag = "Self-Custody",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Wallet list", body = WalletListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Platform unavailable")
    )
)]
pub async fn list_wallets(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<WalletListResponse>, ApiError> {
    let wallets = state
        .backend
        .list_self_custody_wallets(&user.caller())
        .await
        .map_err(|e| {
            tracing::warn!(identity = %user.identity, error = %e, "Wallet list failed");
            ApiError::from(e)
        })?;

    let registry = WalletRegistry::new(&wallets);
    let total_balance_satoshis = registry.total_balance_satoshis();
    let total = registry.len();

    Ok(Json(WalletListResponse {
        total,
        total_balance_satoshis,
        total_balance_display: amount::display_btc(total_balance_satoshis),
        wallets,
    }))
}

/// Ask the platform to generate a new self-custody address.
#[utoipa::path(
    post,
    path = "/v1/self-custody/wallets",
    tag = "Self-Custody",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Wallet generated", body = GeneratedWallet),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Acknowledgment required"),
        (status = 502, description = "Platform rejected the request"),
        (status = 503, description = "Platform unavailable")
    )
)]
pub async fn generate_wallet(
    Acknowledged(user): Acknowledged,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<GeneratedWallet>), ApiError> {
    let generated = match state
        .backend
        .generate_self_custody_wallet(&user.caller())
        .await
    {
        Ok(generated) => generated,
        Err(e) => {
            tracing::warn!(identity = %user.identity, error = %e, "Wallet generation failed");
            audit_log!(
                &state.storage,
                AuditEvent::new(AuditEventType::WalletGenerated)
                    .with_user(user.identity.as_str())
                    .failed(e.to_string())
            );
            return Err(e.into());
        }
    };

    tracing::info!(
        identity = %user.identity,
        address = %generated.address,
        "Self-custody wallet generated"
    );
    audit_log!(
        &state.storage,
        AuditEventType::WalletGenerated,
        user.identity,
        "wallet",
        &generated.address
    );

    Ok((StatusCode::CREATED, Json(generated)))
}
