// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{amount, auth::Auth, error::ApiError, state::AppState};

/// Caller's platform (custodial) balance.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub balance_satoshis: u64,
    /// Eight decimals, e.g. `"2.50000000"`.
    pub balance_btc: String,
    /// e.g. `"2.5 BTC"`.
    pub balance_display: String,
}

impl From<u64> for BalanceResponse {
    fn from(satoshis: u64) -> Self {
        Self {
            balance_satoshis: satoshis,
            balance_btc: amount::format_btc(satoshis),
            balance_display: amount::display_btc(satoshis),
        }
    }
}

/// Platform balance available for transfers to self-custody.
#[utoipa::path(
    get,
    path = "/v1/balance",
    tag = "Balance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller balance", body = BalanceResponse),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Platform rejected the request"),
        (status = 503, description = "Platform unavailable")
    )
)]
pub async fn get_balance(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let satoshis = state
        .backend
        .get_caller_balance(&user.caller())
        .await
        .map_err(|e| {
            tracing::warn!(identity = %user.identity, error = %e, "Balance lookup failed");
            ApiError::from(e)
        })?;

    Ok(Json(satoshis.into()))
}

#[cfg(test)]
mod tests {
    use crate::api::router;
    use crate::backend::memory::InMemoryCustodyBackend;
    use crate::test_support::{authed_request, body_json, create_test_state};
    use axum::http::{Method, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn returns_formatted_balance() {
        let backend = InMemoryCustodyBackend::new().with_balance("alice", 250_000_000);
        let (state, _temp_dir) = create_test_state(Arc::new(backend));

        let response = router(state)
            .oneshot(authed_request(Method::GET, "/v1/balance", "alice", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["balanceSatoshis"], 250_000_000u64);
        assert_eq!(body["balanceBtc"], "2.50000000");
        assert_eq!(body["balanceDisplay"], "2.5 BTC");
    }

    #[tokio::test]
    async fn unavailable_balance_is_503() {
        let (state, _temp_dir) = create_test_state(Arc::new(InMemoryCustodyBackend::new()));

        let response = router(state)
            .oneshot(authed_request(Method::GET, "/v1/balance", "nobody", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
