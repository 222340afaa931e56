// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::HeaderName,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    acknowledgment::{AcknowledgmentItem, AcknowledgmentState, GateStatus},
    models::{GeneratedWallet, SelfCustodyWallet, TransferConfirmation, TransferStatus},
    state::AppState,
    transfer::HistoryEntry,
};

pub mod acknowledgments;
pub mod balance;
pub mod health;
pub mod transfers;
pub mod wallets;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route(
            "/acknowledgments",
            get(acknowledgments::get_status).delete(acknowledgments::reset),
        )
        .route(
            "/acknowledgments/items/{item}",
            put(acknowledgments::set_item),
        )
        .route("/acknowledgments/commit", post(acknowledgments::commit))
        .route("/balance", get(balance::get_balance))
        .route(
            "/self-custody/wallets",
            get(wallets::list_wallets).post(wallets::generate_wallet),
        )
        .route(
            "/self-custody/transfers",
            get(transfers::list_transfers).post(transfers::create_transfer),
        );

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .layer(CorsLayer::permissive())
}

/// Registers the `bearer_auth` scheme referenced by the handlers.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        acknowledgments::get_status,
        acknowledgments::set_item,
        acknowledgments::commit,
        acknowledgments::reset,
        balance::get_balance,
        wallets::list_wallets,
        wallets::generate_wallet,
        transfers::create_transfer,
        transfers::list_transfers
    ),
    components(
        schemas(
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            acknowledgments::AcknowledgmentStatusResponse,
            acknowledgments::SetItemRequest,
            AcknowledgmentItem,
            AcknowledgmentState,
            GateStatus,
            balance::BalanceResponse,
            wallets::WalletListResponse,
            SelfCustodyWallet,
            GeneratedWallet,
            transfers::CreateTransferRequest,
            transfers::TransferHistoryResponse,
            TransferConfirmation,
            TransferStatus,
            HistoryEntry
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Acknowledgments", description = "Self-custody security acknowledgment gate"),
        (name = "Balance", description = "Platform balance"),
        (name = "Self-Custody", description = "Self-custody wallets and transfers")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::InMemoryCustodyBackend;
    use crate::test_support::create_test_state;
    use axum::{body::Body, http::Request, http::StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_is_public_and_carries_request_id() {
        let (state, _temp_dir) = create_test_state(Arc::new(InMemoryCustodyBackend::new()));

        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn v1_routes_require_auth() {
        let (state, _temp_dir) = create_test_state(Arc::new(InMemoryCustodyBackend::new()));
        let app = router(state);

        for uri in [
            "/v1/acknowledgments",
            "/v1/balance",
            "/v1/self-custody/wallets",
            "/v1/self-custody/transfers",
        ] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[test]
    fn openapi_lists_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(doc.paths.paths.contains_key("/v1/self-custody/transfers"));
    }
}
