// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Self-custody acknowledgment endpoints.
//!
//! The checklist lives in the gate's session state; only the committed
//! (unlocked) flag is persisted.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    acknowledgment::{AcknowledgmentItem, AcknowledgmentState, CommitOutcome, GateStatus},
    audit_log,
    auth::{Auth, AuthenticatedUser},
    error::ApiError,
    state::AppState,
    storage::{AuditEvent, AuditEventType},
};

/// Gate position plus the current checklist.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgmentStatusResponse {
    pub status: GateStatus,
    pub checklist: AcknowledgmentState,
    /// Number of items confirmed (0-4).
    pub acknowledged_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetItemRequest {
    pub acknowledged: bool,
}

fn status_response(state: &AppState, user: &AuthenticatedUser) -> AcknowledgmentStatusResponse {
    let checklist = state.gate.state(&user.identity);
    AcknowledgmentStatusResponse {
        status: state.gate.status(&user.identity),
        acknowledged_count: checklist.acknowledged_count(),
        checklist,
    }
}

/// Current acknowledgment status for the caller.
#[utoipa::path(
    get,
    path = "/v1/acknowledgments",
    tag = "Acknowledgments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Gate status", body = AcknowledgmentStatusResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_status(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Json<AcknowledgmentStatusResponse> {
    Json(status_response(&state, &user))
}

/// Confirm or clear a single checklist item.
#[utoipa::path(
    put,
    path = "/v1/acknowledgments/items/{item}",
    tag = "Acknowledgments",
    security(("bearer_auth" = [])),
    params(
        ("item" = String, Path, description = "security, backup, recovery or funds")
    ),
    request_body = SetItemRequest,
    responses(
        (status = 200, description = "Updated status", body = AcknowledgmentStatusResponse),
        (status = 400, description = "Unknown item"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn set_item(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(item): Path<String>,
    Json(request): Json<SetItemRequest>,
) -> Result<Json<AcknowledgmentStatusResponse>, ApiError> {
    let item: AcknowledgmentItem = item
        .parse()
        .map_err(|e: crate::acknowledgment::UnknownItem| ApiError::bad_request(e.to_string()))?;

    state.gate.set_item(&user.identity, item, request.acknowledged);

    audit_log!(
        &state.storage,
        AuditEvent::new(AuditEventType::AcknowledgmentItemSet)
            .with_user(user.identity.as_str())
            .with_resource("acknowledgment", item.as_str())
            .with_details(serde_json::json!({ "acknowledged": request.acknowledged }))
    );

    Ok(Json(status_response(&state, &user)))
}

/// Commit the checklist. Unlocks self-custody actions once every item is
/// confirmed.
#[utoipa::path(
    post,
    path = "/v1/acknowledgments/commit",
    tag = "Acknowledgments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Gate unlocked", body = AcknowledgmentStatusResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Not every item is confirmed"),
        (status = 503, description = "Acknowledgment could not be persisted")
    )
)]
pub async fn commit(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<AcknowledgmentStatusResponse>, ApiError> {
    match state.gate.commit(&user.identity) {
        CommitOutcome::Unlocked => {
            audit_log!(
                &state.storage,
                AuditEventType::AcknowledgmentCommitted,
                user.identity,
                "acknowledgment",
                "self-custody"
            );
            Ok(Json(status_response(&state, &user)))
        }
        CommitOutcome::Incomplete => Err(ApiError::unprocessable(
            "Every acknowledgment item must be confirmed before committing",
        )),
        CommitOutcome::NotPersisted => {
            audit_log!(
                &state.storage,
                AuditEvent::new(AuditEventType::AcknowledgmentCommitted)
                    .with_user(user.identity.as_str())
                    .with_resource("acknowledgment", "self-custody")
                    .failed("acknowledgment store write failed")
            );
            Err(ApiError::service_unavailable(
                "Acknowledgment could not be saved, please try again",
            ))
        }
    }
}

/// Clear the caller's acknowledgment. Self-custody actions are locked again.
#[utoipa::path(
    delete,
    path = "/v1/acknowledgments",
    tag = "Acknowledgments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Gate reset", body = AcknowledgmentStatusResponse),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Acknowledgment store unavailable")
    )
)]
pub async fn reset(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<AcknowledgmentStatusResponse>, ApiError> {
    state.gate.reset(&user.identity).map_err(|e| {
        tracing::warn!(identity = %user.identity, error = %e, "Acknowledgment reset failed");
        ApiError::service_unavailable("Acknowledgment store unavailable")
    })?;

    audit_log!(
        &state.storage,
        AuditEventType::AcknowledgmentReset,
        user.identity,
        "acknowledgment",
        "self-custody"
    );

    Ok(Json(status_response(&state, &user)))
}
