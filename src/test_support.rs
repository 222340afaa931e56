// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{encode, EncodingKey, Header};
use tempfile::TempDir;

use crate::acknowledgment::InMemoryAcknowledgmentStore;
use crate::backend::CustodyBackend;
use crate::state::AppState;
use crate::storage::{AuditEvent, FileStorage, StoragePaths};

/// AppState over a temp data dir, in-memory acknowledgments and no JWT
/// secret (development mode).
pub fn create_test_state(backend: Arc<dyn CustodyBackend>) -> (AppState, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut storage = FileStorage::new(StoragePaths::new(temp_dir.path()));
    storage.initialize().expect("Failed to initialize storage");

    let state = AppState::new(
        storage,
        Arc::new(InMemoryAcknowledgmentStore::new()),
        backend,
    );
    (state, temp_dir)
}

/// Unsigned JWT, accepted only in development mode.
pub fn create_test_jwt(sub: &str) -> String {
    let header = r#"{"alg":"HS256","typ":"JWT"}"#;
    let claims = format!(
        r#"{{"sub":"{sub}","iat":1609459200,"exp":9999999999,"iss":"test"}}"#
    );

    let header_b64 = URL_SAFE_NO_PAD.encode(header.as_bytes());
    let claims_b64 = URL_SAFE_NO_PAD.encode(claims.as_bytes());

    format!("{header_b64}.{claims_b64}.fake_signature")
}

/// HS256-signed JWT for production-mode tests.
pub fn sign_test_jwt(sub: &str, secret: &str, issuer: &str) -> String {
    let claims = serde_json::json!({
        "sub": sub,
        "iat": 1_609_459_200i64,
        "exp": 9_999_999_999i64,
        "iss": issuer,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign test JWT")
}

/// `Authorization` header value for `sub`.
pub fn bearer(sub: &str) -> String {
    format!("Bearer {}", create_test_jwt(sub))
}

/// Authenticated request with an optional JSON body.
pub fn authed_request(
    method: axum::http::Method,
    uri: &str,
    sub: &str,
    body: Option<serde_json::Value>,
) -> axum::http::Request<axum::body::Body> {
    let builder = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::AUTHORIZATION, bearer(sub));

    match body {
        Some(json) => builder
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(json.to_string()))
            .expect("Failed to build request"),
        None => builder
            .body(axum::body::Body::empty())
            .expect("Failed to build request"),
    }
}

/// Drain a response body into JSON.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

/// Check every acknowledgment item and commit for `sub`.
pub fn unlock(state: &AppState, sub: &str) {
    use crate::acknowledgment::{AcknowledgmentItem, CommitOutcome};
    use crate::models::Identity;

    let identity = Identity::new(sub);
    for item in AcknowledgmentItem::ALL {
        state.gate.set_item(&identity, item, true);
    }
    assert_eq!(state.gate.commit(&identity), CommitOutcome::Unlocked);
}

/// Parse the JSONL audit log for `date` (`YYYY-MM-DD`).
pub fn read_audit_events(storage: &FileStorage, date: &str) -> Vec<AuditEvent> {
    let content = std::fs::read_to_string(storage.paths().audit_events_file(date))
        .expect("Failed to read audit log");
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("Malformed audit event"))
        .collect()
}
