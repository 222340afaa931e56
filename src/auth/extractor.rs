// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated users.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//!
//! async fn gated_handler(Acknowledged(user): Acknowledged) -> impl IntoResponse {
//!     // user has completed the self-custody acknowledgment
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};

use super::claims::JwtClaims;
use super::{AuthError, AuthenticatedUser};
use crate::error::ApiError;
use crate::state::{AppState, AuthConfig};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Extractor for authenticated users.
///
/// ## Authentication Modes
///
/// - **Production mode** (`JWT_SECRET` set): HS256 signature, expiry, issuer
///   and audience are verified
/// - **Development mode** (no secret, `dev` builds and tests only): structure
///   and expiry only, no signature check
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        let user = verify_jwt(token, &state.auth_config)?;
        parts.extensions.insert(user.clone());

        Ok(Auth(user))
    }
}

fn verify_jwt(token: &str, auth_config: &AuthConfig) -> Result<AuthenticatedUser, AuthError> {
    let claims = match auth_config.secret {
        Some(ref secret) => verify_jwt_production(token, secret, auth_config)?,
        None => verify_jwt_development(token)?,
    };

    if claims.sub.trim().is_empty() {
        return Err(AuthError::MissingSubject);
    }

    Ok(AuthenticatedUser::from_claims(claims, token))
}

fn verify_jwt_production(
    token: &str,
    secret: &str,
    auth_config: &AuthConfig,
) -> Result<JwtClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = CLOCK_SKEW_LEEWAY;

    if let Some(ref issuer) = auth_config.issuer {
        validation.set_issuer(&[issuer]);
    }

    if let Some(ref audience) = auth_config.audience {
        validation.set_audience(&[audience]);
    } else {
        validation.validate_aud = false;
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<JwtClaims>(token, &decoding_key, &validation).map_err(|e| {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
            ErrorKind::InvalidAudience => AuthError::InvalidAudience,
            ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
            _ => AuthError::MalformedToken,
        }
    })?;

    Ok(token_data.claims)
}

/// Development JWT verification (no signature check).
#[cfg(any(test, feature = "dev"))]
fn verify_jwt_development(token: &str) -> Result<JwtClaims, AuthError> {
    let token_data = jsonwebtoken::dangerous::insecure_decode::<JwtClaims>(token)
        .map_err(|_| AuthError::MalformedToken)?;

    let claims = token_data.claims;
    let now = chrono::Utc::now().timestamp();

    if claims.exp > 0 && claims.exp < now - CLOCK_SKEW_LEEWAY as i64 {
        return Err(AuthError::TokenExpired);
    }

    Ok(claims)
}

#[cfg(not(any(test, feature = "dev")))]
fn verify_jwt_development(_token: &str) -> Result<JwtClaims, AuthError> {
    Err(AuthError::InternalError(
        "JWT verification is not configured".to_string(),
    ))
}

/// Extractor that requires an unlocked self-custody acknowledgment gate.
///
/// Rejects with the auth error when the token is missing or invalid, and with
/// `403 acknowledgment_required` while the caller's gate is locked.
pub struct Acknowledged(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Acknowledged {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if !state.gate.is_unlocked(&user.identity) {
            tracing::info!(identity = %user.identity, "Self-custody action refused: gate locked");
            return Err(ApiError::acknowledgment_required().into_response());
        }

        Ok(Acknowledged(user))
    }
}
