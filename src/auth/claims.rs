// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::Deserialize;

use crate::backend::Caller;
use crate::models::Identity;

/// Claims read from the bearer token.
#[derive(Debug, Deserialize)]
pub(crate) struct JwtClaims {
    /// Subject, becomes the caller's identity
    pub sub: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub iat: i64,
    #[serde(default)]
    pub exp: i64,
    #[serde(default)]
    pub iss: String,
    /// Validated by jsonwebtoken, not read directly
    #[serde(default)]
    #[allow(dead_code)]
    pub aud: Option<serde_json::Value>,
}

/// Authenticated user extracted from a verified (or, in development mode,
/// structurally checked) JWT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub identity: Identity,
    /// Raw bearer token, forwarded to the custody backend
    pub token: String,
    pub issuer: String,
    /// Expiration as a Unix timestamp (0 when absent)
    pub expires_at: i64,
}

impl AuthenticatedUser {
    pub(crate) fn from_claims(claims: JwtClaims, token: &str) -> Self {
        Self {
            identity: Identity::new(claims.sub),
            token: token.to_string(),
            issuer: claims.iss,
            expires_at: claims.exp,
        }
    }

    /// Backend call scope for this user.
    pub fn caller(&self) -> Caller {
        Caller::new(self.identity.clone(), self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_forwards_identity_and_token() {
        let claims: JwtClaims =
            serde_json::from_str(r#"{"sub":"user_1","exp":42,"iss":"issuer"}"#).unwrap();
        let user = AuthenticatedUser::from_claims(claims, "raw.jwt.token");

        let caller = user.caller();
        assert_eq!(caller.identity.as_str(), "user_1");
        assert_eq!(caller.credential, "raw.jwt.token");
        assert_eq!(user.expires_at, 42);
    }

    #[test]
    fn optional_claims_default() {
        let claims: JwtClaims = serde_json::from_str(r#"{"sub":"user_2"}"#).unwrap();
        assert_eq!(claims.exp, 0);
        assert!(claims.iss.is_empty());
    }
}
