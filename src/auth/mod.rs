// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer JWT authentication for the gateway.
//!
//! ## Auth Flow
//!
//! 1. The wallet frontend authenticates the user with the identity provider
//! 2. It sends `Authorization: Bearer <JWT>`
//! 3. The gateway:
//!    - verifies the HS256 signature, expiry, issuer and audience when
//!      `JWT_SECRET` is configured
//!    - otherwise (development builds only) checks structure and expiry
//!    - maps `sub` to the caller's [`Identity`](crate::models::Identity)
//!    - keeps the raw token to forward to the custody backend
//!
//! Clock skew tolerance is 60 seconds.
//!
//! [`Acknowledged`] additionally requires the caller's self-custody
//! acknowledgment gate to be unlocked.

pub mod claims;
pub mod error;
pub mod extractor;

pub use claims::AuthenticatedUser;
pub use error::AuthError;
pub use extractor::{Acknowledged, Auth};
