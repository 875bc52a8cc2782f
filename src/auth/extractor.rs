// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the authenticated principal.
//!
//! They read the [`AuthContext`] stored by the authentication filter and
//! never look at the token themselves.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal.username(), principal.authorities()
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::boundary::{authorize, EntryPoint};
use super::context::AuthContext;
use super::error::AuthError;
use super::principal::Principal;
use super::roles::AuthorityGroup;

/// Requires an authenticated principal; rejects with 401 otherwise.
pub struct Auth(pub Principal);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = parts.extensions.get::<AuthContext>();
        match context {
            Some(AuthContext::Authenticated(principal)) => Ok(Auth(principal.clone())),
            _ => Err(EntryPoint::commence(context)),
        }
    }
}

/// Requires the ADMIN group; 401 when anonymous, 403 when not an admin.
pub struct AdminOnly(pub Principal);

impl<S> FromRequestParts<S> for AdminOnly
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Auth(principal) = Auth::from_request_parts(parts, state).await?;
        authorize(&principal, &[AuthorityGroup::Admin])?;
        Ok(AdminOnly(principal))
    }
}

/// Optional authentication extractor.
///
/// Returns `None` if no valid authentication is present, instead of rejecting.
pub struct OptionalAuth(pub Option<Principal>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts
            .extensions
            .get::<AuthContext>()
            .and_then(AuthContext::principal)
            .cloned();
        Ok(OptionalAuth(principal))
    }
}
