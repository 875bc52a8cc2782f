// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Two stages:
//!
//! 1. [`authenticate`] runs on every request. It reads the bearer token,
//!    validates it and stores the resulting [`AuthContext`] in the request
//!    extensions. It never rejects a request.
//! 2. [`require_authenticated`] guards protected routes and turns an
//!    anonymous or rejected context into a 401 via the [`EntryPoint`].
//!
//! Role checks happen later, in the extractors.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/users/me", get(current_user))
//!     .route_layer(axum::middleware::from_fn(require_authenticated));
//!
//! let app = Router::new()
//!     .nest("/v1", protected)
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), authenticate))
//!     .with_state(state);
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};

use super::boundary::EntryPoint;
use super::codec::TokenCodec;
use super::context::{AuthContext, AuthFailure};
use super::principal::PrincipalResolver;
use crate::state::AppState;

const BEARER_SCHEME: &str = "Bearer";

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. Anything else, including an
/// empty token, counts as no token at all.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Compute the authentication context for a request at instant `now`.
pub fn resolve_context(
    headers: &HeaderMap,
    codec: &TokenCodec,
    resolver: &PrincipalResolver,
    now: DateTime<Utc>,
) -> AuthContext {
    let Some(token) = bearer_token(headers) else {
        return AuthContext::Anonymous;
    };

    match codec.decode(token, now) {
        Ok(claims) => AuthContext::Authenticated(resolver.from_claims(&claims)),
        Err(err) => {
            tracing::debug!(reason = %err, "bearer token rejected");
            AuthContext::Rejected(AuthFailure::from(err))
        }
    }
}

/// Authentication filter.
///
/// Always replaces whatever context the request carried and always forwards
/// the request.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = resolve_context(request.headers(), &state.codec, &state.resolver, Utc::now());

    if let Some(principal) = context.principal() {
        tracing::debug!(username = principal.username(), "request authenticated");
    }

    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Route guard: only authenticated requests reach the handler.
pub async fn require_authenticated(request: Request, next: Next) -> Response {
    let authenticated = request
        .extensions()
        .get::<AuthContext>()
        .is_some_and(AuthContext::is_authenticated);
    if authenticated {
        return next.run(request).await;
    }
    EntryPoint::commence(request.extensions().get::<AuthContext>()).into_response()
}
