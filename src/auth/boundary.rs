// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Boundary handlers turning authorization outcomes into responses.
//!
//! - [`EntryPoint`]: protected resource, no valid identity (401).
//! - [`AccessDeniedHandler`]: valid identity lacking authority (403).
//!
//! Both produce an [`AuthError`], whose response body is `{status, message}`.

use super::context::{AuthContext, FailureKind};
use super::error::AuthError;
use super::principal::Principal;
use super::roles::AuthorityGroup;

pub struct EntryPoint;

impl EntryPoint {
    /// Reject an unauthenticated request, reusing the most specific reason the
    /// filter recorded (for example an expired token).
    pub fn commence(context: Option<&AuthContext>) -> AuthError {
        let cause = context
            .and_then(AuthContext::kind)
            .unwrap_or(FailureKind::NoToken);
        let err = AuthError::Unauthenticated {
            reason: context
                .and_then(AuthContext::failure)
                .map(|f| f.reason.clone()),
        };

        tracing::debug!(
            kind = ?err.failure_kind(),
            ?cause,
            "unauthenticated access to protected resource"
        );
        err
    }
}

pub struct AccessDeniedHandler;

impl AccessDeniedHandler {
    pub fn handle(principal: &Principal, required: &[AuthorityGroup]) -> AuthError {
        let err = AuthError::Forbidden;
        tracing::warn!(
            kind = ?err.failure_kind(),
            username = principal.username(),
            required = ?required,
            held = ?principal.authority_labels(),
            "access denied"
        );
        err
    }
}

/// Authorize `principal` against any of `required`.
pub fn authorize(principal: &Principal, required: &[AuthorityGroup]) -> Result<(), AuthError> {
    if principal.has_any_group(required) {
        Ok(())
    } else {
        Err(AccessDeniedHandler::handle(principal, required))
    }
}
