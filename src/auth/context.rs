// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-scoped authentication context.
//!
//! The filter stores exactly one [`AuthContext`] in the request extensions.
//! It lives and dies with the `Request` value, so no identity or failure can
//! be observed by any other request.

use super::codec::TokenError;
use super::error::AuthError;
use super::principal::Principal;

/// Why a request carries no identity, or was refused one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No bearer token was presented. Not an error.
    NoToken,
    Expired,
    Malformed,
    InvalidSignature,
    /// Protected resource reached without a valid identity
    Unauthenticated,
    /// Valid identity, insufficient authority
    Forbidden,
}

/// Structured failure recorded by the filter for the boundary handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    pub kind: FailureKind,
    pub reason: String,
}

impl AuthFailure {
    pub fn new(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

impl From<TokenError> for AuthFailure {
    fn from(err: TokenError) -> Self {
        let kind = match err {
            TokenError::Expired => FailureKind::Expired,
            TokenError::Malformed => FailureKind::Malformed,
            TokenError::InvalidSignature => FailureKind::InvalidSignature,
        };
        // Client-facing wording comes from the matching AuthError.
        Self::new(kind, AuthError::from(err).to_string())
    }
}

/// Outcome of the authentication filter for one request.
///
/// A rejected token never leaves a principal behind: the variants are
/// mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthContext {
    #[default]
    Anonymous,
    Authenticated(Principal),
    /// Token presented but refused; the request continues anonymously.
    Rejected(AuthFailure),
}

impl AuthContext {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            AuthContext::Authenticated(principal) => Some(principal),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&AuthFailure> {
        match self {
            AuthContext::Rejected(failure) => Some(failure),
            _ => None,
        }
    }

    /// `None` when authenticated.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            AuthContext::Anonymous => Some(FailureKind::NoToken),
            AuthContext::Authenticated(_) => None,
            AuthContext::Rejected(failure) => Some(failure.kind),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthContext::Authenticated(_))
    }
}
