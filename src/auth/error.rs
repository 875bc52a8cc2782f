// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::codec::TokenError;
use super::context::FailureKind;
use super::password::PasswordError;
use crate::error::ApiError;
use crate::store::StoreError;

/// Message used when no more specific reason was recorded for the request.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized access.";

/// Message returned to principals lacking the required authority.
pub const ACCESS_DENIED_MESSAGE: &str = "Access Denied";

/// Client message for any login failure; the log keeps the real cause.
pub const BAD_CREDENTIALS_MESSAGE: &str = "User authentication failed.";

/// Authentication error type.
///
/// Status convention: 401 for a missing or invalid identity, 403 for a valid
/// identity without the required authority, 500 for internal failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Token signature verified but it is past its expiry
    #[error("JWT token has expired.")]
    TokenExpired,
    /// Token could not be parsed
    #[error("JWT token is malformed.")]
    TokenMalformed,
    /// Token signature does not verify
    #[error("JWT signature does not match.")]
    TokenInvalidSignature,
    /// Login for an unknown username
    #[error("User authentication failed.")]
    NoCredentialFound,
    /// Login with a wrong password
    #[error("User authentication failed.")]
    AuthenticationFailed,
    /// Protected resource reached without a valid identity
    #[error("{}", .reason.as_deref().unwrap_or(UNAUTHORIZED_MESSAGE))]
    Unauthenticated { reason: Option<String> },
    /// Valid identity, insufficient authority
    #[error("Access Denied")]
    Forbidden,
    /// Internal failure; the detail is logged, never returned
    #[error("Internal authentication error")]
    Internal(String),
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenMalformed => "token_malformed",
            AuthError::TokenInvalidSignature => "token_invalid_signature",
            AuthError::NoCredentialFound => "no_credential_found",
            AuthError::AuthenticationFailed => "authentication_failed",
            AuthError::Unauthenticated { .. } => "unauthenticated",
            AuthError::Forbidden => "forbidden",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Boundary outcome this error stands for; `None` for login and internal
    /// failures.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            AuthError::TokenExpired => Some(FailureKind::Expired),
            AuthError::TokenMalformed => Some(FailureKind::Malformed),
            AuthError::TokenInvalidSignature => Some(FailureKind::InvalidSignature),
            AuthError::Unauthenticated { .. } => Some(FailureKind::Unauthenticated),
            AuthError::Forbidden => Some(FailureKind::Forbidden),
            AuthError::NoCredentialFound
            | AuthError::AuthenticationFailed
            | AuthError::Internal(_) => None,
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::TokenExpired
            | AuthError::TokenMalformed
            | AuthError::TokenInvalidSignature
            | AuthError::NoCredentialFound
            | AuthError::AuthenticationFailed
            | AuthError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Malformed => AuthError::TokenMalformed,
            TokenError::InvalidSignature => AuthError::TokenInvalidSignature,
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Mismatch | PasswordError::InvalidHash => AuthError::AuthenticationFailed,
            PasswordError::Hashing(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(detail) = &self {
            tracing::error!(detail = %detail, "internal authentication error");
        } else {
            tracing::debug!(code = self.error_code(), "authentication rejected");
        }
        ApiError::from(self).into_response()
    }
}
