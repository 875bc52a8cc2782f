// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the user endpoints. All types derive
//! `ToSchema` for the OpenAPI document.
//!
//! Password-bearing requests deliberately skip `Debug` so they cannot end up
//! in a log line.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{AuthorityGroup, Principal};
use crate::store::Credential;

/// Token type reported by the login endpoint.
pub const TOKEN_TYPE: &str = "Bearer";

// =============================================================================
// Login
// =============================================================================

/// Credentials presented to `POST /v1/users/login`.
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued bearer token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Signed JWT to send as `Authorization: Bearer <token>`
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: u64,
}

// =============================================================================
// User administration
// =============================================================================

/// New user registered by an administrator.
#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Public view of a stored user. Never carries the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub groups: BTreeSet<AuthorityGroup>,
    pub created_at: DateTime<Utc>,
}

impl From<&Credential> for UserView {
    fn from(credential: &Credential) -> Self {
        Self {
            id: credential.id,
            username: credential.username.clone(),
            first_name: credential.first_name.clone(),
            last_name: credential.last_name.clone(),
            email: credential.email.clone(),
            groups: credential.groups.clone(),
            created_at: credential.created_at,
        }
    }
}

/// Response for GET /v1/users/me
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserMeResponse {
    pub username: String,
    /// Canonical `ROLE_*` labels
    pub authorities: BTreeSet<String>,
}

impl From<&Principal> for UserMeResponse {
    fn from(principal: &Principal) -> Self {
        Self {
            username: principal.username().to_string(),
            authorities: principal.authority_labels(),
        }
    }
}
