// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication for the tour catalog API.
//!
//! ## Auth Flow
//!
//! 1. Client logs in with `POST /v1/users/login` (username + password)
//! 2. Server verifies the password against the stored Argon2 hash and returns
//!    an HS512-signed JWT carrying `sub` and the `AUTH_GROUP` labels
//! 3. Client sends `Authorization: Bearer <JWT>` on later requests
//! 4. Server:
//!    - Verifies signature and expiry without touching the store
//!    - Rebuilds the principal from the embedded labels
//!      (`ROLE_` prefix, uppercase, default `ROLE_USER`)
//!    - Stores the outcome in the request's [`AuthContext`]
//!
//! ## Status codes
//!
//! - 401: no token, or an expired, malformed or forged one, on a protected route
//! - 403: valid token, missing authority
//!
//! The filter itself never rejects; route guards and extractors decide.

pub mod boundary;
pub mod claims;
pub mod codec;
pub mod context;
pub mod error;
pub mod extractor;
pub mod mapper;
pub mod middleware;
pub mod password;
pub mod principal;
pub mod roles;

pub use boundary::{AccessDeniedHandler, EntryPoint};
pub use claims::Claims;
pub use codec::{TokenCodec, TokenError};
pub use context::{AuthContext, AuthFailure, FailureKind};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, OptionalAuth};
pub use mapper::AuthorityMapper;
pub use principal::{Principal, PrincipalResolver};
pub use roles::{Authority, AuthorityGroup};
