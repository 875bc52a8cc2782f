// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claim set issued at login and carried by every bearer token.

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::codec::EncodeError;
use super::roles::Authority;

/// Claims embedded in a token.
///
/// Wire form:
///
/// ```json
/// {"sub": "alice", "AUTH_GROUP": ["ROLE_USER"], "iat": 1700000000, "exp": 1700003600}
/// ```
///
/// Fields are private: a claim set is built once by [`Claims::issue`] or by
/// decoding a token, and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    sub: String,

    /// Canonical authority labels (`ROLE_*`)
    #[serde(rename = "AUTH_GROUP", default)]
    auth_group: Vec<String>,

    /// Issued at (seconds since the epoch)
    iat: i64,

    /// Expiration (seconds since the epoch)
    exp: i64,
}

impl Claims {
    /// Build the claim set for a fresh token.
    ///
    /// Labels are canonicalized (`ROLE_` prefix, uppercase) and deduplicated;
    /// blank labels are dropped. No default authority is added here.
    pub(crate) fn issue<I, S>(
        subject: &str,
        authorities: I,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Self, EncodeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if subject.trim().is_empty() {
            return Err(EncodeError::EmptySubject);
        }

        let window_secs = i64::try_from(window.as_secs()).map_err(|_| EncodeError::InvalidWindow)?;
        if window_secs == 0 {
            return Err(EncodeError::InvalidWindow);
        }

        let iat = now.timestamp();
        let exp = iat.checked_add(window_secs).ok_or(EncodeError::InvalidWindow)?;

        let auth_group = authorities
            .into_iter()
            .filter_map(|label| Authority::parse(label.as_ref()))
            .map(|authority| authority.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(Self {
            sub: subject.to_string(),
            auth_group,
            iat,
            exp,
        })
    }

    /// Structural invariants every accepted claim set satisfies.
    pub(crate) fn is_well_formed(&self) -> bool {
        !self.sub.trim().is_empty() && self.exp > self.iat
    }

    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn authorities(&self) -> &[String] {
        &self.auth_group
    }

    /// Issued-at instant in seconds since the epoch.
    pub fn issued_at(&self) -> i64 {
        self.iat
    }

    /// Expiry instant in seconds since the epoch.
    pub fn expires_at(&self) -> i64 {
        self.exp
    }

    /// Whether the claims are expired at `now` (expiry is exclusive).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}
