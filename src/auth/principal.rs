// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated principal and the two ways of building one.
//!
//! - Login path: look the credential up, verify the password, map the stored
//!   groups. This is the only path that touches the store.
//! - Token path: map the labels embedded in validated claims. No I/O.
//!
//! Both paths go through the same [`AuthorityMapper`], so a principal built
//! from a fresh login and one rebuilt from that login's token are equal.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use super::claims::Claims;
use super::error::AuthError;
use super::mapper::AuthorityMapper;
use super::password::{hash_password, verify_password_blocking, PasswordError};
use super::roles::{Authority, AuthorityGroup};
use crate::store::{Credential, CredentialStore};

/// Identity of the caller for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    username: String,
    authorities: BTreeSet<Authority>,
}

impl Principal {
    pub fn new(username: impl Into<String>, authorities: BTreeSet<Authority>) -> Self {
        Self {
            username: username.into(),
            authorities,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn authorities(&self) -> &BTreeSet<Authority> {
        &self.authorities
    }

    /// Canonical `ROLE_*` labels, as consumed by route authorization.
    pub fn authority_labels(&self) -> BTreeSet<String> {
        self.authorities.iter().map(ToString::to_string).collect()
    }

    pub fn has_group(&self, group: AuthorityGroup) -> bool {
        self.authorities.contains(&Authority::Group(group))
    }

    pub fn has_any_group(&self, groups: &[AuthorityGroup]) -> bool {
        groups.iter().any(|group| self.has_group(*group))
    }

    pub fn is_admin(&self) -> bool {
        self.has_group(AuthorityGroup::Admin)
    }
}

/// Builds principals from credentials or from validated claims.
#[derive(Clone)]
pub struct PrincipalResolver {
    store: Arc<dyn CredentialStore>,
    mapper: AuthorityMapper,
    /// Verified against when the username is unknown, so both login failures
    /// cost one Argon2 verification.
    dummy_hash: Option<Arc<str>>,
}

impl PrincipalResolver {
    pub fn new(store: Arc<dyn CredentialStore>, mapper: AuthorityMapper) -> Self {
        let dummy_hash = match hash_password("unknown-user-placeholder") {
            Ok(hash) => Some(Arc::from(hash)),
            Err(err) => {
                tracing::error!(error = %err, "failed to prepare placeholder password hash");
                None
            }
        };
        Self {
            store,
            mapper,
            dummy_hash,
        }
    }

    pub fn mapper(&self) -> &AuthorityMapper {
        &self.mapper
    }

    /// Token path: never queries the store.
    pub fn from_claims(&self, claims: &Claims) -> Principal {
        Principal::new(claims.subject(), self.mapper.map(claims.authorities()))
    }

    pub fn from_credential(&self, credential: &Credential) -> Principal {
        Principal::new(
            credential.username.clone(),
            self.mapper.map_groups(credential.groups.iter().copied()),
        )
    }

    /// Login path: look up `username` and verify `password` against its hash.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Principal, AuthError> {
        let credential = self.store.find_by_username(username).await?;
        let verified = self
            .verify(password, credential.as_ref().map(|c| c.password_hash.as_str()))
            .await;

        let Some(credential) = credential else {
            tracing::warn!(username, "login failed: no credential found");
            return Err(AuthError::NoCredentialFound);
        };

        if let Err(err) = verified {
            tracing::warn!(username, reason = %err, "login failed: password rejected");
            return Err(err.into());
        }

        let principal = self.from_credential(&credential);
        tracing::info!(
            username,
            authorities = ?principal.authority_labels(),
            "user authenticated"
        );
        Ok(principal)
    }

    /// Verify `password` against `stored_hash`, or against the placeholder
    /// hash when there is none. The placeholder never matches.
    async fn verify(&self, password: &str, stored_hash: Option<&str>) -> Result<(), PasswordError> {
        let (hash, known) = match (stored_hash, &self.dummy_hash) {
            (Some(hash), _) => (hash.to_string(), true),
            (None, Some(dummy)) => (dummy.to_string(), false),
            (None, None) => return Err(PasswordError::Mismatch),
        };
        let result = verify_password_blocking(password.to_string(), hash).await;
        if known {
            result
        } else {
            Err(PasswordError::Mismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::codec::TokenCodec;
    use crate::config::SigningSecret;
    use crate::store::InMemoryCredentialStore;
    use chrono::{DateTime, Utc};
    use std::time::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(
            &SigningSecret::new("principal-test-secret").unwrap(),
            Duration::from_secs(300),
        )
    }

    async fn resolver_with(credentials: Vec<Credential>) -> PrincipalResolver {
        let store = Arc::new(InMemoryCredentialStore::new());
        for credential in credentials {
            store.insert(credential).await.unwrap();
        }
        PrincipalResolver::new(store, AuthorityMapper::default())
    }

    #[tokio::test]
    async fn authenticate_with_correct_password() {
        let hash = hash_password("s3cret").unwrap();
        let resolver = resolver_with(vec![Credential::new(
            "alice",
            hash,
            [AuthorityGroup::Admin, AuthorityGroup::User],
        )])
        .await;

        let principal = resolver.authenticate("alice", "s3cret").await.unwrap();
        assert_eq!(principal.username(), "alice");
        assert!(principal.is_admin());
        assert!(principal.has_group(AuthorityGroup::User));
        assert!(!principal.has_group(AuthorityGroup::Viewer));
    }

    #[tokio::test]
    async fn authenticate_unknown_user() {
        let resolver = resolver_with(vec![]).await;
        let result = resolver.authenticate("ghost", "whatever").await;
        assert_eq!(result, Err(AuthError::NoCredentialFound));
    }

    #[tokio::test]
    async fn unknown_user_still_runs_a_full_verification() {
        let resolver = resolver_with(vec![]).await;
        let dummy = resolver.dummy_hash.clone().unwrap();

        // A parseable PHC string means the verifier does the full Argon2 work
        // instead of failing fast on a bad hash.
        assert!(argon2::password_hash::PasswordHash::new(&dummy).is_ok());
        assert!(matches!(
            crate::auth::password::verify_password("whatever", &dummy),
            Err(PasswordError::Mismatch)
        ));

        // Even the placeholder's own password never authenticates a missing user.
        let result = resolver.verify("unknown-user-placeholder", None).await;
        assert!(matches!(result, Err(PasswordError::Mismatch)));
        assert_eq!(
            resolver.authenticate("ghost", "unknown-user-placeholder").await,
            Err(AuthError::NoCredentialFound)
        );
    }

    #[tokio::test]
    async fn authenticate_wrong_password() {
        let hash = hash_password("s3cret").unwrap();
        let resolver =
            resolver_with(vec![Credential::new("alice", hash, [AuthorityGroup::User])]).await;
        let result = resolver.authenticate("alice", "wrong").await;
        assert_eq!(result, Err(AuthError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn authenticate_with_corrupt_stored_hash() {
        let resolver =
            resolver_with(vec![Credential::new("alice", "plaintext", [AuthorityGroup::User])])
                .await;
        let result = resolver.authenticate("alice", "plaintext").await;
        assert_eq!(result, Err(AuthError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn credential_without_groups_gets_default_authority() {
        let resolver = resolver_with(vec![]).await;
        let credential = Credential::new("bob", "$hash", Vec::<AuthorityGroup>::new());
        let principal = resolver.from_credential(&credential);
        assert_eq!(
            principal.authority_labels(),
            BTreeSet::from(["ROLE_USER".to_string()])
        );
    }

    #[tokio::test]
    async fn bob_with_no_authorities_resolves_to_default() {
        let resolver = resolver_with(vec![]).await;
        let codec = codec();
        let token = codec
            .encode("bob", Vec::<String>::new(), t0(), Duration::from_secs(300))
            .unwrap();
        let claims = codec.decode(&token, t0()).unwrap();

        let principal = resolver.from_claims(&claims);
        assert_eq!(principal.username(), "bob");
        assert_eq!(
            principal.authority_labels(),
            BTreeSet::from(["ROLE_USER".to_string()])
        );
    }

    #[tokio::test]
    async fn login_and_token_paths_agree() {
        let hash = hash_password("pw").unwrap();
        let resolver = resolver_with(vec![Credential::new(
            "carol",
            hash,
            [AuthorityGroup::Viewer, AuthorityGroup::Admin],
        )])
        .await;
        let codec = codec();

        let from_login = resolver.authenticate("carol", "pw").await.unwrap();
        let token = codec
            .issue(from_login.username(), from_login.authority_labels(), t0())
            .unwrap();
        let from_token = resolver.from_claims(&codec.decode(&token, t0()).unwrap());

        assert_eq!(from_login, from_token);
    }

    #[test]
    fn has_any_group() {
        let principal = Principal::new(
            "dave",
            BTreeSet::from([AuthorityGroup::Viewer.authority()]),
        );
        assert!(principal.has_any_group(&[AuthorityGroup::Admin, AuthorityGroup::Viewer]));
        assert!(!principal.has_any_group(&[AuthorityGroup::Admin]));
        assert!(!principal.has_any_group(&[]));
    }

    #[test]
    fn unknown_authority_does_not_grant_access() {
        let principal = Principal::new(
            "eve",
            BTreeSet::from([Authority::Unknown("ADMN".to_string())]),
        );
        assert!(!principal.is_admin());
        assert!(!principal.has_any_group(&AuthorityGroup::ALL));
    }
}
