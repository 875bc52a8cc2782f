// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{AuthorityMapper, PrincipalResolver, TokenCodec};
use crate::store::CredentialStore;

#[derive(Clone)]
pub struct AppState {
    /// Read-only after startup.
    pub codec: Arc<TokenCodec>,
    pub resolver: PrincipalResolver,
    pub store: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn new(codec: TokenCodec, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            codec: Arc::new(codec),
            resolver: PrincipalResolver::new(store.clone(), AuthorityMapper::default()),
            store,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// State over an empty in-memory store with a fixed test secret.
    pub fn for_tests() -> Self {
        use crate::config::SigningSecret;
        use crate::store::InMemoryCredentialStore;
        use std::time::Duration;

        let secret = SigningSecret::new("app-state-test-secret").unwrap();
        Self::new(
            TokenCodec::new(&secret, Duration::from_secs(300)),
            Arc::new(InMemoryCredentialStore::new()),
        )
    }
}
