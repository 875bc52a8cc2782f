// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;
use std::sync::Arc;

use tours_server::{
    api::router,
    auth::{password::hash_password_blocking, TokenCodec},
    config::{Config, LogFormat},
    state::AppState,
    store::{seed_admin, CredentialStore, InMemoryCredentialStore},
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing(LogFormat::from_env());

    // Refuse to start without a usable signing secret.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let store: Arc<dyn CredentialStore> = Arc::new(InMemoryCredentialStore::new());

    if let Some(admin) = &config.seed_admin {
        let password_hash = match hash_password_blocking(admin.password.clone()).await {
            Ok(hash) => hash,
            Err(err) => {
                tracing::error!(error = %err, "failed to hash seed administrator password");
                return ExitCode::FAILURE;
            }
        };
        match seed_admin(store.as_ref(), &admin.username, password_hash).await {
            Ok(true) => tracing::info!(username = %admin.username, "seeded administrator"),
            Ok(false) => tracing::info!(username = %admin.username, "administrator already exists"),
            Err(err) => {
                tracing::error!(error = %err, "failed to seed administrator");
                return ExitCode::FAILURE;
            }
        }
    }

    let codec = TokenCodec::new(&config.signing_secret, config.token_validity);
    let state = AppState::new(codec, store);
    let app = router(state);

    let addr = config.bind_addr;
    tracing::info!(
        %addr,
        token_validity_secs = config.token_validity.as_secs(),
        "Tours server listening on http://{addr} (docs at /docs)"
    );

    let server = axum_server::bind(addr).serve(app.into_make_service());

    tokio::select! {
        result = server => {
            if let Err(err) = result {
                tracing::error!(error = %err, "HTTP server failed");
                return ExitCode::FAILURE;
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received");
        }
    }

    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
