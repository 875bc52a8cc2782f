// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup. A missing
//! signing secret is fatal: the service never runs with a default key.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind IP (IPv4 or IPv6) | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HMAC signing secret for bearer tokens | Required |
//! | `JWT_EXPIRATION_MS` | Token validity in milliseconds | `3600000` |
//! | `SEED_ADMIN_USERNAME` | Bootstrap administrator username | Optional |
//! | `SEED_ADMIN_PASSWORD` | Bootstrap administrator password | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_EXPIRATION_MS_ENV: &str = "JWT_EXPIRATION_MS";
pub const SEED_ADMIN_USERNAME_ENV: &str = "SEED_ADMIN_USERNAME";
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TOKEN_VALIDITY_MS: u64 = 3_600_000;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingSecret,
    #[error("invalid value {value:?} for {name}")]
    InvalidValue { name: &'static str, value: String },
    #[error("token validity must be at least one second, got {0} ms")]
    ValidityTooShort(u64),
}

/// Symmetric key used to sign and verify tokens.
///
/// Immutable after construction and cheap to clone. `Debug` never prints the
/// key material.
#[derive(Clone)]
pub struct SigningSecret(Arc<str>);

impl SigningSecret {
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        Ok(Self(Arc::from(value)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// Parse `LOG_FORMAT`; anything other than `json` means pretty output.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }
}

/// Administrator account created at startup when both seed variables are set.
#[derive(Clone)]
pub struct SeedAdmin {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub signing_secret: SigningSecret,
    pub token_validity: Duration,
    pub log_format: LogFormat,
    pub seed_admin: Option<SeedAdmin>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let signing_secret =
            SigningSecret::new(lookup(JWT_SECRET_ENV).ok_or(ConfigError::MissingSecret)?)?;

        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };
        let ip = host
            .trim()
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                name: HOST_ENV,
                value: host.clone(),
            })?;
        let bind_addr = SocketAddr::new(ip, port);

        let validity_ms = match lookup(JWT_EXPIRATION_MS_ENV) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: JWT_EXPIRATION_MS_ENV,
                value: raw,
            })?,
            None => DEFAULT_TOKEN_VALIDITY_MS,
        };
        if validity_ms < 1_000 {
            return Err(ConfigError::ValidityTooShort(validity_ms));
        }

        let seed_admin = match (lookup(SEED_ADMIN_USERNAME_ENV), lookup(SEED_ADMIN_PASSWORD_ENV)) {
            (Some(username), Some(password))
                if !username.trim().is_empty() && !password.is_empty() =>
            {
                Some(SeedAdmin {
                    username: username.trim().to_string(),
                    password,
                })
            }
            _ => None,
        };

        Ok(Self {
            bind_addr,
            signing_secret,
            token_validity: Duration::from_millis(validity_ms),
            log_format: LogFormat::parse(lookup(LOG_FORMAT_ENV).as_deref()),
            seed_admin,
        })
    }
}
