// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing and validation of bearer tokens.
//!
//! Tokens are compact JWS strings (`header.payload.signature`) signed with
//! HS512 under the process-wide [`SigningSecret`]. Validation is pure: a
//! structural parse, an HMAC check and a timestamp comparison against the
//! caller-supplied clock. No I/O happens here.
//!
//! Outcomes are mutually exclusive and checked in this order:
//!
//! 1. `Malformed` - the token does not parse into a header and claim set
//! 2. `InvalidSignature` - the structure is fine but the signature does not verify
//! 3. `Expired` - the signature verifies but `exp <= now`

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::Claims;
use crate::config::SigningSecret;

/// Signature algorithm for every issued token.
pub const ALGORITHM: Algorithm = Algorithm::HS512;

/// Why a presented token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("JWT token has expired.")]
    Expired,
    #[error("JWT token is malformed.")]
    Malformed,
    #[error("JWT signature does not match.")]
    InvalidSignature,
}

/// Failure to issue a token.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("token subject must not be empty")]
    EmptySubject,
    #[error("token validity window must be at least one second")]
    InvalidWindow,
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Encodes and validates tokens with a fixed secret and default validity.
///
/// Built once at startup and shared read-only (`Arc<TokenCodec>`) by every
/// request; nothing in it changes after construction.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    validity: Duration,
}

impl TokenCodec {
    pub fn new(secret: &SigningSecret, validity: Duration) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is compared against the caller's clock in `decode`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            header: Header::new(ALGORITHM),
            validation,
            validity,
        }
    }

    /// Default validity applied by [`TokenCodec::issue`].
    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Sign a token for `subject` valid from `now` for `window`.
    pub fn encode<I, S>(
        &self,
        subject: &str,
        authorities: I,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<String, EncodeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let claims = Claims::issue(subject, authorities, now, window)?;
        let token = jsonwebtoken::encode(&self.header, &claims, &self.encoding_key)?;

        tracing::debug!(
            subject = claims.subject(),
            issued_at = claims.issued_at(),
            expires_at = claims.expires_at(),
            "issued JWT token"
        );

        Ok(token)
    }

    /// Sign a token using the configured validity.
    pub fn issue<I, S>(
        &self,
        subject: &str,
        authorities: I,
        now: DateTime<Utc>,
    ) -> Result<String, EncodeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.encode(subject, authorities, now, self.validity)
    }

    /// Validate `token` at instant `now` and return its claims.
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        // Parse the structure first so a bad signature on a well-formed token
        // is never reported as malformed.
        let unverified = jsonwebtoken::dangerous::insecure_decode::<Claims>(token)
            .map_err(|_| TokenError::Malformed)?;
        if !unverified.claims.is_well_formed() {
            return Err(TokenError::Malformed);
        }

        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(e.kind()))?
            .claims;

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

/// Map a verification failure on a structurally valid token.
fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidToken | ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => {
            TokenError::Malformed
        }
        // Signature bytes that are not even valid base64, a header naming a
        // different algorithm, or a plain HMAC mismatch.
        _ => TokenError::InvalidSignature,
    }
}
