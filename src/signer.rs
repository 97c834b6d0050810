// ABOUTME: Identity assertion signing behind a capability trait, HS256 reference implementation
// ABOUTME: One process-wide symmetric key and issuer; decode exists for conformance checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Credo Project

use crate::errors::{OAuthError, OAuthResult};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claim set of the identity assertion (OIDC ID token).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdClaims {
    /// Subject identifier
    pub sub: String,
    /// Audience: the client the assertion is issued to
    pub aud: String,
    /// Issuer, fixed for the process lifetime
    pub iss: String,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch; always `iat + expires_in`
    pub exp: i64,
    /// Granted scopes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl IdClaims {
    /// Build a claim set issued now and expiring `expires_in` seconds later.
    #[must_use]
    pub fn new(
        sub: impl Into<String>,
        aud: impl Into<String>,
        iss: impl Into<String>,
        expires_in: i64,
        scope: Option<String>,
    ) -> Self {
        let iat = Utc::now().timestamp();
        Self {
            sub: sub.into(),
            aud: aud.into(),
            iss: iss.into(),
            iat,
            exp: iat + expires_in,
            scope,
        }
    }
}

/// Capability interface for producing signed identity assertions.
///
/// The concrete algorithm is swappable without touching the engine; the
/// engine only builds claims and asks for a signature.
pub trait IdentitySigner: Send + Sync {
    /// Produce an opaque signed assertion for the given claims.
    ///
    /// # Errors
    /// Fails only on signer-internal conditions; never on claim content.
    fn sign(&self, claims: &IdClaims) -> OAuthResult<String>;

    /// Issuer string stamped into every assertion.
    fn issuer(&self) -> &str;
}

/// HS256 signer over a single shared symmetric key.
pub struct HmacIdentitySigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl HmacIdentitySigner {
    /// Build a signer from the process-wide signing key and issuer.
    #[must_use]
    pub fn new(signing_key: &str, issuer: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(signing_key.as_bytes()),
            issuer: issuer.into(),
        }
    }

    /// Recover the claim set from an assertion, confirming the signature and
    /// `exp > now`.
    ///
    /// The engine never verifies assertions it issues; this is exercised by
    /// conformance tests and downstream identity consumers.
    ///
    /// # Errors
    /// `InvalidToken` if the signature does not verify or the assertion has
    /// expired.
    pub fn verify(&self, assertion: &str) -> OAuthResult<IdClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        validation.leeway = 0;
        decode::<IdClaims>(assertion, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| OAuthError::invalid_token(format!("identity assertion rejected: {e}")))
    }
}

impl IdentitySigner for HmacIdentitySigner {
    fn issuer(&self) -> &str {
        &self.issuer
    }

    fn sign(&self, claims: &IdClaims) -> OAuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "failed to sign identity assertion");
            OAuthError::internal("identity assertion signing failed")
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_roundtrips_claims() {
        let signer = HmacIdentitySigner::new("test-signing-key", "https://issuer.test");
        let claims = IdClaims::new(
            "user-123",
            "c1",
            signer.issuer(),
            3600,
            Some("openid".to_owned()),
        );

        let assertion = signer.sign(&claims).unwrap();
        let recovered = signer.verify(&assertion).unwrap();

        assert_eq!(recovered.sub, "user-123");
        assert_eq!(recovered.aud, "c1");
        assert_eq!(recovered.iss, "https://issuer.test");
        assert_eq!(recovered.exp - recovered.iat, 3600);
        assert_eq!(recovered.scope.as_deref(), Some("openid"));
    }

    #[test]
    fn verify_rejects_expired_assertion() {
        let signer = HmacIdentitySigner::new("test-signing-key", "https://issuer.test");
        let mut claims = IdClaims::new("user-123", "c1", signer.issuer(), 3600, None);
        claims.iat -= 7200;
        claims.exp -= 7200;

        let assertion = signer.sign(&claims).unwrap();
        assert!(matches!(
            signer.verify(&assertion),
            Err(OAuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn verify_rejects_foreign_key() {
        let signer = HmacIdentitySigner::new("test-signing-key", "https://issuer.test");
        let other = HmacIdentitySigner::new("different-key", "https://issuer.test");
        let claims = IdClaims::new("user-123", "c1", signer.issuer(), 3600, None);

        let assertion = signer.sign(&claims).unwrap();
        assert!(other.verify(&assertion).is_err());
    }
}
