// ABOUTME: Credential lifecycle engine orchestrating registry, stores, signer and generator
// ABOUTME: Four stateless operations; one-time use enforced by delete-then-mint over atomic takes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Credo Project

use crate::errors::{OAuthError, OAuthResult};
use crate::models::{AccessToken, AuthorizationCode, RefreshGrant};
use crate::registry::ClientRegistry;
use crate::signer::{IdClaims, IdentitySigner};
use crate::store::{AccessTokenRepository, AuthCodeRepository, RefreshTokenRepository};
use crate::tokens::TokenGenerator;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a successful code exchange or refresh rotation.
#[derive(Debug, Clone)]
pub struct IssuedCredentials {
    /// The newly minted bearer token
    pub access_token: AccessToken,
    /// Rotation credential for the next refresh
    pub refresh_token: String,
    /// Signed identity assertion for the authenticated subject
    pub id_token: String,
}

/// Subject and scope resolved from a bearer access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    /// Subject identifier stored with the token
    pub user_id: String,
    /// Scope stored with the token
    pub scope: Option<String>,
}

/// The three credential stores the engine operates over.
///
/// Grouped so construction sites read as one injection point per concern.
pub struct CredentialStores {
    /// Authorization code keyspace
    pub auth_codes: Arc<dyn AuthCodeRepository>,
    /// Access token keyspace
    pub access_tokens: Arc<dyn AccessTokenRepository>,
    /// Refresh token association keyspace
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
}

/// State machine over authorization/token lineages.
///
/// Stateless beyond its injected dependencies: every operation reads and
/// writes the stores, never engine-held state, so independent requests may
/// invoke it concurrently. Each transition consumes exactly one credential
/// (code or refresh token) and produces exactly one new credential pair.
pub struct CredentialEngine {
    registry: Arc<ClientRegistry>,
    stores: CredentialStores,
    signer: Arc<dyn IdentitySigner>,
    generator: Arc<dyn TokenGenerator>,
    /// The single demonstration resource owner all codes are bound to
    subject: String,
}

impl CredentialEngine {
    /// Wire the engine to its collaborators.
    #[must_use]
    pub fn new(
        registry: Arc<ClientRegistry>,
        stores: CredentialStores,
        signer: Arc<dyn IdentitySigner>,
        generator: Arc<dyn TokenGenerator>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            stores,
            signer,
            generator,
            subject: subject.into(),
        }
    }

    /// Mint a single-use authorization code for the demonstration subject.
    ///
    /// # Errors
    /// `InvalidClient` if the client is unknown or the supplied redirect URI
    /// does not equal the registered one. Scope is passed through unchecked.
    pub fn issue_authorization_code(
        &self,
        client_id: &str,
        redirect_uri: &str,
        scope: Option<&str>,
    ) -> OAuthResult<AuthorizationCode> {
        let client = self.registry.get(client_id).ok_or_else(|| {
            warn!(client_id, "authorization requested for unknown client");
            OAuthError::invalid_client("unknown client")
        })?;
        if client.redirect_uri != redirect_uri {
            warn!(client_id, "redirect_uri does not match registration");
            return Err(OAuthError::invalid_client("redirect_uri mismatch"));
        }

        let auth_code = AuthorizationCode {
            code: self.generator.generate()?,
            client_id: client_id.to_owned(),
            user_id: self.subject.clone(),
            scope: scope.map(str::to_owned),
        };
        self.stores.auth_codes.save(auth_code.clone());
        debug!(client_id, "authorization code issued");
        Ok(auth_code)
    }

    /// Redeem an authorization code for an access/refresh pair plus identity
    /// assertion.
    ///
    /// The client is validated before the code is touched, so a caller with
    /// bad credentials cannot burn a code. Redemption itself is an atomic
    /// take: of two concurrent exchanges of the same code, exactly one
    /// succeeds.
    ///
    /// # Errors
    /// `InvalidClient` if client validation (id, secret, redirect URI) fails;
    /// `InvalidGrant` if the code is unknown, already redeemed, or was issued
    /// to a different client.
    pub fn exchange_code_for_tokens(
        &self,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        code: &str,
    ) -> OAuthResult<IssuedCredentials> {
        if !self.registry.validate(client_id, client_secret, redirect_uri) {
            warn!(client_id, "client validation failed during code exchange");
            return Err(OAuthError::invalid_client("client validation failed"));
        }

        // Ownership is checked before the take so a mismatched client leaves
        // the code redeemable by its rightful owner.
        let pending = self
            .stores
            .auth_codes
            .get(code)
            .ok_or_else(|| OAuthError::invalid_grant("unknown authorization code"))?;
        if pending.client_id != client_id {
            warn!(client_id, "authorization code presented by wrong client");
            return Err(OAuthError::invalid_grant(
                "authorization code issued to another client",
            ));
        }

        // One-time use: the atomic take decides the winner of any race.
        // Minting happens after the delete; a mint failure leaves the code
        // consumed rather than silently resurrectable.
        let auth_code = self
            .stores
            .auth_codes
            .consume(code)
            .ok_or_else(|| OAuthError::invalid_grant("authorization code already redeemed"))?;

        let issued = self.mint(client_id, auth_code.user_id, auth_code.scope)?;
        info!(client_id, "authorization code exchanged");
        Ok(issued)
    }

    /// Rotate a refresh token into a new access/refresh pair.
    ///
    /// Checks client identity and secret only; the redirect URI is not
    /// re-validated at this step. Subject and scope carry over unchanged.
    ///
    /// # Errors
    /// `InvalidClient` if the client is unknown or the secret does not match;
    /// `InvalidGrant` if the refresh token is unknown, already rotated, or
    /// owned by a different client.
    pub fn rotate_refresh_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> OAuthResult<IssuedCredentials> {
        let credentials_ok = self
            .registry
            .get(client_id)
            .is_some_and(|c| c.client_secret == client_secret);
        if !credentials_ok {
            warn!(client_id, "client validation failed during rotation");
            return Err(OAuthError::invalid_client("client validation failed"));
        }

        // Ownership is checked before the take so a mismatched client leaves
        // the refresh token rotatable by its rightful owner.
        let pending = self
            .stores
            .refresh_tokens
            .get(refresh_token)
            .ok_or_else(|| OAuthError::invalid_grant("unknown refresh token"))?;
        if pending.client_id != client_id {
            warn!(client_id, "refresh token presented by wrong client");
            return Err(OAuthError::invalid_grant(
                "refresh token issued to another client",
            ));
        }

        // One-time use per rotation: delete the old record before the new
        // pair exists, so the old value cannot be replayed.
        let previous = self
            .stores
            .refresh_tokens
            .consume(refresh_token)
            .ok_or_else(|| {
                warn!(client_id, "refresh token already rotated");
                OAuthError::invalid_grant("refresh token already rotated")
            })?;

        let issued = self.mint(client_id, previous.user_id, previous.scope)?;
        info!(client_id, "refresh token rotated");
        Ok(issued)
    }

    /// Resolve a bearer access token to its subject and scope.
    ///
    /// Pure lookup with no mutation. `expires_in` is advisory metadata and
    /// is deliberately not compared against issuance time; a stored token
    /// resolves for the lifetime of the process.
    ///
    /// # Errors
    /// `InvalidToken` if the token is not in the store.
    pub fn resolve_access_token(&self, access_token: &str) -> OAuthResult<ResolvedToken> {
        let token = self
            .stores
            .access_tokens
            .get(access_token)
            .ok_or_else(|| OAuthError::invalid_token("unrecognized access token"))?;
        Ok(ResolvedToken {
            user_id: token.user_id,
            scope: token.scope,
        })
    }

    /// Mint a fresh access/refresh pair and identity assertion for the given
    /// subject, persisting the token and its refresh association.
    fn mint(
        &self,
        client_id: &str,
        user_id: String,
        scope: Option<String>,
    ) -> OAuthResult<IssuedCredentials> {
        let access_token = AccessToken::new(self.generator.generate()?, user_id, scope);
        let refresh_token = self.generator.generate()?;

        let claims = IdClaims::new(
            access_token.user_id.clone(),
            client_id,
            self.signer.issuer(),
            access_token.expires_in,
            access_token.scope.clone(),
        );
        let id_token = self.signer.sign(&claims)?;

        self.stores.access_tokens.save(access_token.clone());
        self.stores.refresh_tokens.save(
            refresh_token.clone(),
            RefreshGrant {
                client_id: client_id.to_owned(),
                user_id: access_token.user_id.clone(),
                scope: access_token.scope.clone(),
            },
        );

        Ok(IssuedCredentials {
            access_token,
            refresh_token,
            id_token,
        })
    }
}
