// ABOUTME: Repository contracts for the three credential keyspaces with in-memory implementations
// ABOUTME: consume() is an atomic take so one-time-use credentials cannot be redeemed twice
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Credo Project

use crate::models::{AccessToken, AuthorizationCode, RefreshGrant};
use dashmap::DashMap;

/// Storage contract for authorization codes, keyed by the code value.
///
/// `consume` removes and returns the code in one step: of two concurrent
/// callers presenting the same code, exactly one observes it present.
/// Missing keys are represented as `None`, never signaled as failure.
pub trait AuthCodeRepository: Send + Sync {
    /// Persist a freshly minted code.
    fn save(&self, code: AuthorizationCode);
    /// Non-destructive lookup.
    fn get(&self, code: &str) -> Option<AuthorizationCode>;
    /// Atomic take, enforcing one-time use.
    fn consume(&self, code: &str) -> Option<AuthorizationCode>;
}

/// Storage contract for access tokens, keyed by the token value.
///
/// Tokens are never deleted in this design; they accumulate for the process
/// lifetime. A durable backend would add eviction behind this trait.
pub trait AccessTokenRepository: Send + Sync {
    /// Persist an issued token.
    fn save(&self, token: AccessToken);
    /// Non-destructive lookup.
    fn get(&self, access_token: &str) -> Option<AccessToken>;
}

/// Storage contract for rotation records, keyed by refresh token value.
///
/// Each record names the owning client alongside the subject and scope the
/// next pair inherits.
pub trait RefreshTokenRepository: Send + Sync {
    /// Associate a refresh token with its rotation record.
    fn save(&self, refresh_token: String, grant: RefreshGrant);
    /// Non-destructive lookup.
    fn get(&self, refresh_token: &str) -> Option<RefreshGrant>;
    /// Atomic take, enforcing one-time use per rotation.
    fn consume(&self, refresh_token: &str) -> Option<RefreshGrant>;
}

/// In-memory authorization code store backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryAuthCodeRepository {
    codes: DashMap<String, AuthorizationCode>,
}

impl AuthCodeRepository for InMemoryAuthCodeRepository {
    fn save(&self, code: AuthorizationCode) {
        self.codes.insert(code.code.clone(), code);
    }

    fn get(&self, code: &str) -> Option<AuthorizationCode> {
        self.codes.get(code).map(|entry| entry.value().clone())
    }

    fn consume(&self, code: &str) -> Option<AuthorizationCode> {
        self.codes.remove(code).map(|(_, value)| value)
    }
}

/// In-memory access token store.
#[derive(Debug, Default)]
pub struct InMemoryAccessTokenRepository {
    tokens: DashMap<String, AccessToken>,
}

impl AccessTokenRepository for InMemoryAccessTokenRepository {
    fn save(&self, token: AccessToken) {
        self.tokens.insert(token.access_token.clone(), token);
    }

    fn get(&self, access_token: &str) -> Option<AccessToken> {
        self.tokens.get(access_token).map(|entry| entry.value().clone())
    }
}

/// In-memory rotation record store.
#[derive(Debug, Default)]
pub struct InMemoryRefreshTokenRepository {
    grants: DashMap<String, RefreshGrant>,
}

impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    fn save(&self, refresh_token: String, grant: RefreshGrant) {
        self.grants.insert(refresh_token, grant);
    }

    fn get(&self, refresh_token: &str) -> Option<RefreshGrant> {
        self.grants.get(refresh_token).map(|entry| entry.value().clone())
    }

    fn consume(&self, refresh_token: &str) -> Option<RefreshGrant> {
        self.grants.remove(refresh_token).map(|(_, value)| value)
    }
}
