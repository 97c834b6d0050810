// ABOUTME: Dependency container wiring config into registry, stores, signer and engine
// ABOUTME: Shared as axum state; one instance per hosting process or per test case
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Credo Project

use crate::config::ServerConfig;
use crate::engine::{CredentialEngine, CredentialStores};
use crate::registry::ClientRegistry;
use crate::signer::HmacIdentitySigner;
use crate::store::{
    InMemoryAccessTokenRepository, InMemoryAuthCodeRepository, InMemoryRefreshTokenRepository,
};
use crate::tokens::SystemTokenGenerator;
use std::sync::Arc;

/// Everything the HTTP layer needs, behind one `Arc`.
///
/// Construction is the only place stores are created; nothing in this crate
/// reaches for hidden module-level state.
pub struct ServerResources {
    /// The credential lifecycle engine
    pub engine: CredentialEngine,
}

impl ServerResources {
    /// Build the full dependency graph from configuration: a registry seeded
    /// with the demo client, fresh in-memory stores, the HS256 signer and
    /// the system token generator.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        let registry = Arc::new(ClientRegistry::new([config.demo_client.clone()]));
        let stores = CredentialStores {
            auth_codes: Arc::new(InMemoryAuthCodeRepository::default()),
            access_tokens: Arc::new(InMemoryAccessTokenRepository::default()),
            refresh_tokens: Arc::new(InMemoryRefreshTokenRepository::default()),
        };
        let signer = Arc::new(HmacIdentitySigner::new(
            &config.signing_key,
            config.issuer.clone(),
        ));
        let engine = CredentialEngine::new(
            registry,
            stores,
            signer,
            Arc::new(SystemTokenGenerator),
            config.subject.clone(),
        );
        Self { engine }
    }
}
