// ABOUTME: Opaque code and token generation behind a pluggable capability trait
// ABOUTME: Reference implementation draws 256 bits from the system RNG, URL-safe base64 encoded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Credo Project

use crate::errors::{OAuthError, OAuthResult};
use base64::{engine::general_purpose, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};

const TOKEN_BYTES: usize = 32;

/// Generation of unique opaque strings for codes, access tokens and refresh
/// tokens. Pluggable so the engine never special-cases how values are minted.
pub trait TokenGenerator: Send + Sync {
    /// Mint a fresh opaque value with negligible collision probability.
    ///
    /// # Errors
    /// Fails only if the underlying entropy source fails, which is a
    /// non-semantic server-side condition.
    fn generate(&self) -> OAuthResult<String>;
}

/// Token generator backed by the operating system RNG.
#[derive(Debug, Default)]
pub struct SystemTokenGenerator;

impl TokenGenerator for SystemTokenGenerator {
    fn generate(&self) -> OAuthResult<String> {
        let rng = SystemRandom::new();
        let mut bytes = [0u8; TOKEN_BYTES];
        rng.fill(&mut bytes).map_err(|_| {
            tracing::error!("system RNG failure while minting credential");
            OAuthError::internal("system RNG failure")
        })?;
        Ok(general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }
}
