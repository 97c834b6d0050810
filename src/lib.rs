// ABOUTME: Library entry point for the credo OAuth2/OIDC authorization server
// ABOUTME: Credential lifecycle engine, repository contracts, signer, and HTTP boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Credo Project

#![deny(unsafe_code)]

//! # Credo
//!
//! A demonstration OAuth2/OIDC authorization server for a small set of
//! registered clients acting on behalf of a single resource owner.
//!
//! The core is the credential lifecycle engine: the state machine governing
//! how an authorization code becomes an access/refresh token pair plus a
//! signed identity assertion, how refresh tokens rotate, and how access
//! tokens resolve for resource access. Storage is in-memory behind
//! repository traits so a durable backend can be substituted without
//! touching the engine.
//!
//! ## Example
//!
//! ```rust,no_run
//! use credo::config::ServerConfig;
//! use credo::resources::ServerResources;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = ServerConfig::from_env()?;
//! let resources = Arc::new(ServerResources::from_config(&config));
//!
//! let code = resources.engine.issue_authorization_code(
//!     &config.demo_client.client_id,
//!     &config.demo_client.redirect_uri,
//!     Some("openid"),
//! )?;
//! println!("issued code {}", code.code);
//! # Ok(())
//! # }
//! ```

/// Environment-based server configuration
pub mod config;

/// Credential lifecycle engine: the four core operations
pub mod engine;

/// Error taxonomy and HTTP error mapping
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Domain entities and wire types
pub mod models;

/// Read-only client registry
pub mod registry;

/// Dependency container shared as request state
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Identity assertion signing
pub mod signer;

/// Repository contracts and in-memory credential stores
pub mod store;

/// Opaque token generation
pub mod tokens;
