// ABOUTME: Server binary: logging, configuration, dependency wiring, axum serve loop
// ABOUTME: All runtime behavior is driven by CREDO_* environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Credo Project

//! # Credo Server Binary
//!
//! Starts the OAuth2/OIDC authorization server with the demo client seeded
//! into the registry and in-memory credential stores.

use anyhow::Result;
use credo::{config::ServerConfig, logging, resources::ServerResources, routes::OAuthRoutes};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_from_env()?;

    let config = ServerConfig::from_env()?;
    info!("starting credo-server: {}", config.summary());

    let resources = Arc::new(ServerResources::from_config(&config));
    let router = OAuthRoutes::router(resources);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    info!("listening on port {}", config.http_port);
    axum::serve(listener, router).await?;

    Ok(())
}
