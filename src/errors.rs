// ABOUTME: Error taxonomy for the credential lifecycle engine and its HTTP mapping
// ABOUTME: Specific kinds stay visible internally; the wire response is deliberately generic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Credo Project

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine-level error taxonomy.
///
/// The string payload is diagnostic detail for logs and tests. It never
/// reaches the wire: [`IntoResponse`] collapses `InvalidClient`,
/// `InvalidGrant` and `InvalidRequest` into one indistinguishable bad-request
/// body so a caller cannot enumerate valid clients, codes, or tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OAuthError {
    /// Client unknown, or credential/redirect mismatch
    #[error("invalid client: {0}")]
    InvalidClient(String),
    /// Authorization code or refresh token unknown, consumed, or not owned
    /// by the calling client
    #[error("invalid grant: {0}")]
    InvalidGrant(String),
    /// Malformed or missing parameters, or an unsupported grant/response type
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Access token unresolvable
    #[error("invalid token: {0}")]
    InvalidToken(String),
    /// RNG or signing failure; the only non-semantic failure in this core
    #[error("internal error: {0}")]
    Internal(String),
}

impl OAuthError {
    /// Client unknown or credential/redirect mismatch.
    pub fn invalid_client(detail: impl Into<String>) -> Self {
        Self::InvalidClient(detail.into())
    }

    /// Code or refresh token not redeemable by this caller.
    pub fn invalid_grant(detail: impl Into<String>) -> Self {
        Self::InvalidGrant(detail.into())
    }

    /// Malformed request surface.
    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self::InvalidRequest(detail.into())
    }

    /// Bearer token missing or unrecognized.
    pub fn invalid_token(detail: impl Into<String>) -> Self {
        Self::InvalidToken(detail.into())
    }

    /// Non-semantic failure (RNG, signing).
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidClient(_) | Self::InvalidGrant(_) | Self::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn wire_body(&self) -> OAuthErrorResponse {
        match self {
            Self::InvalidClient(_) | Self::InvalidGrant(_) | Self::InvalidRequest(_) => {
                OAuthErrorResponse {
                    error: "invalid_request".to_owned(),
                    error_description: "The request could not be processed".to_owned(),
                }
            }
            Self::InvalidToken(_) => OAuthErrorResponse {
                error: "invalid_token".to_owned(),
                error_description: "The access token is missing or not recognized".to_owned(),
            },
            Self::Internal(_) => OAuthErrorResponse {
                error: "server_error".to_owned(),
                error_description: "The server could not complete the request".to_owned(),
            },
        }
    }
}

/// Result alias used throughout the engine.
pub type OAuthResult<T> = Result<T, OAuthError>;

/// Generic OAuth 2.0 wire error body
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OAuthErrorResponse {
    /// OAuth 2.0 error code
    pub error: String,
    /// Human-readable description; intentionally non-specific
    pub error_description: String,
}

impl IntoResponse for OAuthError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "rejecting request");
        (self.status(), Json(self.wire_body())).into_response()
    }
}
