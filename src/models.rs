// ABOUTME: Domain entities for the credential lifecycle plus the token endpoint wire types
// ABOUTME: Entities are plain owned structs; serde derives only on request/response shapes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Credo Project

use serde::{Deserialize, Serialize};

/// Advisory access token lifetime in seconds.
///
/// Stored on every issued token and reported as `expires_in` on the wire.
/// Resolution does not compare it against issuance time; see
/// [`crate::engine::CredentialEngine::resolve_access_token`].
pub const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 3600;

/// Registered OAuth 2.0 client
///
/// Immutable after registry construction. The secret is compared verbatim and
/// the redirect URI is exact-match only; no wildcard or pattern support.
#[derive(Debug, Clone)]
pub struct Client {
    /// Unique client identifier
    pub client_id: String,
    /// Client secret for authentication
    pub client_secret: String,
    /// Registered redirect URI for the authorization code flow
    pub redirect_uri: String,
}

/// Single-use credential minted at the authorize step
#[derive(Debug, Clone)]
pub struct AuthorizationCode {
    /// Opaque unique code value
    pub code: String,
    /// Client the code was issued to
    pub client_id: String,
    /// Subject the code authorizes
    pub user_id: String,
    /// Space-delimited scope tokens, passed through unvalidated
    pub scope: Option<String>,
}

/// Bearer credential for resource access
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Opaque unique token value
    pub access_token: String,
    /// Subject the token belongs to
    pub user_id: String,
    /// Scope carried over from the originating authorization code
    pub scope: Option<String>,
    /// Advisory lifetime in seconds
    pub expires_in: i64,
}

impl AccessToken {
    /// Construct a token with the fixed default lifetime.
    #[must_use]
    pub fn new(access_token: String, user_id: String, scope: Option<String>) -> Self {
        Self {
            access_token,
            user_id,
            scope,
            expires_in: DEFAULT_TOKEN_EXPIRY_SECS,
        }
    }
}

/// Rotation record stored per refresh token
///
/// Carries the owning client so rotation can reject a refresh token presented
/// by a different client, plus the subject and scope the next pair inherits.
#[derive(Debug, Clone)]
pub struct RefreshGrant {
    /// Client the refresh token was issued to
    pub client_id: String,
    /// Subject of the credential lineage
    pub user_id: String,
    /// Scope carried across rotations
    pub scope: Option<String>,
}

/// Query parameters for `GET /oauth/authorize`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizeParams {
    /// Response type; only `code` is supported
    pub response_type: String,
    /// Client identifier
    pub client_id: String,
    /// Redirect URI; must match the registration exactly
    pub redirect_uri: String,
    /// Opaque client state, echoed back on the redirect
    pub state: Option<String>,
    /// Requested scopes
    pub scope: Option<String>,
}

/// Form body for `POST /oauth/token`
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    /// Grant type (`authorization_code` or `refresh_token`)
    pub grant_type: String,
    /// Client identifier
    pub client_id: String,
    /// Client secret
    pub client_secret: String,
    /// Authorization code (for `authorization_code` grant)
    pub code: Option<String>,
    /// Redirect URI (for `authorization_code` grant)
    pub redirect_uri: Option<String>,
    /// Refresh token (for `refresh_token` grant)
    pub refresh_token: Option<String>,
}

/// Success body for `POST /oauth/token`
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Opaque bearer access token
    pub access_token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Advisory lifetime in seconds
    pub expires_in: i64,
    /// Rotation credential for the next refresh
    pub refresh_token: String,
    /// Signed OIDC identity assertion
    pub id_token: String,
    /// Granted scopes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// Body for the `GET /` welcome endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    /// Static greeting identifying the service
    pub message: String,
}

/// Success body for `GET /oauth/userinfo`
#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfoResponse {
    /// Authenticated subject identifier
    pub user_id: String,
    /// Scopes granted to the presented token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}
