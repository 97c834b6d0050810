// ABOUTME: HTTP route handlers for the authorize, token and userinfo endpoints
// ABOUTME: Parses the wire surface, delegates to the engine, maps errors without oracle leakage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Credo Project

use crate::errors::OAuthError;
use crate::models::{
    AuthorizeParams, TokenRequest, TokenResponse, UserInfoResponse, WelcomeResponse,
};
use crate::resources::ServerResources;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use std::sync::Arc;
use url::Url;

/// OAuth 2.0 endpoint routes
pub struct OAuthRoutes;

impl OAuthRoutes {
    /// Build the router for all OAuth endpoints.
    pub fn router(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::handle_index))
            .route("/oauth/authorize", get(Self::handle_authorize))
            .route("/oauth/token", post(Self::handle_token))
            .route("/oauth/userinfo", get(Self::handle_userinfo))
            .with_state(resources)
    }

    /// Handle `GET /`: static welcome banner.
    async fn handle_index() -> Json<WelcomeResponse> {
        Json(WelcomeResponse {
            message: "Welcome to the OAuth Server API!".to_owned(),
        })
    }

    /// Handle `GET /oauth/authorize`: issue a code and redirect back to the
    /// client with `code` and the echoed `state`.
    async fn handle_authorize(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<AuthorizeParams>,
    ) -> Result<Response, OAuthError> {
        if params.response_type != "code" {
            return Err(OAuthError::invalid_request("unsupported response_type"));
        }

        let auth_code = resources.engine.issue_authorization_code(
            &params.client_id,
            &params.redirect_uri,
            params.scope.as_deref(),
        )?;

        // The engine has already checked the redirect URI against the
        // registration; parsing failure here means the registered URI itself
        // is not a URL.
        let mut target = Url::parse(&params.redirect_uri)
            .map_err(|_| OAuthError::invalid_request("redirect_uri is not a valid URL"))?;
        target
            .query_pairs_mut()
            .append_pair("code", &auth_code.code);
        if let Some(state) = &params.state {
            target.query_pairs_mut().append_pair("state", state);
        }

        Ok((
            StatusCode::FOUND,
            [(header::LOCATION, target.to_string())],
        )
            .into_response())
    }

    /// Handle `POST /oauth/token` for the `authorization_code` and
    /// `refresh_token` grants.
    async fn handle_token(
        State(resources): State<Arc<ServerResources>>,
        Form(request): Form<TokenRequest>,
    ) -> Result<Json<TokenResponse>, OAuthError> {
        let issued = match request.grant_type.as_str() {
            "authorization_code" => {
                let code = request
                    .code
                    .ok_or_else(|| OAuthError::invalid_request("missing code"))?;
                let redirect_uri = request
                    .redirect_uri
                    .ok_or_else(|| OAuthError::invalid_request("missing redirect_uri"))?;
                resources.engine.exchange_code_for_tokens(
                    &request.client_id,
                    &request.client_secret,
                    &redirect_uri,
                    &code,
                )?
            }
            "refresh_token" => {
                let refresh_token = request
                    .refresh_token
                    .ok_or_else(|| OAuthError::invalid_request("missing refresh_token"))?;
                resources.engine.rotate_refresh_token(
                    &request.client_id,
                    &request.client_secret,
                    &refresh_token,
                )?
            }
            _ => return Err(OAuthError::invalid_request("unsupported grant_type")),
        };

        Ok(Json(TokenResponse {
            access_token: issued.access_token.access_token,
            token_type: "Bearer".to_owned(),
            expires_in: issued.access_token.expires_in,
            refresh_token: issued.refresh_token,
            id_token: issued.id_token,
            scope: issued.access_token.scope,
        }))
    }

    /// Handle `GET /oauth/userinfo` for a bearer access token.
    async fn handle_userinfo(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Json<UserInfoResponse>, OAuthError> {
        let token = Self::bearer_token(&headers)?;
        let resolved = resources.engine.resolve_access_token(token)?;
        Ok(Json(UserInfoResponse {
            user_id: resolved.user_id,
            scope: resolved.scope,
        }))
    }

    /// Extract the bearer token from the authorization header.
    fn bearer_token(headers: &HeaderMap) -> Result<&str, OAuthError> {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                OAuthError::invalid_token("missing or malformed authorization header")
            })
    }
}
