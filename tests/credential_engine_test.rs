// ABOUTME: Lifecycle tests for the credential engine: one-time use, rotation, claims, scope
// ABOUTME: Exercises the engine directly against in-memory stores with a real HS256 signer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Credo Project

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use credo::engine::{CredentialEngine, CredentialStores};
use credo::errors::OAuthError;
use credo::models::{AccessToken, Client};
use credo::registry::ClientRegistry;
use credo::signer::HmacIdentitySigner;
use credo::store::{
    AccessTokenRepository, AuthCodeRepository, InMemoryAccessTokenRepository,
    InMemoryAuthCodeRepository, InMemoryRefreshTokenRepository, RefreshTokenRepository,
};
use credo::tokens::SystemTokenGenerator;
use std::sync::Arc;

const ISSUER: &str = "https://issuer.test";
const SIGNING_KEY: &str = "test-signing-key";
const SUBJECT: &str = "user-123";

/// Engine plus handles to its collaborators so tests can observe store state.
struct Harness {
    engine: Arc<CredentialEngine>,
    signer: Arc<HmacIdentitySigner>,
    auth_codes: Arc<InMemoryAuthCodeRepository>,
    access_tokens: Arc<InMemoryAccessTokenRepository>,
    refresh_tokens: Arc<InMemoryRefreshTokenRepository>,
}

fn harness() -> Harness {
    let registry = Arc::new(ClientRegistry::new([
        Client {
            client_id: "c1".to_owned(),
            client_secret: "s1".to_owned(),
            redirect_uri: "https://cb".to_owned(),
        },
        Client {
            client_id: "c2".to_owned(),
            client_secret: "s2".to_owned(),
            redirect_uri: "https://cb2".to_owned(),
        },
    ]));
    let auth_codes = Arc::new(InMemoryAuthCodeRepository::default());
    let access_tokens = Arc::new(InMemoryAccessTokenRepository::default());
    let refresh_tokens = Arc::new(InMemoryRefreshTokenRepository::default());
    let signer = Arc::new(HmacIdentitySigner::new(SIGNING_KEY, ISSUER));

    let engine = CredentialEngine::new(
        registry,
        CredentialStores {
            auth_codes: auth_codes.clone(),
            access_tokens: access_tokens.clone(),
            refresh_tokens: refresh_tokens.clone(),
        },
        signer.clone(),
        Arc::new(SystemTokenGenerator),
        SUBJECT,
    );

    Harness {
        engine: Arc::new(engine),
        signer,
        auth_codes,
        access_tokens,
        refresh_tokens,
    }
}

#[test]
fn issue_rejects_unknown_client_and_redirect_mismatch() {
    let h = harness();

    let unknown = h.engine.issue_authorization_code("nope", "https://cb", None);
    assert!(matches!(unknown, Err(OAuthError::InvalidClient(_))));

    let mismatch = h
        .engine
        .issue_authorization_code("c1", "https://evil.example", None);
    assert!(matches!(mismatch, Err(OAuthError::InvalidClient(_))));
}

#[test]
fn exchange_happy_path_carries_scope_and_expiry() {
    let h = harness();
    let code = h
        .engine
        .issue_authorization_code("c1", "https://cb", Some("openid"))
        .unwrap();

    let issued = h
        .engine
        .exchange_code_for_tokens("c1", "s1", "https://cb", &code.code)
        .unwrap();

    assert_eq!(issued.access_token.user_id, SUBJECT);
    assert_eq!(issued.access_token.scope.as_deref(), Some("openid"));
    assert_eq!(issued.access_token.expires_in, 3600);

    let resolved = h
        .engine
        .resolve_access_token(&issued.access_token.access_token)
        .unwrap();
    assert_eq!(resolved.user_id, SUBJECT);
    assert_eq!(resolved.scope.as_deref(), Some("openid"));
}

#[test]
fn authorization_code_is_single_use() {
    let h = harness();
    let code = h
        .engine
        .issue_authorization_code("c1", "https://cb", Some("openid"))
        .unwrap();

    h.engine
        .exchange_code_for_tokens("c1", "s1", "https://cb", &code.code)
        .unwrap();

    let replay = h
        .engine
        .exchange_code_for_tokens("c1", "s1", "https://cb", &code.code);
    assert!(matches!(replay, Err(OAuthError::InvalidGrant(_))));
}

#[test]
fn wrong_secret_fails_without_consuming_the_code() {
    let h = harness();
    let code = h
        .engine
        .issue_authorization_code("c1", "https://cb", None)
        .unwrap();

    let rejected = h
        .engine
        .exchange_code_for_tokens("c1", "wrong-secret", "https://cb", &code.code);
    assert!(matches!(rejected, Err(OAuthError::InvalidClient(_))));

    // Client validation happens before the code is touched; a correct
    // attempt afterwards still succeeds.
    assert!(h.auth_codes.get(&code.code).is_some());
    h.engine
        .exchange_code_for_tokens("c1", "s1", "https://cb", &code.code)
        .unwrap();
}

#[test]
fn code_owned_by_another_client_is_rejected_and_kept() {
    let h = harness();
    let code = h
        .engine
        .issue_authorization_code("c1", "https://cb", None)
        .unwrap();

    let stolen = h
        .engine
        .exchange_code_for_tokens("c2", "s2", "https://cb2", &code.code);
    assert!(matches!(stolen, Err(OAuthError::InvalidGrant(_))));

    // The rightful owner can still redeem it.
    h.engine
        .exchange_code_for_tokens("c1", "s1", "https://cb", &code.code)
        .unwrap();
}

#[test]
fn identity_assertion_claims_are_well_formed() {
    let h = harness();
    let code = h
        .engine
        .issue_authorization_code("c1", "https://cb", Some("openid profile"))
        .unwrap();
    let issued = h
        .engine
        .exchange_code_for_tokens("c1", "s1", "https://cb", &code.code)
        .unwrap();

    let claims = h.signer.verify(&issued.id_token).unwrap();
    assert_eq!(claims.sub, SUBJECT);
    assert_eq!(claims.aud, "c1");
    assert_eq!(claims.iss, ISSUER);
    assert_eq!(claims.exp - claims.iat, issued.access_token.expires_in);
    assert_eq!(claims.scope.as_deref(), Some("openid profile"));
}

#[test]
fn absent_scope_stays_absent_through_exchange_and_rotation() {
    let h = harness();
    let code = h
        .engine
        .issue_authorization_code("c1", "https://cb", None)
        .unwrap();
    let issued = h
        .engine
        .exchange_code_for_tokens("c1", "s1", "https://cb", &code.code)
        .unwrap();
    assert!(issued.access_token.scope.is_none());

    let rotated = h
        .engine
        .rotate_refresh_token("c1", "s1", &issued.refresh_token)
        .unwrap();
    assert!(rotated.access_token.scope.is_none());

    let claims = h.signer.verify(&rotated.id_token).unwrap();
    assert!(claims.scope.is_none());
}

#[test]
fn rotation_chain_invalidates_exactly_the_predecessor() {
    let h = harness();
    let code = h
        .engine
        .issue_authorization_code("c1", "https://cb", Some("openid"))
        .unwrap();
    let first = h
        .engine
        .exchange_code_for_tokens("c1", "s1", "https://cb", &code.code)
        .unwrap();

    let mut spent = vec![first.refresh_token.clone()];
    let mut current = first;
    for _ in 0..3 {
        current = h
            .engine
            .rotate_refresh_token("c1", "s1", &spent.last().unwrap().clone())
            .unwrap();
        assert_eq!(current.access_token.scope.as_deref(), Some("openid"));
        assert_eq!(current.access_token.user_id, SUBJECT);
        spent.push(current.refresh_token.clone());
    }

    // Every already-consumed value stays invalid, both at the engine and at
    // the association store.
    for old in &spent[..spent.len() - 1] {
        let replay = h.engine.rotate_refresh_token("c1", "s1", old);
        assert!(matches!(replay, Err(OAuthError::InvalidGrant(_))));
        assert!(h.refresh_tokens.get(old).is_none());
    }

    // The head of the chain is still live.
    assert!(h.refresh_tokens.get(spent.last().unwrap()).is_some());
}

#[test]
fn rotation_checks_secret_but_not_redirect() {
    let h = harness();
    let code = h
        .engine
        .issue_authorization_code("c1", "https://cb", None)
        .unwrap();
    let issued = h
        .engine
        .exchange_code_for_tokens("c1", "s1", "https://cb", &code.code)
        .unwrap();

    let wrong_secret = h
        .engine
        .rotate_refresh_token("c1", "nope", &issued.refresh_token);
    assert!(matches!(wrong_secret, Err(OAuthError::InvalidClient(_))));

    // The failed attempt did not consume the refresh token, and no redirect
    // URI is involved at this step at all.
    h.engine
        .rotate_refresh_token("c1", "s1", &issued.refresh_token)
        .unwrap();
}

#[test]
fn rotation_rejects_refresh_token_of_another_client() {
    let h = harness();
    let code = h
        .engine
        .issue_authorization_code("c1", "https://cb", None)
        .unwrap();
    let issued = h
        .engine
        .exchange_code_for_tokens("c1", "s1", "https://cb", &code.code)
        .unwrap();

    // A different registered client with its own valid secret must not be
    // able to rotate the lineage and mint an assertion with itself as
    // audience.
    let hijack = h
        .engine
        .rotate_refresh_token("c2", "s2", &issued.refresh_token);
    assert!(matches!(hijack, Err(OAuthError::InvalidGrant(_))));

    // The record stays owned by c1 and is still rotatable by it.
    assert!(h.refresh_tokens.get(&issued.refresh_token).is_some());
    let rotated = h
        .engine
        .rotate_refresh_token("c1", "s1", &issued.refresh_token)
        .unwrap();
    let claims = h.signer.verify(&rotated.id_token).unwrap();
    assert_eq!(claims.aud, "c1");
}

#[test]
fn resolve_unknown_token_is_invalid_token() {
    let h = harness();
    let missing = h.engine.resolve_access_token("no-such-token");
    assert!(matches!(missing, Err(OAuthError::InvalidToken(_))));
}

#[test]
fn expiry_is_advisory_and_not_enforced_on_resolution() {
    let h = harness();

    // Plant a token whose advisory lifetime has trivially elapsed. No absolute
    // timestamp is stored, so resolution must still succeed.
    let mut stale = AccessToken::new("stale-token".to_owned(), SUBJECT.to_owned(), None);
    stale.expires_in = 0;
    h.access_tokens.save(stale);

    let resolved = h.engine.resolve_access_token("stale-token").unwrap();
    assert_eq!(resolved.user_id, SUBJECT);
}

#[test]
fn concurrent_exchanges_of_one_code_admit_exactly_one_winner() {
    let h = harness();
    let code = h
        .engine
        .issue_authorization_code("c1", "https://cb", None)
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = h.engine.clone();
        let code_value = code.code.clone();
        handles.push(std::thread::spawn(move || {
            engine
                .exchange_code_for_tokens("c1", "s1", "https://cb", &code_value)
                .is_ok()
        }));
    }

    let successes = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1);
}

#[test]
fn scenario_from_the_reference_demo() {
    let h = harness();

    let code = h
        .engine
        .issue_authorization_code("c1", "https://cb", Some("openid"))
        .unwrap();
    let issued = h
        .engine
        .exchange_code_for_tokens("c1", "s1", "https://cb", &code.code)
        .unwrap();
    assert_eq!(issued.access_token.scope.as_deref(), Some("openid"));
    assert_eq!(issued.access_token.expires_in, 3600);

    let replay = h
        .engine
        .exchange_code_for_tokens("c1", "s1", "https://cb", &code.code);
    assert!(matches!(replay, Err(OAuthError::InvalidGrant(_))));
}
