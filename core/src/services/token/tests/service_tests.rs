//! Unit tests for the token service

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};

use crate::domain::entities::token::{Claims, JWT_AUDIENCE, JWT_ISSUER};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{MockSessionStore, SessionStore};
use crate::services::token::{TokenService, TokenServiceConfig};

const UA_A: &str = "Mozilla/5.0 (iPhone) UA-A";
const UA_B: &str = "Mozilla/5.0 (Android) UA-B";

fn create_service() -> (TokenService, MockSessionStore) {
    let store = MockSessionStore::new();
    let service = TokenService::new(Arc::new(store.clone()), TokenServiceConfig::default())
        .expect("valid config");
    (service, store)
}

fn token_error(result: Result<impl std::fmt::Debug, DomainError>) -> TokenError {
    match result {
        Err(DomainError::Token(e)) => e,
        other => panic!("expected token error, got {other:?}"),
    }
}

/// Sign an access token for an existing session with a hand-picked expiry
async fn access_token_expiring_in(
    service: &TokenService,
    store: &MockSessionStore,
    seconds: i64,
) -> String {
    store
        .create("sid-crafted", "42", StdDuration::from_secs(3600))
        .await
        .unwrap();
    let mut claims = Claims::new_access_token("42", "sid-crafted", UA_A, Duration::minutes(15));
    claims.exp = Utc::now().timestamp() + seconds;
    service.encode_jwt(&claims).unwrap()
}

#[tokio::test]
async fn test_issue_and_validate() {
    let (service, store) = create_service();

    let pair = service.issue_tokens("42", UA_A).await.unwrap();
    assert_eq!(store.active_count().await, 1);
    assert_eq!(pair.access_expires_in, 900);
    assert_eq!(pair.refresh_expires_in, 604800);

    let grant = service.validate_access(&pair.access_token, UA_A).await.unwrap();
    assert_eq!(grant.subject(), "42");
    assert_eq!(grant.session_id(), pair.session_id);
    assert_eq!(grant.claims.iss, JWT_ISSUER);
    assert_eq!(grant.claims.aud, JWT_AUDIENCE);
    assert!(grant.renewed_token.is_none());
}

#[tokio::test]
async fn test_device_mismatch_is_rejected() {
    let (service, _) = create_service();
    let pair = service.issue_tokens("42", UA_A).await.unwrap();

    let err = token_error(service.validate_access(&pair.access_token, UA_B).await);
    assert_eq!(err, TokenError::DeviceMismatch);
}

#[tokio::test]
async fn test_revoke_takes_effect_immediately() {
    let (service, _) = create_service();
    let pair = service.issue_tokens("42", UA_A).await.unwrap();

    service.revoke(&pair.session_id).await.unwrap();

    let err = token_error(service.validate_access(&pair.access_token, UA_A).await);
    assert_eq!(err, TokenError::Revoked);

    // Revoking twice is harmless
    service.revoke(&pair.session_id).await.unwrap();
}

#[tokio::test]
async fn test_revoking_one_session_keeps_others() {
    let (service, _) = create_service();
    let phone = service.issue_tokens("42", UA_A).await.unwrap();
    let tablet = service.issue_tokens("42", UA_B).await.unwrap();

    service.revoke(&phone.session_id).await.unwrap();

    assert!(service.validate_access(&tablet.access_token, UA_B).await.is_ok());
}

#[tokio::test]
async fn test_refresh_rotation_is_single_use() {
    let (service, store) = create_service();
    let original = service.issue_tokens("42", UA_A).await.unwrap();

    let rotated = service.refresh(&original.refresh_token, UA_A).await.unwrap();
    assert_ne!(rotated.session_id, original.session_id);
    assert_eq!(store.active_count().await, 1);

    let err = token_error(service.refresh(&original.refresh_token, UA_A).await);
    assert_eq!(err, TokenError::InvalidRefreshToken);

    // The old session is gone, the new one works
    let err = token_error(service.validate_access(&original.access_token, UA_A).await);
    assert_eq!(err, TokenError::Revoked);
    let grant = service.validate_access(&rotated.access_token, UA_A).await.unwrap();
    assert_eq!(grant.subject(), "42");
}

#[tokio::test]
async fn test_refresh_store_failure_leaves_caller_signed_out() {
    let (service, store) = create_service();
    let original = service.issue_tokens("42", UA_A).await.unwrap();

    store.set_reject_creates(true);
    let result = service.refresh(&original.refresh_token, UA_A).await;
    assert!(matches!(result, Err(DomainError::Store(_))));
    assert_eq!(store.active_count().await, 0);

    // Recovery does not revive the old token; only a fresh login works
    store.set_reject_creates(false);
    let err = token_error(service.refresh(&original.refresh_token, UA_A).await);
    assert_eq!(err, TokenError::InvalidRefreshToken);
    let err = token_error(service.validate_access(&original.access_token, UA_A).await);
    assert_eq!(err, TokenError::Revoked);

    let fresh = service.issue_tokens("42", UA_A).await.unwrap();
    assert!(service.validate_access(&fresh.access_token, UA_A).await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refresh_succeeds_once() {
    let (service, _) = create_service();
    let service = Arc::new(service);
    let original = service.issue_tokens("42", UA_A).await.unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = service.clone();
            let token = original.refresh_token.clone();
            tokio::spawn(async move { service.refresh(&token, UA_A).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn test_token_kinds_are_not_interchangeable() {
    let (service, _) = create_service();
    let pair = service.issue_tokens("42", UA_A).await.unwrap();

    let err = token_error(service.validate_access(&pair.refresh_token, UA_A).await);
    assert_eq!(err, TokenError::WrongType);

    let err = token_error(service.refresh(&pair.access_token, UA_A).await);
    assert_eq!(err, TokenError::InvalidRefreshToken);
}

#[tokio::test]
async fn test_accepted_before_expiry_rejected_at_expiry() {
    let (service, store) = create_service();

    let valid = access_token_expiring_in(&service, &store, 120).await;
    assert!(service.validate_access(&valid, UA_A).await.is_ok());

    let at_expiry = access_token_expiring_in(&service, &store, 0).await;
    let err = token_error(service.validate_access(&at_expiry, UA_A).await);
    assert_eq!(err, TokenError::Expired);

    let past = access_token_expiring_in(&service, &store, -60).await;
    let err = token_error(service.validate_access(&past, UA_A).await);
    assert_eq!(err, TokenError::Expired);
}

#[tokio::test]
async fn test_near_expiry_token_is_renewed() {
    let (service, store) = create_service();
    let token = access_token_expiring_in(&service, &store, 5).await;

    let grant = service.validate_access(&token, UA_A).await.unwrap();
    let renewed = grant.renewed_token.expect("token close to expiry is renewed");

    let renewed_grant = service.validate_access(&renewed, UA_A).await.unwrap();
    assert_eq!(renewed_grant.session_id(), "sid-crafted");
    assert!(renewed_grant.claims.exp > grant.claims.exp);
    assert!(renewed_grant.renewed_token.is_none());
}

#[tokio::test]
async fn test_renewal_does_not_bypass_checks() {
    let (service, store) = create_service();
    let token = access_token_expiring_in(&service, &store, 5).await;

    let err = token_error(service.validate_access(&token, UA_B).await);
    assert_eq!(err, TokenError::DeviceMismatch);

    store.revoke("sid-crafted").await.unwrap();
    let err = token_error(service.validate_access(&token, UA_A).await);
    assert_eq!(err, TokenError::Revoked);
}

#[tokio::test]
async fn test_not_yet_valid_token() {
    let (service, store) = create_service();
    store
        .create("sid-future", "42", StdDuration::from_secs(3600))
        .await
        .unwrap();
    let mut claims = Claims::new_access_token("42", "sid-future", UA_A, Duration::minutes(15));
    claims.nbf = Utc::now().timestamp() + 300;
    let token = service.encode_jwt(&claims).unwrap();

    let err = token_error(service.validate_access(&token, UA_A).await);
    assert_eq!(err, TokenError::NotYetValid);
}

#[tokio::test]
async fn test_tampered_and_foreign_tokens_are_malformed() {
    let (service, _) = create_service();
    let pair = service.issue_tokens("42", UA_A).await.unwrap();

    // Flip the first character of the signature segment
    let split = pair.access_token.rfind('.').unwrap() + 1;
    let (head, signature) = pair.access_token.split_at(split);
    let first = if signature.starts_with('A') { "B" } else { "A" };
    let tampered = format!("{head}{first}{}", &signature[1..]);
    let err = token_error(service.validate_access(&tampered, UA_A).await);
    assert_eq!(err, TokenError::Malformed);

    let foreign = TokenService::new(
        Arc::new(MockSessionStore::new()),
        TokenServiceConfig {
            jwt_secret: "another-secret".to_string(),
            ..Default::default()
        },
    )
    .unwrap()
    .issue_tokens("42", UA_A)
    .await
    .unwrap();
    let err = token_error(service.validate_access(&foreign.access_token, UA_A).await);
    assert_eq!(err, TokenError::Malformed);

    let err = token_error(service.validate_access("not.a.jwt", UA_A).await);
    assert_eq!(err, TokenError::Malformed);
}

#[tokio::test]
async fn test_session_store_fault_is_not_a_token_error() {
    let (service, store) = create_service();
    let pair = service.issue_tokens("42", UA_A).await.unwrap();

    store.set_unavailable(true);
    let result = service.validate_access(&pair.access_token, UA_A).await;
    assert!(matches!(result, Err(DomainError::Store(_))));

    let result = service.refresh(&pair.refresh_token, UA_A).await;
    assert!(matches!(result, Err(DomainError::Store(_))));
}

#[test]
fn test_empty_secret_is_rejected() {
    let result = TokenService::new(
        Arc::new(MockSessionStore::new()),
        TokenServiceConfig {
            jwt_secret: "  ".to_string(),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(DomainError::Internal { .. })));
}
