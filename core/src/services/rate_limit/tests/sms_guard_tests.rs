//! Tests for failure policies and the rate-limited SMS decorator

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::value_objects::LOGIN_BIZ;
use crate::errors::{DomainError, RateLimitError, StoreError};
use crate::repositories::MockCodeStore;
use crate::services::rate_limit::{
    allow_with_policy, FailurePolicy, RateLimitedSmsSender, RateLimiter,
};
use crate::services::verification::tests::mocks::{LogCapture, RecordingSmsSender};
use crate::services::verification::{CodeService, CodeServiceConfig, SmsSender};

/// Limiter answering from a script of outcomes, then always erroring
struct ScriptedLimiter {
    answers: Mutex<VecDeque<Result<bool, StoreError>>>,
    keys: Mutex<Vec<String>>,
}

impl ScriptedLimiter {
    fn new(answers: Vec<Result<bool, StoreError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            keys: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RateLimiter for ScriptedLimiter {
    async fn allow(&self, key: &str) -> Result<bool, DomainError> {
        self.keys.lock().unwrap().push(key.to_string());
        let answer = self.answers.lock().unwrap().pop_front().unwrap_or(Err(
            StoreError::Backend {
                message: "connection refused".to_string(),
            },
        ));
        answer.map_err(DomainError::from)
    }
}

fn args() -> (Vec<String>, Vec<String>) {
    (vec!["123456".to_string()], vec!["13588888888".to_string()])
}

#[tokio::test]
async fn test_fail_open_admits_on_error() {
    let limiter = ScriptedLimiter::new(vec![]);
    let allowed = allow_with_policy(&limiter, "ip:1.2.3.4", FailurePolicy::FailOpen)
        .await
        .unwrap();
    assert!(allowed);
}

#[tokio::test]
async fn test_fail_closed_surfaces_error() {
    let limiter = ScriptedLimiter::new(vec![]);
    let result = allow_with_policy(&limiter, "ip:1.2.3.4", FailurePolicy::FailClosed).await;
    assert!(matches!(result, Err(DomainError::Store(_))));
}

#[tokio::test]
async fn test_policy_does_not_change_healthy_answers() {
    for policy in [FailurePolicy::FailOpen, FailurePolicy::FailClosed] {
        let limiter = ScriptedLimiter::new(vec![Ok(true), Ok(false)]);
        assert!(allow_with_policy(&limiter, "k", policy).await.unwrap());
        assert!(!allow_with_policy(&limiter, "k", policy).await.unwrap());
    }
}

#[tokio::test]
async fn test_guard_dispatches_when_allowed() {
    let inner = RecordingSmsSender::new();
    let limiter = Arc::new(ScriptedLimiter::new(vec![Ok(true)]));
    let guarded = RateLimitedSmsSender::new(
        Arc::new(inner.clone()),
        limiter.clone(),
        "send:sms",
        FailurePolicy::FailClosed,
    );

    let (args, recipients) = args();
    guarded.send("tpl", &args, &recipients).await.unwrap();

    assert_eq!(inner.sent_count(), 1);
    assert_eq!(limiter.keys.lock().unwrap().as_slice(), ["send:sms"]);
}

#[tokio::test]
async fn test_guard_blocks_when_limited() {
    let inner = RecordingSmsSender::new();
    let guarded = RateLimitedSmsSender::new(
        Arc::new(inner.clone()),
        Arc::new(ScriptedLimiter::new(vec![Ok(false)])),
        "send:sms",
        FailurePolicy::FailOpen,
    );

    let (args, recipients) = args();
    let result = guarded.send("tpl", &args, &recipients).await;

    assert!(matches!(
        result,
        Err(DomainError::RateLimit(RateLimitError::Limited { ref key })) if key == "send:sms"
    ));
    assert_eq!(inner.sent_count(), 0);
}

#[tokio::test]
async fn test_guard_fail_closed_on_limiter_fault() {
    let inner = RecordingSmsSender::new();
    let guarded = RateLimitedSmsSender::new(
        Arc::new(inner.clone()),
        Arc::new(ScriptedLimiter::new(vec![])),
        "send:sms",
        FailurePolicy::FailClosed,
    );

    let (args, recipients) = args();
    let err = guarded.send("tpl", &args, &recipients).await.unwrap_err();
    assert!(err.is_system_error());
    assert_eq!(inner.sent_count(), 0);
}

#[tokio::test]
async fn test_guard_fail_open_on_limiter_fault() {
    let inner = RecordingSmsSender::new();
    let guarded = RateLimitedSmsSender::new(
        Arc::new(inner.clone()),
        Arc::new(ScriptedLimiter::new(vec![])),
        "send:sms",
        FailurePolicy::FailOpen,
    );

    let (args, recipients) = args();
    guarded.send("tpl", &args, &recipients).await.unwrap();
    assert_eq!(inner.sent_count(), 1);
}

#[tokio::test]
async fn test_outbound_limit_logs_below_error() {
    let logs = LogCapture::default();
    let _guard = logs.install();

    let inner = RecordingSmsSender::new();
    let guarded = RateLimitedSmsSender::new(
        Arc::new(inner.clone()),
        Arc::new(ScriptedLimiter::new(vec![Ok(false)])),
        "send:sms",
        FailurePolicy::FailClosed,
    );
    let codes = CodeService::new(
        Arc::new(MockCodeStore::new()),
        Arc::new(guarded),
        CodeServiceConfig::default(),
    );

    let result = codes.send(LOGIN_BIZ, "13588888888").await;
    assert!(matches!(result, Err(DomainError::RateLimit(_))));
    assert_eq!(inner.sent_count(), 0);

    let output = logs.contents();
    assert!(output.contains("otp_dispatch_throttled"), "{output}");
    assert!(!output.contains("ERROR"), "{output}");
}

#[tokio::test]
async fn test_gateway_failure_still_logs_error() {
    let logs = LogCapture::default();
    let _guard = logs.install();

    let codes = CodeService::new(
        Arc::new(MockCodeStore::new()),
        Arc::new(RecordingSmsSender::failing()),
        CodeServiceConfig::default(),
    );

    let result = codes.send(LOGIN_BIZ, "13588888888").await;
    assert!(result.unwrap_err().is_system_error());

    let output = logs.contents();
    assert!(output.contains("ERROR"), "{output}");
    assert!(output.contains("otp_dispatch_failed"), "{output}");
}
