//! Shared setup for the HTTP tests: in-memory infrastructure plus a mock
//! SMS gateway the tests read codes back from.

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{dev::ServiceResponse, http::header::USER_AGENT, test::TestRequest, web};
use serde_json::json;
use wb_api::AppState;
use wb_infra::{sms::MockSmsService, users::MemoryUserDirectory, InfrastructureServices};
use wb_shared::config::AppConfig;

pub const PHONE: &str = "13588888888";
pub const UA_A: &str = "Mozilla/5.0 (device A)";
pub const UA_B: &str = "Mozilla/5.0 (device B)";

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub sms: MockSmsService,
}

pub fn context() -> TestContext {
    context_with(AppConfig::development())
}

pub fn context_with(config: AppConfig) -> TestContext {
    let infra = InfrastructureServices::in_memory(&config);
    let sms = MockSmsService::new();
    let state = AppState::new(
        &config,
        infra,
        Arc::new(sms.clone()),
        Arc::new(MemoryUserDirectory::new()),
    )
    .expect("test configuration is valid");

    TestContext {
        state: web::Data::new(state),
        sms,
    }
}

pub fn send_code_request(phone: &str) -> TestRequest {
    TestRequest::post()
        .uri("/users/login_sms/code/send")
        .set_json(json!({ "phone": phone }))
}

pub fn login_request(code: &str, user_agent: &str) -> TestRequest {
    TestRequest::post()
        .uri("/users/login_sms")
        .insert_header((USER_AGENT, user_agent))
        .set_json(json!({ "phone": PHONE, "code": code }))
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("authorization", format!("Bearer {token}"))
}

/// A code that differs from `code` in every position
pub fn wrong_code(code: &str) -> String {
    code.chars()
        .map(|c| if c == '0' { '1' } else { '0' })
        .collect()
}

/// Token pair taken from the response headers
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
}

pub fn header<B>(resp: &ServiceResponse<B>, name: &str) -> Option<String> {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub fn tokens_from<B>(resp: &ServiceResponse<B>) -> Tokens {
    Tokens {
        access_token: header(resp, "x-jwt-token").expect("x-jwt-token header"),
        refresh_token: header(resp, "x-refresh-token").expect("x-refresh-token header"),
    }
}

/// Send a login code to [`PHONE`] and log in with it from `$ua`
macro_rules! login {
    ($app:expr, $ctx:expr, $ua:expr) => {{
        let send = crate::common::send_code_request(crate::common::PHONE).to_request();
        let sent = actix_web::test::call_service($app, send).await;
        assert_eq!(sent.status(), 200);
        let code = $ctx
            .sms
            .last_code_for(crate::common::PHONE)
            .await
            .expect("code was dispatched");
        let login = crate::common::login_request(&code, $ua).to_request();
        let resp = actix_web::test::call_service($app, login).await;
        assert_eq!(resp.status(), 200);
        crate::common::tokens_from(&resp)
    }};
}
