//! Application state and factory
//!
//! This module handles the initialization of the application state
//! and provides the factory for creating the Actix-web application.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Condition,
    web, App, Error,
};
use tracing_actix_web::TracingLogger;
use wb_core::{
    CodeService, CodeServiceConfig, DomainError, RateLimitedSmsSender, RateLimiter, SmsSender,
    TokenService, TokenServiceConfig, UserDirectory,
};
use wb_infra::{cache::RedisClient, InfrastructureServices};
use wb_shared::config::{AppConfig, AuthPathConfig, RateLimitConfig};

use crate::handlers::json_error_handler;
use crate::middleware::{JwtAuth, RateLimit};
use crate::routes;

/// Services shared by every worker
pub struct AppState {
    pub codes: Arc<CodeService>,
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserDirectory>,
    pub api_limiter: Arc<dyn RateLimiter>,
    pub rate_limit: RateLimitConfig,
    pub auth_paths: AuthPathConfig,
    /// Probed by the health check when present
    pub redis: Option<RedisClient>,
}

impl AppState {
    /// Assemble the services from infrastructure, an SMS gateway and a user
    /// directory
    ///
    /// When the SMS guard is enabled the gateway is wrapped so every dispatch
    /// first passes the shared outbound limiter. The guard has its own switch
    /// and stays on when inbound limiting is turned off.
    ///
    /// # Errors
    ///
    /// `DomainError::Internal` when the token service rejects its signing
    /// configuration.
    pub fn new(
        config: &AppConfig,
        infra: InfrastructureServices,
        sms: Arc<dyn SmsSender>,
        users: Arc<dyn UserDirectory>,
    ) -> Result<Self, DomainError> {
        let guard = &config.rate_limit.sms;
        let sms: Arc<dyn SmsSender> = if guard.enabled {
            Arc::new(RateLimitedSmsSender::new(
                sms,
                infra.sms_limiter.clone(),
                guard.key.clone(),
                guard.limit.failure_policy,
            ))
        } else {
            sms
        };

        let tokens =
            TokenService::new(infra.sessions.clone(), TokenServiceConfig::from(&config.jwt))?;
        let codes = CodeService::new(
            infra.code_store.clone(),
            sms,
            CodeServiceConfig::from(&config.verification),
        );

        Ok(Self {
            codes: Arc::new(codes),
            tokens: Arc::new(tokens),
            users,
            api_limiter: infra.api_limiter,
            rate_limit: config.rate_limit.clone(),
            auth_paths: config.auth_paths.clone(),
            redis: infra.redis,
        })
    }
}

/// Create and configure the application with all dependencies
///
/// Middleware runs outermost first: request tracing, then inbound rate
/// limiting, then authentication.
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let auth = JwtAuth::new(state.tokens.clone())
        .ignore_paths(state.auth_paths.ignore_paths.iter().cloned());
    let rate_limit = RateLimit::new(
        state.api_limiter.clone(),
        state.rate_limit.api.failure_policy,
    );
    let limit_enabled = state.rate_limit.enabled;

    App::new()
        .app_data(state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .configure(routes::configure)
        .wrap(auth)
        .wrap(Condition::new(limit_enabled, rate_limit))
        .wrap(TracingLogger::default())
}
