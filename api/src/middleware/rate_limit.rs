//! Rate limiting middleware for API endpoints
//!
//! Every request is charged to a per-caller key, `ip-limiter:{client ip}`,
//! in a shared sliding-window limiter. Limited requests get a 429 before any
//! other middleware or handler runs. What happens when the limiter itself
//! fails is the explicit [`FailurePolicy`] given at construction.

use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use wb_core::{allow_with_policy, RateLimiter};
use wb_shared::config::FailurePolicy;
use wb_shared::{error_codes, ApiResponse, ErrorBody};

/// Prefix of the per-caller limiter key
pub const KEY_PREFIX: &str = "ip-limiter";

/// Rate limiter middleware factory
pub struct RateLimit {
    limiter: Arc<dyn RateLimiter>,
    policy: FailurePolicy,
}

impl RateLimit {
    pub fn new(limiter: Arc<dyn RateLimiter>, policy: FailurePolicy) -> Self {
        Self { limiter, policy }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            policy: self.policy,
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<dyn RateLimiter>,
    policy: FailurePolicy,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let limiter = self.limiter.clone();
        let policy = self.policy;

        Box::pin(async move {
            let key = format!("{}:{}", KEY_PREFIX, get_client_ip(&req));

            match allow_with_policy(limiter.as_ref(), &key, policy).await {
                Ok(true) => service.call(req).await.map(ServiceResponse::map_into_left_body),
                Ok(false) => {
                    tracing::info!(key = %key, event = "request_rate_limited", "Request rate limited");
                    let response = HttpResponse::TooManyRequests().json(ErrorBody::new(
                        error_codes::RATE_LIMIT_EXCEEDED,
                        "Too many requests, please slow down",
                    ));
                    Ok(req.into_response(response).map_into_right_body())
                }
                // Fail-closed limiter fault, already logged by the policy
                Err(_) => {
                    let response =
                        HttpResponse::InternalServerError().json(ApiResponse::<()>::system_error());
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Extract client IP address from request
///
/// Honours `X-Forwarded-For`/`Forwarded` set by a fronting proxy, then falls
/// back to the peer address.
pub fn get_client_ip(req: &ServiceRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .map(|addr| strip_port(addr).to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn strip_port(addr: &str) -> &str {
    // Bracketed IPv6 with port
    if let Some(rest) = addr.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match addr.rsplit_once(':') {
        // A single colon separates an IPv4 address or hostname from its port
        Some((host, _)) if !host.contains(':') => host,
        _ => addr,
    }
}
