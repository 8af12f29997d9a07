//! JWT authentication middleware for protecting API endpoints.
//!
//! Extracts the bearer token from the `Authorization` header, validates it
//! against the requesting device (its `User-Agent`) and the session store,
//! and injects an [`AuthContext`] into the request. Paths on the allow-list
//! skip every check. Any failure ends the request with an empty 401.

use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::{
        HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_EXPOSE_HEADERS, AUTHORIZATION,
        USER_AGENT,
    },
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use wb_core::{DomainError, TokenService};

/// Response header carrying a new or renewed access token
pub const ACCESS_TOKEN_HEADER: &str = "x-jwt-token";

/// Response header carrying a new refresh token
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

/// Value of `Access-Control-Expose-Headers` on responses carrying tokens
pub const EXPOSED_TOKEN_HEADERS: &str = "x-jwt-token, x-refresh-token";

/// Authenticated caller, available to handlers as an extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: String,
    pub session_id: String,
}

/// JWT authentication middleware factory
pub struct JwtAuth {
    tokens: Arc<TokenService>,
    ignore_paths: Rc<Vec<String>>,
}

impl JwtAuth {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self {
            tokens,
            ignore_paths: Rc::new(Vec::new()),
        }
    }

    /// Exact request paths that are served without authentication
    pub fn ignore_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let mut all = (*self.ignore_paths).clone();
        all.extend(paths.into_iter().map(Into::into));
        self.ignore_paths = Rc::new(all);
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
            ignore_paths: self.ignore_paths.clone(),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    tokens: Arc<TokenService>,
    ignore_paths: Rc<Vec<String>>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let tokens = self.tokens.clone();
        let skip = self.ignore_paths.iter().any(|p| p.as_str() == req.path());

        Box::pin(async move {
            if skip {
                return service.call(req).await.map(ServiceResponse::map_into_left_body);
            }

            let Some(token) = extract_bearer_token(req.headers()) else {
                return Ok(unauthorized(req));
            };
            let fingerprint = device_fingerprint(req.headers());

            let grant = match tokens.validate_access(&token, &fingerprint).await {
                Ok(grant) => grant,
                Err(e) => {
                    log_rejection(&e, req.path());
                    return Ok(unauthorized(req));
                }
            };

            req.extensions_mut().insert(AuthContext {
                user_id: grant.subject().to_string(),
                session_id: grant.session_id().to_string(),
            });

            let mut res = service.call(req).await?;
            if let Some(renewed) = grant.renewed_token {
                if let Ok(value) = HeaderValue::from_str(&renewed) {
                    let headers = res.headers_mut();
                    headers.insert(HeaderName::from_static(ACCESS_TOKEN_HEADER), value);
                    headers.insert(
                        ACCESS_CONTROL_EXPOSE_HEADERS,
                        HeaderValue::from_static(EXPOSED_TOKEN_HEADERS),
                    );
                }
            }
            Ok(res.map_into_left_body())
        })
    }
}

fn unauthorized<B>(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
    req.into_response(HttpResponse::Unauthorized().finish())
        .map_into_right_body()
}

fn log_rejection(error: &DomainError, path: &str) {
    if error.is_system_error() {
        tracing::error!(path = path, error = %error, "Session lookup failed during authentication");
    } else {
        tracing::debug!(path = path, reason = %error, "Rejected access token");
    }
}

/// Extracts Bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// The device identifier bound into access tokens: the client's user agent
pub fn device_fingerprint(headers: &HeaderMap) -> String {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}
