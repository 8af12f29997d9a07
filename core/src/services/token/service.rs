//! Main token service implementation

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::session::new_session_id;
use crate::domain::entities::token::{AccessGrant, Claims, TokenKind, TokenPair};
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::SessionStore;

use super::config::TokenServiceConfig;

/// Mints and checks JWT credentials backed by server-side sessions.
///
/// Tokens are stateless; the only server state is the liveness of each
/// session id, so revoking a session invalidates every token bound to it.
pub struct TokenService {
    sessions: Arc<dyn SessionStore>,
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Errors
    ///
    /// `DomainError::Internal` when the secret is empty or the algorithm is
    /// not an HMAC one; callers treat this as a startup failure.
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        config: TokenServiceConfig,
    ) -> Result<Self, DomainError> {
        if config.jwt_secret.trim().is_empty() {
            return Err(DomainError::Internal {
                message: "JWT signing secret must not be empty".to_string(),
            });
        }
        if !matches!(
            config.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(DomainError::Internal {
                message: format!("Unsupported JWT algorithm {:?}", config.algorithm),
            });
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "sub", "iss", "aud"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Ok(Self {
            sessions,
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Starts a session for `subject` on the device identified by
    /// `fingerprint` and returns its token pair
    pub async fn issue_tokens(&self, subject: &str, fingerprint: &str) -> DomainResult<TokenPair> {
        let session_id = new_session_id();
        let lifetime = std::time::Duration::from_secs(
            self.config.refresh_token_expiry_seconds.max(0) as u64,
        );
        self.sessions.create(&session_id, subject, lifetime).await?;

        let pair = self.sign_pair(subject, &session_id, fingerprint)?;
        tracing::info!(
            subject = subject,
            session_id = %session_id,
            event = "session_created",
            "Issued new token pair"
        );
        Ok(pair)
    }

    /// Validates an access token presented from the device `fingerprint`
    ///
    /// Checks run in order: signature and time window, token kind, device
    /// fingerprint, session liveness. When the token has less than the
    /// renewal threshold left, a replacement bound to the same session is
    /// returned in [`AccessGrant::renewed_token`].
    ///
    /// # Errors
    ///
    /// * `TokenError::Expired` / `NotYetValid` / `Malformed` / `WrongType`
    /// * `TokenError::DeviceMismatch` - logged as a possible token theft
    /// * `TokenError::Revoked` - the session is no longer live
    /// * `StoreError` - the session lookup failed
    pub async fn validate_access(&self, token: &str, fingerprint: &str) -> DomainResult<AccessGrant> {
        let claims = self.decode_jwt(token)?;
        if claims.typ != TokenKind::Access {
            return Err(TokenError::WrongType.into());
        }

        let now = Utc::now().timestamp();
        if claims.is_expired_at(now) {
            return Err(TokenError::Expired.into());
        }

        if claims.fgp.as_deref() != Some(fingerprint) {
            tracing::warn!(
                subject = %claims.sub,
                session_id = %claims.sid,
                event = "token_device_mismatch",
                alert = true,
                "Access token presented from a different device"
            );
            return Err(TokenError::DeviceMismatch.into());
        }

        if !self.sessions.state(&claims.sid).await?.is_active() {
            return Err(TokenError::Revoked.into());
        }

        let renewed_token = if claims.seconds_left(now) < self.config.renewal_threshold_seconds {
            let renewed = self.access_claims(&claims.sub, &claims.sid, fingerprint);
            tracing::debug!(
                subject = %claims.sub,
                session_id = %claims.sid,
                event = "access_token_renewed",
                "Renewed access token close to expiry"
            );
            Some(self.encode_jwt(&renewed)?)
        } else {
            None
        };

        Ok(AccessGrant {
            claims,
            renewed_token,
        })
    }

    /// Rotates a refresh token into a new session and token pair
    ///
    /// The old session is revoked as part of the rotation, so each refresh
    /// token succeeds at most once; a replay fails even if the token has not
    /// expired.
    ///
    /// Revocation comes first and is not undone. If the store then fails to
    /// record the new session, the caller is left signed out and must log in
    /// again; the old refresh token never becomes usable a second time.
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidRefreshToken` - bad, expired, wrong-kind or
    ///   already-rotated token
    /// * `StoreError` - the session store failed
    pub async fn refresh(&self, refresh_token: &str, fingerprint: &str) -> DomainResult<TokenPair> {
        let claims = match self.decode_jwt(refresh_token) {
            Ok(claims) => claims,
            Err(DomainError::Token(reason)) => {
                tracing::debug!(reason = %reason, "Rejected refresh token");
                return Err(TokenError::InvalidRefreshToken.into());
            }
            Err(e) => return Err(e),
        };

        if claims.typ != TokenKind::Refresh || claims.is_expired_at(Utc::now().timestamp()) {
            return Err(TokenError::InvalidRefreshToken.into());
        }

        // Only the caller that actually revokes the old session may rotate.
        if !self.sessions.revoke(&claims.sid).await? {
            tracing::warn!(
                subject = %claims.sub,
                session_id = %claims.sid,
                event = "refresh_token_reuse",
                "Refresh token presented for an inactive session"
            );
            return Err(TokenError::InvalidRefreshToken.into());
        }

        tracing::info!(
            subject = %claims.sub,
            session_id = %claims.sid,
            event = "session_rotated",
            "Rotated session on refresh"
        );
        self.issue_tokens(&claims.sub, fingerprint)
            .await
            .map_err(|e| {
                tracing::error!(
                    subject = %claims.sub,
                    revoked_session_id = %claims.sid,
                    error = %e,
                    event = "session_rotation_incomplete",
                    "Old session revoked but the new one was not issued"
                );
                e
            })
    }

    /// Revokes `session_id`; effective for the very next request
    ///
    /// Revoking an unknown or already revoked session is not an error.
    pub async fn revoke(&self, session_id: &str) -> DomainResult<()> {
        let was_active = self.sessions.revoke(session_id).await?;
        tracing::info!(
            session_id = session_id,
            was_active = was_active,
            event = "session_revoked",
            "Revoked session"
        );
        Ok(())
    }

    fn sign_pair(&self, subject: &str, session_id: &str, fingerprint: &str) -> DomainResult<TokenPair> {
        let access = self.access_claims(subject, session_id, fingerprint);
        let refresh = Claims::new_refresh_token(
            subject,
            session_id,
            Duration::seconds(self.config.refresh_token_expiry_seconds),
        )
        .with_issuer(&self.config.issuer, &self.config.audience);

        Ok(TokenPair {
            access_token: self.encode_jwt(&access)?,
            refresh_token: self.encode_jwt(&refresh)?,
            session_id: session_id.to_string(),
            access_expires_in: self.config.access_token_expiry_seconds,
            refresh_expires_in: self.config.refresh_token_expiry_seconds,
        })
    }

    fn access_claims(&self, subject: &str, session_id: &str, fingerprint: &str) -> Claims {
        Claims::new_access_token(
            subject,
            session_id,
            fingerprint,
            Duration::seconds(self.config.access_token_expiry_seconds),
        )
        .with_issuer(&self.config.issuer, &self.config.audience)
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::GenerationFailed))
    }

    fn decode_jwt(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::ImmatureSignature => TokenError::NotYetValid,
                    _ => TokenError::Malformed,
                };
                DomainError::Token(reason)
            })
    }
}
