//! Token entities for JWT-based sessions.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token expiration time (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Refresh token expiration time (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// JWT issuer
pub const JWT_ISSUER: &str = "webook";

/// JWT audience
pub const JWT_AUDIENCE: &str = "webook-api";

/// Which of the two credentials a JWT is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Session id this token is bound to
    pub sid: String,

    /// Device fingerprint (client user agent); access tokens only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fgp: Option<String>,

    /// Token kind, so a refresh token is never accepted as an access token
    pub typ: TokenKind,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates new claims for an access token valid for `ttl`
    pub fn new_access_token(
        subject: &str,
        session_id: &str,
        fingerprint: &str,
        ttl: Duration,
    ) -> Self {
        let mut claims = Self::base(subject, session_id, TokenKind::Access, ttl);
        claims.fgp = Some(fingerprint.to_string());
        claims
    }

    /// Creates new claims for a refresh token valid for `ttl`
    pub fn new_refresh_token(subject: &str, session_id: &str, ttl: Duration) -> Self {
        Self::base(subject, session_id, TokenKind::Refresh, ttl)
    }

    fn base(subject: &str, session_id: &str, typ: TokenKind, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.to_string(),
            sid: session_id.to_string(),
            fgp: None,
            typ,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: JWT_ISSUER.to_string(),
            aud: JWT_AUDIENCE.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Overrides issuer and audience
    pub fn with_issuer(mut self, issuer: &str, audience: &str) -> Self {
        self.iss = issuer.to_string();
        self.aud = audience.to_string();
        self
    }

    /// Checks if the claims have expired at `now` (unix seconds)
    ///
    /// A token is rejected at its expiry second, not one second after.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// Seconds left before expiry at `now`
    pub fn seconds_left(&self, now: i64) -> i64 {
        self.exp - now
    }
}

/// Access and refresh token pair returned by login and refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Session both tokens are bound to
    pub session_id: String,

    /// Access token expiration in seconds
    pub access_expires_in: i64,

    /// Refresh token expiration in seconds
    pub refresh_expires_in: i64,
}

/// Result of a successful access token validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    /// The verified claims
    pub claims: Claims,

    /// Replacement access token, minted when the presented one was close to
    /// expiry
    pub renewed_token: Option<String>,
}

impl AccessGrant {
    pub fn subject(&self) -> &str {
        &self.claims.sub
    }

    pub fn session_id(&self) -> &str {
        &self.claims.sid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_claims_carry_fingerprint() {
        let claims = Claims::new_access_token("42", "sid-1", "UA-A", Duration::minutes(15));
        assert_eq!(claims.typ, TokenKind::Access);
        assert_eq!(claims.fgp.as_deref(), Some("UA-A"));
        assert_eq!(claims.exp - claims.iat, 900);
        assert_eq!(claims.iss, JWT_ISSUER);
    }

    #[test]
    fn test_refresh_claims_have_no_fingerprint() {
        let claims = Claims::new_refresh_token("42", "sid-1", Duration::days(7));
        assert_eq!(claims.typ, TokenKind::Refresh);
        assert!(claims.fgp.is_none());

        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("fgp").is_none());
        assert_eq!(json["typ"], "refresh");
    }

    #[test]
    fn test_expiry_boundary() {
        let claims = Claims::new_access_token("42", "sid-1", "UA-A", Duration::seconds(10));
        assert!(!claims.is_expired_at(claims.exp - 1));
        assert!(claims.is_expired_at(claims.exp));
        assert_eq!(claims.seconds_left(claims.exp - 3), 3);
    }

    #[test]
    fn test_unique_token_ids() {
        let a = Claims::new_refresh_token("42", "sid-1", Duration::days(7));
        let b = Claims::new_refresh_token("42", "sid-1", Duration::days(7));
        assert_ne!(a.jti, b.jti);
    }
}
