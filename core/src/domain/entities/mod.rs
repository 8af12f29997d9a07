//! Domain entities representing core business objects.

pub mod session;
pub mod token;
pub mod verification_code;

// Re-export commonly used types
pub use session::{new_session_id, session_key, SessionState};
pub use token::{
    AccessGrant, Claims, TokenKind, TokenPair, ACCESS_TOKEN_EXPIRY_MINUTES, JWT_AUDIENCE,
    JWT_ISSUER, REFRESH_TOKEN_EXPIRY_DAYS,
};
pub use verification_code::{
    generate_code, is_well_formed, CodePolicy, VerificationCode, CODE_LENGTH,
    DEFAULT_EXPIRATION_SECONDS, MAX_ATTEMPTS, RESEND_COOLDOWN_SECONDS,
};
