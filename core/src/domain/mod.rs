//! Domain layer containing business entities and value objects.

pub mod entities;
pub mod value_objects;

// Re-export commonly used domain types
pub use entities::{
    generate_code, is_well_formed, new_session_id, session_key, AccessGrant, Claims, CodePolicy,
    SessionState, TokenKind, TokenPair, VerificationCode, CODE_LENGTH, MAX_ATTEMPTS,
};
pub use value_objects::{CodeKey, LOGIN_BIZ};
