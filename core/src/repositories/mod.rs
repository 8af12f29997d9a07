//! Storage seams implemented by the infrastructure layer.

pub mod code_store;
pub mod session;
pub mod user_directory;

pub use code_store::CodeStore;
pub use session::SessionStore;
pub use user_directory::UserDirectory;

#[cfg(test)]
pub use code_store::MockCodeStore;
#[cfg(test)]
pub use session::MockSessionStore;
