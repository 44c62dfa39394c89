// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================

//! Authentication and credential-lifecycle module.

pub mod code_engine;
pub mod credentials;
pub mod service;
pub mod token;

pub use code_engine::{CodeEngine, CodeSource, IssuedCode, OsRngCodes};
pub use credentials::{CredentialVerifier, ScryptVerifier};
pub use service::AccountService;
pub use token::{SessionClaims, TokenIssuer};
