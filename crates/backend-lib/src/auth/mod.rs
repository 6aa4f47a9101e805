// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod cache;
pub mod decider;
pub mod digest;
pub mod password;
pub mod policy;
mod service;

pub use cache::{CachedCredential, CredentialCache, DEFAULT_MAX_ENTRIES, DEFAULT_TTL};
pub use decider::{AuthError, AuthenticationDecider};
pub use digest::credential_digest;
pub use password::CredentialHasher;
pub use policy::{validate_password, CharacterClass, CharacterRule, PasswordPolicy, PolicyViolation};
pub use service::{DurableVerifier, VerifyError};
