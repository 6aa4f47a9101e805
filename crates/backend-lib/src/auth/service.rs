use async_trait::async_trait;
use commerce_common::AuthenticatedIdentity;
use thiserror::Error;

/// Why the durable store rejected a credential pair
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("member not found")]
    NotFound,

    #[error("wrong password")]
    WrongPassword,

    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

/// Slow-path verification against the member store and its password hashes.
///
/// Called at most once per slow-path attempt. Timeouts, if any, are the
/// implementation's concern.
#[async_trait]
pub trait DurableVerifier: Send + Sync {
    async fn verify(&self, login_id: &str, raw_password: &str) -> Result<AuthenticatedIdentity, VerifyError>;
}
