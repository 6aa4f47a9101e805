// ============================
// crates/backend-lib/src/auth/decider.rs
// ============================
//! Per-request authentication: cache fast path, durable slow path.
use crate::auth::cache::{CachedCredential, CredentialCache};
use crate::auth::service::{DurableVerifier, VerifyError};
use crate::metrics::{AUTH_CACHE_HIT, AUTH_CACHE_MISS, AUTH_SLOW_PATH_FAILURE, AUTH_SLOW_PATH_SUCCESS};
use commerce_common::AuthenticatedIdentity;
use metrics::counter;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Authentication outcome for a request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing credentials")]
    MissingCredentials,

    /// Same signal for unknown login ids, wrong passwords and store faults
    #[error("Authentication failed")]
    AuthenticationFailed,
}

/// Resolves "who is making this request" from a login id and raw password
pub struct AuthenticationDecider {
    cache: Arc<CredentialCache>,
    verifier: Arc<dyn DurableVerifier>,
}

impl AuthenticationDecider {
    pub fn new(cache: Arc<CredentialCache>, verifier: Arc<dyn DurableVerifier>) -> Self {
        Self { cache, verifier }
    }

    pub fn cache(&self) -> &Arc<CredentialCache> {
        &self.cache
    }

    /// Authenticate one request.
    ///
    /// A cached credential is trusted only if the password digest matches;
    /// otherwise the durable verifier is called once. Only a successful
    /// verification writes to the cache.
    #[instrument(level = "debug", skip(self, raw_password))]
    pub async fn authenticate(&self, login_id: &str, raw_password: &str) -> Result<AuthenticatedIdentity, AuthError> {
        if login_id.trim().is_empty() || raw_password.trim().is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        if let Some(cached) = self.cache.get(login_id) {
            if cached.matches_password(raw_password) {
                counter!(AUTH_CACHE_HIT).increment(1);
                return Ok(cached.identity());
            }
            debug!("cached credential does not match, falling back to store");
        }
        counter!(AUTH_CACHE_MISS).increment(1);

        // Taken before the store is read so a password change that completes
        // while we verify discards our write.
        let epoch = self.cache.epoch();

        match self.verifier.verify(login_id, raw_password).await {
            Ok(identity) => {
                counter!(AUTH_SLOW_PATH_SUCCESS).increment(1);
                self.cache
                    .put_if_unchanged(login_id, CachedCredential::new(&identity, raw_password), epoch);
                Ok(identity)
            },
            Err(VerifyError::Unavailable(reason)) => {
                counter!(AUTH_SLOW_PATH_FAILURE).increment(1);
                warn!(%reason, "credential store unavailable");
                Err(AuthError::AuthenticationFailed)
            },
            Err(e) => {
                counter!(AUTH_SLOW_PATH_FAILURE).increment(1);
                debug!(reason = %e, "credentials rejected");
                Err(AuthError::AuthenticationFailed)
            },
        }
    }
}
