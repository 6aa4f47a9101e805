// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the commerce member API: credential
//! cache, authentication decider, password policy and member service.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod member;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod validation;

use crate::auth::{AuthenticationDecider, CredentialCache};
use crate::config::Settings;
use crate::member::{FlatFileMemberStore, MemberService, MemberStore};
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState<S> {
    /// Authentication decider, the entry point for request authentication
    pub auth: Arc<AuthenticationDecider>,
    /// Member service, including the password-change flow
    pub members: Arc<MemberService<S>>,
    /// The credential cache shared by `auth` and `members`
    pub credential_cache: Arc<CredentialCache>,
    /// Settings the state was built from
    pub settings: Arc<Settings>,
}

impl<S: MemberStore + 'static> AppState<S> {
    /// Create a new application state.
    ///
    /// Builds the single credential cache and hands it to both the decider
    /// and the member service.
    pub fn new(storage: S, settings: Settings) -> anyhow::Result<Self> {
        let credential_cache = Arc::new(CredentialCache::with_config(
            settings.cache_ttl(),
            settings.credential_cache.max_entries,
        ));
        let members = Arc::new(MemberService::new(
            storage,
            settings.hasher()?,
            settings.password_policy(),
            credential_cache.clone(),
        )?);
        let auth = Arc::new(AuthenticationDecider::new(
            credential_cache.clone(),
            members.clone(),
        ));

        Ok(Self {
            auth,
            members,
            credential_cache,
            settings: Arc::new(settings),
        })
    }
}

impl AppState<FlatFileMemberStore> {
    /// Create a new application state over a flat-file store in `settings.data_dir`
    pub fn with_flat_file_store(settings: Settings) -> anyhow::Result<Self> {
        let storage = FlatFileMemberStore::new(&settings.data_dir)?;
        Self::new(storage, settings)
    }
}
