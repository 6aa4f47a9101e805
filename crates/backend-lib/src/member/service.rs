// ============================
// crates/backend-lib/src/member/service.rs
// ============================
//! Member registration, lookup and password change.
use crate::auth::{CredentialCache, CredentialHasher, DurableVerifier, PasswordPolicy, VerifyError};
use crate::error::AppError;
use crate::member::model::{Email, LoginId, Member, MemberName, NewMember, RegisterCommand};
use crate::member::store::MemberStore;
use crate::metrics::{MEMBER_PASSWORD_CHANGED, MEMBER_REGISTERED};
use async_trait::async_trait;
use commerce_common::AuthenticatedIdentity;
use metrics::counter;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use zeroize::Zeroizing;

/// Member operations over a durable store.
///
/// Owns the write paths for passwords; every successful password change
/// evicts the member's cached credential before returning.
pub struct MemberService<S> {
    store: S,
    hasher: CredentialHasher,
    policy: PasswordPolicy,
    cache: Arc<CredentialCache>,
    /// Verified against for unknown login ids so lookups cost the same either way
    dummy_hash: String,
}

/// Never stored for a member; only its hash is ever checked
const DUMMY_PASSWORD: &str = "unknown-member-placeholder";

impl<S: MemberStore> MemberService<S> {
    pub fn new(
        store: S,
        hasher: CredentialHasher,
        policy: PasswordPolicy,
        cache: Arc<CredentialCache>,
    ) -> anyhow::Result<Self> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;
        Ok(Self {
            store,
            hasher,
            policy,
            cache,
            dummy_hash,
        })
    }

    /// Register a new member
    #[instrument(skip_all, fields(login_id = %command.login_id))]
    pub async fn register(&self, command: RegisterCommand) -> Result<Member, AppError> {
        let login_id = LoginId::parse(&command.login_id)?;
        let name = MemberName::parse(&command.name)?;
        let email = Email::parse(&command.email)?;
        let password = Zeroizing::new(command.password);
        self.policy.validate(&password, command.birth_date)?;

        let password_hash = self.hash(&password).await?;
        let member = self
            .store
            .insert(NewMember {
                login_id,
                password_hash,
                name,
                birth_date: command.birth_date,
                email,
            })
            .await?;

        counter!(MEMBER_REGISTERED).increment(1);
        info!(member_id = member.id, "member registered");
        Ok(member)
    }

    /// Look up a member by login id
    pub async fn get_member(&self, login_id: &str) -> Result<Member, AppError> {
        self.store
            .find_by_login_id(login_id)
            .await?
            .ok_or(AppError::MemberNotFound)
    }

    /// Change a member's password.
    ///
    /// The current password must verify, the new one must differ from it and
    /// pass the policy against the stored birth date.
    #[instrument(skip(self, current_password, new_password))]
    pub async fn change_password(
        &self,
        login_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<Member, AppError> {
        let mut member = self
            .store
            .find_by_login_id(login_id)
            .await?
            .ok_or(AppError::AuthenticationFailed)?;

        if !self.verify_hash(&member.password_hash, current_password).await? {
            warn!("password change rejected: current password does not verify");
            return Err(AppError::AuthenticationFailed);
        }
        if self.verify_hash(&member.password_hash, new_password).await? {
            return Err(AppError::SamePassword);
        }
        self.policy.validate(new_password, member.birth_date)?;

        let password_hash = self.hash(new_password).await?;
        self.store.update_password(login_id, &password_hash).await?;
        self.cache.evict(login_id);

        member.password_hash = password_hash;
        counter!(MEMBER_PASSWORD_CHANGED).increment(1);
        info!(member_id = member.id, "password changed");
        Ok(member)
    }

    async fn hash(&self, plain: &str) -> Result<String, AppError> {
        let hasher = self.hasher;
        let plain = Zeroizing::new(plain.to_owned());
        Ok(tokio::task::spawn_blocking(move || hasher.hash(&plain)).await??)
    }

    async fn verify_hash(&self, hash: &str, plain: &str) -> Result<bool, AppError> {
        let hasher = self.hasher;
        let hash = hash.to_owned();
        let plain = Zeroizing::new(plain.to_owned());
        Ok(tokio::task::spawn_blocking(move || hasher.verify(&hash, &plain)).await?)
    }
}

#[async_trait]
impl<S: MemberStore> DurableVerifier for MemberService<S> {
    async fn verify(&self, login_id: &str, raw_password: &str) -> Result<AuthenticatedIdentity, VerifyError> {
        let member = self
            .store
            .find_by_login_id(login_id)
            .await
            .map_err(|e| VerifyError::Unavailable(e.to_string()))?;

        let Some(member) = member else {
            // Spend the same scrypt work as a wrong password would
            self.verify_hash(&self.dummy_hash, raw_password)
                .await
                .map_err(|e| VerifyError::Unavailable(e.to_string()))?;
            return Err(VerifyError::NotFound);
        };

        match self.verify_hash(&member.password_hash, raw_password).await {
            Ok(true) => Ok(member.identity()),
            Ok(false) => Err(VerifyError::WrongPassword),
            Err(e) => Err(VerifyError::Unavailable(e.to_string())),
        }
    }
}
