// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Durable password hashing and verification.
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};

/// Scrypt hasher with configurable cost.
///
/// Hashes are PHC strings carrying their own parameters, so changing the cost
/// does not invalidate stored hashes.
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    params: Params,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            params: Params::recommended(),
        }
    }
}

impl CredentialHasher {
    /// Build a hasher from scrypt cost parameters
    pub fn new(log_n: u8, r: u32, p: u32) -> anyhow::Result<Self> {
        let params = Params::new(log_n, r, p, Params::RECOMMENDED_LEN)
            .map_err(|e| anyhow::anyhow!("invalid scrypt parameters: {e}"))?;
        Ok(Self { params })
    }

    /// Hash a password with a fresh salt
    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params, &salt)
            .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?
            .to_string();
        Ok(hash)
    }

    /// Verify a password against a stored hash. Malformed hashes never verify.
    pub fn verify(&self, hash: &str, plain: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
    }
}
