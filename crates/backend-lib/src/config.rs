// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use crate::auth::{CharacterRule, CredentialHasher, PasswordPolicy, DEFAULT_MAX_ENTRIES};
use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "commerce.toml";

/// Prefix of environment overrides, e.g. `COMMERCE_CREDENTIAL_CACHE__TTL_SECS`
pub const ENV_PREFIX: &str = "COMMERCE_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory path
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    pub credential_cache: CacheSettings,
    pub hashing: HashSettings,
    pub password_policy: PolicySettings,
}

/// Credential cache sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Lifetime of an entry from its last write
    pub ttl_secs: u64,
    /// Maximum resident entries
    pub max_entries: usize,
    /// How often expired entries are purged in the background
    pub purge_interval_secs: u64,
}

/// scrypt cost parameters for stored password hashes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashSettings {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    pub character_rule: CharacterRule,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            credential_cache: CacheSettings::default(),
            hashing: HashSettings::default(),
            password_policy: PolicySettings::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 5 * 60,
            max_entries: DEFAULT_MAX_ENTRIES,
            purge_interval_secs: 60,
        }
    }
}

impl Default for HashSettings {
    fn default() -> Self {
        Self {
            log_n: 17,
            r: 8,
            p: 1,
        }
    }
}

impl Settings {
    /// Load defaults, then `path` if it exists, then `COMMERCE_*` variables
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!("invalid log level: {}", self.log_level);
        }
        if self.credential_cache.ttl_secs == 0 {
            bail!("credential_cache.ttl_secs must be positive");
        }
        if self.credential_cache.max_entries == 0 {
            bail!("credential_cache.max_entries must be positive");
        }
        if self.credential_cache.purge_interval_secs == 0 {
            bail!("credential_cache.purge_interval_secs must be positive");
        }
        self.hasher()?;
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.credential_cache.ttl_secs)
    }

    pub fn cache_purge_interval(&self) -> Duration {
        Duration::from_secs(self.credential_cache.purge_interval_secs)
    }

    pub fn hasher(&self) -> Result<CredentialHasher> {
        CredentialHasher::new(self.hashing.log_n, self.hashing.r, self.hashing.p)
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy::new(self.password_policy.character_rule)
    }
}

#[cfg(test)]
mod config_tests;
