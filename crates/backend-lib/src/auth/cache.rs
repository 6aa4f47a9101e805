// ============================
// crates/backend-lib/src/auth/cache.rs
// ============================
//! Bounded, write-expiring cache of successfully verified credentials.
//!
//! Entries are keyed by login id and expire a fixed time after they were
//! written; reads do not extend the lifetime. When a write of a new key would
//! exceed the capacity, the least recently written entries are dropped.
//!
//! Reads never take the write lock. Writes and evictions are serialised by a
//! short mutex guarding the write order and the invalidation epoch, so an
//! eviction that has returned is visible to every later read, and a slow-path
//! write that raced with an eviction can be discarded.
use crate::auth::digest::credential_digest;
use crate::metrics::{
    AUTH_CACHE_CAPACITY_EVICTED, AUTH_CACHE_ENTRIES, AUTH_CACHE_EVICTED,
};
use commerce_common::{AuthenticatedIdentity, MemberId};
use dashmap::DashMap;
use metrics::{counter, gauge};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// Default time-to-live, measured from the last write (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default maximum number of resident entries
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// A credential that passed durable verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedCredential {
    pub member_id: MemberId,
    pub login_id: String,
    /// Fast-path fingerprint of the verified password
    pub password_digest: String,
    pub inserted_at: Instant,
}

impl CachedCredential {
    /// Build an entry for `identity` verified with `raw_password`
    pub fn new(identity: &AuthenticatedIdentity, raw_password: &str) -> Self {
        Self {
            member_id: identity.member_id,
            login_id: identity.login_id.clone(),
            password_digest: credential_digest(raw_password),
            inserted_at: Instant::now(),
        }
    }

    /// Whether `raw_password` is the password this entry was verified with
    pub fn matches_password(&self, raw_password: &str) -> bool {
        self.password_digest == credential_digest(raw_password)
    }

    pub fn identity(&self) -> AuthenticatedIdentity {
        AuthenticatedIdentity::new(self.member_id, self.login_id.clone())
    }
}

#[derive(Debug)]
struct Slot {
    credential: CachedCredential,
    /// Write sequence number, used to tell a live entry from a stale record
    generation: u64,
}

#[derive(Debug, Default)]
struct WriteLog {
    /// Keys in write order, oldest first. May hold stale records for keys
    /// that were rewritten or evicted since.
    order: VecDeque<(String, u64)>,
    next_generation: u64,
}

/// Shared credential cache
#[derive(Debug)]
pub struct CredentialCache {
    entries: DashMap<String, Slot>,
    writes: Mutex<WriteLog>,
    /// Advanced by every explicit eviction
    epoch: AtomicU64,
    ttl: Duration,
    max_entries: usize,
}

impl Default for CredentialCache {
    fn default() -> Self {
        Self::with_config(DEFAULT_TTL, DEFAULT_MAX_ENTRIES)
    }
}

impl CredentialCache {
    /// Create a cache with the default TTL and capacity
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache with a custom TTL and capacity.
    ///
    /// A capacity of zero is raised to one.
    pub fn with_config(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            writes: Mutex::new(WriteLog::default()),
            epoch: AtomicU64::new(0),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Number of resident entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current invalidation epoch. Pass it to [`Self::put_if_unchanged`] to
    /// drop a write if any eviction happens in between.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Look up a live entry. Expired entries are removed and reported absent.
    pub fn get(&self, login_id: &str) -> Option<CachedCredential> {
        let expired_generation = {
            let slot = self.entries.get(login_id)?;
            if !self.is_expired(&slot.credential) {
                return Some(slot.credential.clone());
            }
            slot.generation
        };

        if self
            .entries
            .remove_if(login_id, |_, slot| slot.generation == expired_generation)
            .is_some()
        {
            self.record_size();
            debug!(login_id, "expired credential dropped on read");
        }
        None
    }

    /// Insert or replace the entry for `login_id`, restarting its TTL
    pub fn put(&self, login_id: &str, credential: CachedCredential) {
        let mut writes = self.writes.lock();
        self.insert_locked(&mut writes, login_id, credential);
    }

    /// Like [`Self::put`], but does nothing if an eviction happened since
    /// `epoch` was read. Returns whether the entry was written.
    pub fn put_if_unchanged(&self, login_id: &str, credential: CachedCredential, epoch: u64) -> bool {
        let mut writes = self.writes.lock();
        if self.epoch.load(Ordering::SeqCst) != epoch {
            debug!(login_id, "credential write skipped after concurrent eviction");
            return false;
        }
        self.insert_locked(&mut writes, login_id, credential);
        true
    }

    /// Remove the entry for `login_id` regardless of its age.
    ///
    /// Called whenever the member's password changes. Once this returns, no
    /// later [`Self::get`] observes the removed entry.
    pub fn evict(&self, login_id: &str) -> bool {
        let _writes = self.writes.lock();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let removed = self.entries.remove(login_id).is_some();
        if removed {
            counter!(AUTH_CACHE_EVICTED).increment(1);
            self.record_size();
            debug!(login_id, "credential evicted");
        }
        removed
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, slot| !self.is_expired(&slot.credential));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            self.record_size();
            debug!(removed, "expired credentials purged");
        }
        removed
    }

    /// Periodically purge expired entries until the returned task is aborted
    pub fn spawn_purge_task(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                cache.purge_expired();
            }
        })
    }

    fn is_expired(&self, credential: &CachedCredential) -> bool {
        Instant::now().saturating_duration_since(credential.inserted_at) >= self.ttl
    }

    fn insert_locked(&self, writes: &mut WriteLog, login_id: &str, mut credential: CachedCredential) {
        credential.inserted_at = Instant::now();
        let generation = writes.next_generation;
        writes.next_generation += 1;

        self.entries
            .insert(login_id.to_owned(), Slot { credential, generation });
        writes.order.push_back((login_id.to_owned(), generation));

        while self.entries.len() > self.max_entries {
            let Some((key, generation)) = writes.order.pop_front() else {
                break;
            };
            if self
                .entries
                .remove_if(&key, |_, slot| slot.generation == generation)
                .is_some()
            {
                counter!(AUTH_CACHE_CAPACITY_EVICTED).increment(1);
                debug!(login_id = %key, "credential evicted for capacity");
            }
        }

        // Rewrites and evictions leave stale records behind
        if writes.order.len() > self.max_entries.saturating_mul(2) {
            writes.order.retain(|(key, generation)| {
                self.entries
                    .get(key.as_str())
                    .is_some_and(|slot| slot.generation == *generation)
            });
        }

        self.record_size();
    }

    fn record_size(&self) {
        gauge!(AUTH_CACHE_ENTRIES).set(self.entries.len() as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(member_id: MemberId, login_id: &str, password: &str) -> CachedCredential {
        CachedCredential::new(&AuthenticatedIdentity::new(member_id, login_id), password)
    }

    #[test]
    fn test_put_get_and_replace() {
        let cache = CredentialCache::new();
        assert!(cache.get("member01").is_none());

        cache.put("member01", credential(1, "member01", "Password1!"));
        let cached = cache.get("member01").unwrap();
        assert_eq!(cached.member_id, 1);
        assert!(cached.matches_password("Password1!"));
        assert!(!cached.matches_password("Password2!"));

        cache.put("member01", credential(1, "member01", "Password2!"));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("member01").unwrap().matches_password("Password2!"));
    }

    #[test]
    fn test_evict_is_immediately_visible() {
        let cache = CredentialCache::new();
        cache.put("member01", credential(1, "member01", "Password1!"));
        cache.put("member02", credential(2, "member02", "Password1!"));

        assert!(cache.evict("member01"));
        assert!(cache.get("member01").is_none());
        assert!(cache.get("member02").is_some());

        // Evicting an absent key is a no-op
        assert!(!cache.evict("member01"));

        cache.put("member01", credential(1, "member01", "Password3!"));
        assert!(cache.get("member01").is_some());
    }

    #[test]
    fn test_capacity_bound_drops_oldest_write() {
        let cache = CredentialCache::new();
        for i in 0..=DEFAULT_MAX_ENTRIES {
            let login_id = format!("member{i}");
            cache.put(&login_id, credential(i as MemberId, &login_id, "Password1!"));
        }

        assert_eq!(cache.len(), DEFAULT_MAX_ENTRIES);
        assert!(cache.get("member0").is_none());
        assert!(cache.get(&format!("member{DEFAULT_MAX_ENTRIES}")).is_some());
    }

    #[test]
    fn test_rewrite_moves_key_to_back_of_write_order() {
        let cache = CredentialCache::with_config(DEFAULT_TTL, 2);
        cache.put("a", credential(1, "a", "Password1!"));
        cache.put("b", credential(2, "b", "Password1!"));
        cache.put("a", credential(1, "a", "Password1!"));
        cache.put("c", credential(3, "c", "Password1!"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_write_order_stays_bounded_under_rewrites() {
        let cache = CredentialCache::with_config(DEFAULT_TTL, 4);
        for _ in 0..1_000 {
            cache.put("a", credential(1, "a", "Password1!"));
        }
        assert!(cache.writes.lock().order.len() <= 8);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_put_if_unchanged_discards_write_after_eviction() {
        let cache = CredentialCache::new();
        let epoch = cache.epoch();

        cache.evict("member01");
        assert!(!cache.put_if_unchanged("member01", credential(1, "member01", "Old1234!"), epoch));
        assert!(cache.get("member01").is_none());

        let epoch = cache.epoch();
        assert!(cache.put_if_unchanged("member01", credential(1, "member01", "New1234!"), epoch));
        assert!(cache.get("member01").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl_from_write() {
        let cache = CredentialCache::new();
        cache.put("member01", credential(1, "member01", "Password1!"));

        tokio::time::advance(Duration::from_secs(4 * 60)).await;
        // Reads do not extend the lifetime
        assert!(cache.get("member01").is_some());

        tokio::time::advance(Duration::from_secs(60) + Duration::from_millis(1)).await;
        assert!(cache.get("member01").is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_read_shrinks_cache() {
        let cache = CredentialCache::with_config(Duration::from_secs(10), 100);
        cache.put("old", credential(1, "old", "Password1!"));
        tokio::time::advance(Duration::from_secs(6)).await;
        cache.put("new", credential(2, "new", "Password1!"));
        assert_eq!(cache.len(), 2);

        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(cache.get("old").is_none());
        assert_eq!(cache.len(), 1);
        assert!(cache.get("new").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rewrite_restarts_ttl() {
        let cache = CredentialCache::new();
        cache.put("member01", credential(1, "member01", "Password1!"));

        tokio::time::advance(Duration::from_secs(4 * 60)).await;
        cache.put("member01", credential(1, "member01", "Password1!"));

        tokio::time::advance(Duration::from_secs(4 * 60)).await;
        assert!(cache.get("member01").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = CredentialCache::with_config(Duration::from_secs(10), 100);
        cache.put("old", credential(1, "old", "Password1!"));

        tokio::time::advance(Duration::from_secs(6)).await;
        cache.put("new", credential(2, "new", "Password1!"));

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("new").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_task_runs_periodically() {
        let cache = Arc::new(CredentialCache::with_config(Duration::from_secs(10), 100));
        cache.put("member01", credential(1, "member01", "Password1!"));
        let task = cache.spawn_purge_task(Duration::from_secs(5));

        tokio::time::sleep(Duration::from_secs(16)).await;
        assert!(cache.is_empty());
        task.abort();
    }
}
