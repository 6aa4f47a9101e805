// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const AUTH_CACHE_HIT: &str = "auth.cache.hit";
pub const AUTH_CACHE_MISS: &str = "auth.cache.miss";
pub const AUTH_SLOW_PATH_SUCCESS: &str = "auth.slow_path.success";
pub const AUTH_SLOW_PATH_FAILURE: &str = "auth.slow_path.failure";
pub const AUTH_CACHE_EVICTED: &str = "auth.cache.evicted";
pub const AUTH_CACHE_CAPACITY_EVICTED: &str = "auth.cache.capacity_evicted";
pub const AUTH_CACHE_ENTRIES: &str = "auth.cache.entries";
pub const MEMBER_REGISTERED: &str = "member.registered";
pub const MEMBER_PASSWORD_CHANGED: &str = "member.password_changed";
