// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the commerce member API.

pub mod authenticate;

pub use authenticate::require_member;
