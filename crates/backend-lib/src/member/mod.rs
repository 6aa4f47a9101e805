// ============================
// crates/backend-lib/src/member/mod.rs
// ============================
//! Member domain: value types, durable store and service.

pub mod model;
pub mod service;
pub mod store;

pub use model::{Email, LoginId, Member, MemberName, NewMember, RegisterCommand};
pub use service::MemberService;
pub use store::{FlatFileMemberStore, MemberStore};
