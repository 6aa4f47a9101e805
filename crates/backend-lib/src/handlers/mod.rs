//! Request handlers.

pub mod members;
