//! Data models for users, principals and request payloads.

pub mod user;

pub use user::*;
