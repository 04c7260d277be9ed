//! HTTP handlers that are not part of the credential flow.

pub mod http;

pub use http::{health, AppState};
