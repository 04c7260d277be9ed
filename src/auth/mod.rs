//! Credentials: password hashing, tokens, HTTP handlers.

mod handlers;
mod hasher;
mod jwt;

pub use handlers::{list_users, login, me, register};
pub use hasher::CredentialHasher;
pub use jwt::{Claims, TokenIssuer};

#[cfg(test)]
pub(crate) use hasher::test_hasher;
