//! Business logic: authentication and registration.

pub mod auth;
pub mod registration;

pub use auth::Authenticator;
pub use registration::RegistrationService;
