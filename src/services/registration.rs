//! Registration: validate, hash, persist.

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::auth::CredentialHasher;
use crate::db::UserStore;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, RegisterRequest, User, DEFAULT_ROLE};

#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn UserStore>,
    hasher: CredentialHasher,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn UserStore>, hasher: CredentialHasher) -> Self {
        Self { store, hasher }
    }

    /// Create an account. The plaintext password is consumed by the hashing task and never
    /// reaches the store.
    pub async fn register(&self, mut request: RegisterRequest) -> AppResult<User> {
        // The role column limit applies to the stored, trimmed value.
        request.role = request.role.map(|r| r.trim().to_string());
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let RegisterRequest {
            username,
            password,
            role,
        } = request;

        if username.trim().is_empty() {
            return Err(AppError::Validation("username is required".to_string()));
        }
        let role = normalize_role(role);

        let password_secret = self.hasher.hash_blocking(password).await?;
        let user = self
            .store
            .create(NewUser {
                username,
                password_secret,
                role,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }
}

fn normalize_role(role: Option<String>) -> String {
    match role.as_deref().map(str::trim) {
        Some(r) if !r.is_empty() => r.to_string(),
        _ => DEFAULT_ROLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_hasher;
    use crate::db::MemoryUserStore;

    fn service() -> (RegistrationService, Arc<MemoryUserStore>) {
        let store = Arc::new(MemoryUserStore::new());
        (RegistrationService::new(store.clone(), test_hasher()), store)
    }

    fn request(username: &str, password: &str, role: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            role: role.map(String::from),
        }
    }

    #[test]
    fn role_defaults_to_customer() {
        assert_eq!(normalize_role(None), "customer");
        assert_eq!(normalize_role(Some("  ".into())), "customer");
        assert_eq!(normalize_role(Some(" admin ".into())), "admin");
    }

    #[tokio::test]
    async fn stores_a_hash_not_the_password() {
        let (service, store) = service();
        let user = service
            .register(request("alice", "s3cret", Some("admin")))
            .await
            .unwrap();
        assert_eq!(user.role, "admin");

        let stored = store.find_by_username("alice").await.unwrap();
        assert_ne!(stored.password_secret.as_str(), "s3cret");
        assert!(test_hasher().verify("s3cret", &stored.password_secret));
    }

    #[tokio::test]
    async fn missing_role_becomes_customer() {
        let (service, _) = service();
        let user = service.register(request("bob", "pw", None)).await.unwrap();
        assert_eq!(user.role, "customer");
    }

    #[tokio::test]
    async fn second_registration_is_a_conflict() {
        let (service, store) = service();
        service
            .register(request("alice", "first", None))
            .await
            .unwrap();
        let err = service
            .register(request("alice", "second", Some("admin")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateUsername));

        let users = store.list_all().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, "customer");
        assert!(test_hasher().verify("first", &users[0].password_secret));
    }

    #[tokio::test]
    async fn role_length_is_checked_after_trimming() {
        let (service, store) = service();
        let padded = format!("{}admin{}", " ".repeat(30), " ".repeat(30));
        let user = service
            .register(request("dave", "pw", Some(&padded)))
            .await
            .unwrap();
        assert_eq!(user.role, "admin");

        let too_long = format!("  {}  ", "r".repeat(51));
        assert!(matches!(
            service.register(request("erin", "pw", Some(&too_long))).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let (service, store) = service();
        for req in [
            request("", "pw", None),
            request("   ", "pw", None),
            request("carol", "", None),
            request(&"x".repeat(256), "pw", None),
        ] {
            assert!(matches!(
                service.register(req).await,
                Err(AppError::Validation(_))
            ));
        }
        assert!(store.list_all().await.unwrap().is_empty());
    }
}
