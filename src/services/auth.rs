//! Authenticator: username lookup plus password verification.

use std::sync::Arc;

use tracing::info;

use crate::auth::CredentialHasher;
use crate::db::UserStore;
use crate::error::{AppError, AppResult};
use crate::models::{LoginRequest, User};

/// Binary login decision. Unknown users and wrong passwords fail the same way.
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn UserStore>,
    hasher: CredentialHasher,
}

impl Authenticator {
    pub fn new(store: Arc<dyn UserStore>, hasher: CredentialHasher) -> Self {
        Self { store, hasher }
    }

    pub async fn authenticate(&self, credentials: LoginRequest) -> AppResult<User> {
        let LoginRequest { username, password } = credentials;

        let user = match self.store.find_by_username(&username).await {
            Ok(user) => user,
            Err(AppError::NotFound) => {
                self.hasher.verify_decoy_blocking(password).await?;
                info!("login rejected");
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        if !self
            .hasher
            .verify_blocking(password, user.password_secret.clone())
            .await?
        {
            info!("login rejected");
            return Err(AppError::InvalidCredentials);
        }

        info!(user_id = %user.id, "login succeeded");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_hasher;
    use crate::db::MemoryUserStore;
    use crate::config::HasherConfig;
    use crate::models::NewUser;
    use std::time::{Duration, Instant};

    async fn authenticator_with_alice() -> Authenticator {
        authenticator_with_alice_using(test_hasher()).await
    }

    async fn authenticator_with_alice_using(hasher: CredentialHasher) -> Authenticator {
        let store = Arc::new(MemoryUserStore::new());
        store
            .create(NewUser {
                username: "alice".to_string(),
                password_secret: hasher.hash("s3cret").unwrap(),
                role: "admin".to_string(),
            })
            .await
            .unwrap();
        Authenticator::new(store, hasher)
    }

    fn creds(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn correct_password_returns_the_user() {
        let auth = authenticator_with_alice().await;
        let user = auth.authenticate(creds("alice", "s3cret")).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, "admin");
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_look_the_same() {
        let auth = authenticator_with_alice().await;
        let wrong = auth.authenticate(creds("alice", "wrong")).await.unwrap_err();
        let unknown = auth.authenticate(creds("mallory", "s3cret")).await.unwrap_err();

        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert_eq!(wrong.status(), unknown.status());
    }

    async fn fastest_rejection(auth: &Authenticator, username: &str) -> Duration {
        let mut fastest = Duration::MAX;
        for _ in 0..3 {
            let started = Instant::now();
            let result = auth.authenticate(creds(username, "wrong")).await;
            fastest = fastest.min(started.elapsed());
            assert!(matches!(result, Err(AppError::InvalidCredentials)));
        }
        fastest
    }

    #[tokio::test]
    async fn unknown_user_costs_a_full_verification() {
        let hasher = CredentialHasher::new(&HasherConfig {
            memory_kib: 8 * 1024,
            iterations: 3,
            parallelism: 1,
        })
        .unwrap();
        let auth = authenticator_with_alice_using(hasher).await;

        let wrong_password = fastest_rejection(&auth, "alice").await;
        let unknown_user = fastest_rejection(&auth, "mallory").await;
        assert!(
            unknown_user * 3 >= wrong_password,
            "unknown user answered in {:?}, wrong password in {:?}",
            unknown_user,
            wrong_password
        );
    }

    #[tokio::test]
    async fn username_match_is_case_sensitive() {
        let auth = authenticator_with_alice().await;
        assert!(matches!(
            auth.authenticate(creds("Alice", "s3cret")).await,
            Err(AppError::InvalidCredentials)
        ));
    }
}
