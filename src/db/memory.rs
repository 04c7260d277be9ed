//! In-process user store for tests and embedding.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User};

use super::UserStore;

/// Users kept in insertion order behind one lock; `create` checks and inserts under the
/// same write guard.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Err(AppError::DuplicateUsername);
        }
        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            password_secret: user.password_secret,
            role: user.role,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }
}
