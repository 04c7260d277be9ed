//! User store: trait and PostgreSQL implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, PasswordSecret, User};

use super::DbPool;

/// Persistence for user accounts. `create` must reject a taken username atomically.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user with a freshly generated id. Fails with
    /// `AppError::DuplicateUsername` when the username is taken.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Fails with `AppError::NotFound` when no such user exists.
    async fn find_by_username(&self, username: &str) -> AppResult<User>;

    /// All users in insertion order.
    async fn list_all(&self) -> AppResult<Vec<User>>;
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            password_secret: PasswordSecret::from_phc(row.password_hash),
            role: row.role,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        // The unique constraint decides; concurrent inserts of one username yield one row.
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, password_hash, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username) DO NOTHING
            RETURNING id, username, password_hash, role, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(user.password_secret.as_str())
        .bind(&user.role)
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::from).ok_or(AppError::DuplicateUsername)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::from).ok_or(AppError::NotFound)
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role, created_at FROM users ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}
