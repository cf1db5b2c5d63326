//! User Store
//!
//! Trait seam over the user document store plus the Postgres implementation.
//! The store is the sole synchronization point for session state: the
//! persisted refresh token is read and overwritten here.

use crate::error::AuthError;
use crate::models::{NewUser, User};

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Operations the session controller needs from the user store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

    /// Look up a user matching either identity field; `None` arguments are
    /// ignored
    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, AuthError>;

    /// Insert a new user record
    async fn create(&self, new_user: NewUser) -> Result<User, AuthError>;

    /// Overwrite (or clear) the persisted refresh token. Touches only that
    /// column, so the rest of the record is not revalidated.
    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> Result<(), AuthError>;
}

/// Postgres-backed user store
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as(
            r#"
            SELECT * FROM users
            WHERE ($1::text IS NOT NULL AND username = $1)
               OR ($2::text IS NOT NULL AND email = $2)
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, full_name, password_hash, avatar_url, cover_image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.full_name)
        .bind(&new_user.password_hash)
        .bind(&new_user.avatar_url)
        .bind(&new_user.cover_image_url)
        .fetch_one(&self.db)
        .await?;

        Ok(user)
    }

    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> Result<(), AuthError> {
        let result =
            sqlx::query("UPDATE users SET refresh_token = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(token)
                .execute(&self.db)
                .await?;

        if result.rows_affected() == 0 {
            tracing::warn!(user_id = %id, "refresh token update matched no user");
        }

        Ok(())
    }
}

/// Create the users table and its indexes
pub async fn run_migrations(db: &PgPool) -> Result<(), AuthError> {
    tracing::info!("Running authentication database migrations");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            username VARCHAR(100) NOT NULL UNIQUE,
            email VARCHAR(255) NOT NULL UNIQUE,
            full_name VARCHAR(100) NOT NULL,
            password_hash VARCHAR(255) NOT NULL,
            avatar_url VARCHAR(500) NOT NULL,
            cover_image_url VARCHAR(500),
            refresh_token TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(db)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_username ON users(username);")
        .execute(db)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);")
        .execute(db)
        .await?;

    tracing::info!("Authentication migrations completed");
    Ok(())
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory store used by unit tests.

    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct MemoryUserStore {
        users: RwLock<HashMap<Uuid, User>>,
    }

    impl MemoryUserStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn len(&self) -> usize {
            self.users.read().await.len()
        }

        pub async fn get(&self, id: Uuid) -> Option<User> {
            self.users.read().await.get(&id).cloned()
        }
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
            Ok(self.users.read().await.get(&id).cloned())
        }

        async fn find_by_username_or_email(
            &self,
            username: Option<&str>,
            email: Option<&str>,
        ) -> Result<Option<User>, AuthError> {
            let users = self.users.read().await;
            Ok(users
                .values()
                .find(|u| {
                    username.is_some_and(|name| u.username == name)
                        || email.is_some_and(|mail| u.email == mail)
                })
                .cloned())
        }

        async fn create(&self, new_user: NewUser) -> Result<User, AuthError> {
            let now = Utc::now();
            let user = User {
                id: Uuid::new_v4(),
                username: new_user.username,
                email: new_user.email,
                full_name: new_user.full_name,
                password_hash: new_user.password_hash,
                avatar_url: new_user.avatar_url,
                cover_image_url: new_user.cover_image_url,
                refresh_token: None,
                created_at: now,
                updated_at: now,
            };
            self.users.write().await.insert(user.id, user.clone());
            Ok(user)
        }

        async fn set_refresh_token(
            &self,
            id: Uuid,
            token: Option<&str>,
        ) -> Result<(), AuthError> {
            let mut users = self.users.write().await;
            if let Some(user) = users.get_mut(&id) {
                user.refresh_token = token.map(str::to_string);
                user.updated_at = Utc::now();
            }
            Ok(())
        }
    }
}
