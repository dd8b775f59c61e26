use crate::infrastructure::db::DbPool;
use crate::{domain::user::User, error::AppResult};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert `user` unless a user with the same id exists.
    /// Returns whether a row was written.
    async fn insert_if_absent(&self, user: &User) -> AppResult<bool>;

    /// Verify the backing store is reachable
    async fn check_connection(&self) -> AppResult<()>;
}

pub struct PostgresUserRepository {
    pool: Arc<DbPool>,
    table: String,
}

impl PostgresUserRepository {
    /// `table` must already be a validated SQL identifier
    pub fn new(pool: Arc<DbPool>, table: String) -> Self {
        Self { pool, table }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert_if_absent(&self, user: &User) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        // Only a conflict on the primary key is tolerated; other failures propagate
        let result = sqlx::query(&format!(
            r#"
            INSERT INTO {} (id, email, name, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
            self.table
        ))
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.created_at)
        .execute(pool)
        .await?;

        let inserted = result.rows_affected() > 0;
        tracing::debug!(user_id = %user.id, inserted, "User recorded");

        Ok(inserted)
    }

    async fn check_connection(&self) -> AppResult<()> {
        crate::infrastructure::db::check_connection(&self.pool).await?;
        Ok(())
    }
}
