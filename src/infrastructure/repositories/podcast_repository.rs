use crate::infrastructure::db::DbPool;
use crate::{domain::podcast::Podcast, error::AppResult};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait PodcastRepository: Send + Sync {
    async fn insert(&self, podcast: &Podcast) -> AppResult<()>;

    async fn find_by_id(&self, podcast_id: Uuid) -> AppResult<Option<Podcast>>;

    /// All podcasts of a user, newest first
    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Podcast>>;

    async fn set_favorite(&self, podcast_id: Uuid, is_favorite: bool) -> AppResult<()>;
}

const COLUMNS: &str = "id, user_id, title, source, source_url, audio_url, created_at, is_favorite";

pub struct PostgresPodcastRepository {
    pool: Arc<DbPool>,
    table: String,
}

impl PostgresPodcastRepository {
    /// `table` must already be a validated SQL identifier
    pub fn new(pool: Arc<DbPool>, table: String) -> Self {
        Self { pool, table }
    }
}

#[async_trait]
impl PodcastRepository for PostgresPodcastRepository {
    async fn insert(&self, podcast: &Podcast) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(&format!(
            r#"
            INSERT INTO {} ({})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
            self.table, COLUMNS
        ))
        .bind(podcast.id)
        .bind(&podcast.user_id)
        .bind(&podcast.title)
        .bind(podcast.source)
        .bind(&podcast.source_url)
        .bind(&podcast.audio_url)
        .bind(podcast.created_at)
        .bind(podcast.is_favorite)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, podcast_id: Uuid) -> AppResult<Option<Podcast>> {
        let pool = self.pool.as_ref();
        let podcast = sqlx::query_as::<_, Podcast>(&format!(
            "SELECT {} FROM {} WHERE id = $1",
            COLUMNS, self.table
        ))
        .bind(podcast_id)
        .fetch_optional(pool)
        .await?;

        Ok(podcast)
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Podcast>> {
        let pool = self.pool.as_ref();
        let podcasts = sqlx::query_as::<_, Podcast>(&format!(
            r#"
            SELECT {}
            FROM {}
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
            COLUMNS, self.table
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(podcasts)
    }

    async fn set_favorite(&self, podcast_id: Uuid, is_favorite: bool) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(&format!(
            "UPDATE {} SET is_favorite = $1 WHERE id = $2",
            self.table
        ))
        .bind(is_favorite)
        .bind(podcast_id)
        .execute(pool)
        .await?;

        Ok(())
    }
}
