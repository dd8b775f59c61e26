use super::error::PodcastServiceError;
use crate::domain::auth::Identity;
use crate::domain::narration::NarrationPipeline;
use crate::domain::podcast::{
    GenerateRequest, GenerateResponse, Podcast, PodcastResponse, SourceKind,
};
use crate::domain::user::User;
use crate::infrastructure::repositories::{ArticleRepository, PodcastRepository, UserRepository};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

const MAX_BASE_NAME_CHARS: usize = 50;

pub struct PodcastService {
    pipeline: Arc<NarrationPipeline>,
    article_repo: Arc<dyn ArticleRepository>,
    user_repo: Arc<dyn UserRepository>,
    podcast_repo: Arc<dyn PodcastRepository>,
}

impl PodcastService {
    pub fn new(
        pipeline: Arc<NarrationPipeline>,
        article_repo: Arc<dyn ArticleRepository>,
        user_repo: Arc<dyn UserRepository>,
        podcast_repo: Arc<dyn PodcastRepository>,
    ) -> Self {
        Self {
            pipeline,
            article_repo,
            user_repo,
            podcast_repo,
        }
    }
}

#[async_trait]
pub trait PodcastServiceApi: Send + Sync {
    /// Narrate `text` when it is a non-empty string, else the article at `url`
    async fn generate(
        &self,
        caller: &Identity,
        request: GenerateRequest,
    ) -> Result<GenerateResponse, PodcastServiceError>;

    async fn generate_from_url(
        &self,
        caller: &Identity,
        url: &str,
    ) -> Result<GenerateResponse, PodcastServiceError>;

    async fn generate_from_text(
        &self,
        caller: &Identity,
        text: &str,
    ) -> Result<GenerateResponse, PodcastServiceError>;

    async fn list_podcasts(
        &self,
        caller: &Identity,
    ) -> Result<Vec<PodcastResponse>, PodcastServiceError>;

    /// Flip the favorite flag of one of the caller's podcasts and return the new value
    async fn toggle_favorite(
        &self,
        caller: &Identity,
        podcast_id: Uuid,
    ) -> Result<bool, PodcastServiceError>;
}

#[async_trait]
impl PodcastServiceApi for PodcastService {
    async fn generate(
        &self,
        caller: &Identity,
        request: GenerateRequest,
    ) -> Result<GenerateResponse, PodcastServiceError> {
        match (request.text, request.url) {
            (Some(text), _) if !text.is_empty() => self.generate_from_text(caller, &text).await,
            (_, Some(url)) if !url.trim().is_empty() => self.generate_from_url(caller, &url).await,
            _ => Err(PodcastServiceError::Invalid(
                "Either url or text must be provided".to_string(),
            )),
        }
    }

    async fn generate_from_url(
        &self,
        caller: &Identity,
        url: &str,
    ) -> Result<GenerateResponse, PodcastServiceError> {
        let url = url.trim();
        let article = self
            .article_repo
            .fetch(url)
            .await
            .map_err(PodcastServiceError::Extraction)?;

        if article.text.trim().is_empty() {
            return Err(PodcastServiceError::Extraction(
                "no readable text found at the given URL".to_string(),
            ));
        }

        let title = article
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("article-{}", Uuid::new_v4()));

        self.narrate_and_record(caller, title, &article.text, SourceKind::Url, Some(url))
            .await
    }

    async fn generate_from_text(
        &self,
        caller: &Identity,
        text: &str,
    ) -> Result<GenerateResponse, PodcastServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PodcastServiceError::Invalid(
                "Text must not be empty".to_string(),
            ));
        }

        let title = format!("text-{}", Uuid::new_v4());
        self.narrate_and_record(caller, title, text, SourceKind::Text, None)
            .await
    }

    async fn list_podcasts(
        &self,
        caller: &Identity,
    ) -> Result<Vec<PodcastResponse>, PodcastServiceError> {
        let podcasts = self.podcast_repo.find_by_user(&caller.subject).await?;
        Ok(podcasts.into_iter().map(PodcastResponse::from).collect())
    }

    async fn toggle_favorite(
        &self,
        caller: &Identity,
        podcast_id: Uuid,
    ) -> Result<bool, PodcastServiceError> {
        let podcast = self
            .podcast_repo
            .find_by_id(podcast_id)
            .await?
            .ok_or(PodcastServiceError::NotFound)?;

        if !podcast.is_owned_by(&caller.subject) {
            tracing::warn!(
                podcast_id = %podcast_id,
                user_id = %caller.subject,
                "Favorite toggle attempted on another user's podcast"
            );
            return Err(PodcastServiceError::Forbidden);
        }

        let is_favorite = !podcast.is_favorite;
        self.podcast_repo
            .set_favorite(podcast_id, is_favorite)
            .await?;

        Ok(is_favorite)
    }
}

impl PodcastService {
    async fn narrate_and_record(
        &self,
        caller: &Identity,
        title: String,
        text: &str,
        source: SourceKind,
        source_url: Option<&str>,
    ) -> Result<GenerateResponse, PodcastServiceError> {
        let base_name = object_base_name(&title);
        let audio_url = self.pipeline.narrate(text, &base_name).await?;

        let now = Utc::now();
        let user = User::from_identity(caller, now);
        if self.user_repo.insert_if_absent(&user).await? {
            tracing::info!(user_id = %user.id, "New user recorded");
        }

        let podcast = Podcast {
            id: Uuid::new_v4(),
            user_id: caller.subject.clone(),
            title,
            source,
            source_url: source_url.map(str::to_string),
            audio_url: audio_url.clone(),
            created_at: now,
            is_favorite: false,
        };
        self.podcast_repo.insert(&podcast).await?;

        tracing::info!(
            podcast_id = %podcast.id,
            user_id = %podcast.user_id,
            source = %source,
            "Podcast created"
        );

        Ok(GenerateResponse { audio_url })
    }
}

/// File-name-safe base name for a title's audio objects.
///
/// Keeps the first 50 characters with spaces turned into `_`, drops anything
/// outside `[A-Za-z0-9_-]`, and appends a random suffix so concurrent
/// requests with the same title never share an object key.
pub fn object_base_name(title: &str) -> String {
    let slug: String = title
        .chars()
        .take(MAX_BASE_NAME_CHARS)
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    let slug = if slug.is_empty() { "podcast" } else { &slug };

    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}", slug, &suffix[..8])
}
