pub mod error;
pub mod model;
pub mod service;

pub use error::PodcastServiceError;
pub use model::{Podcast, SourceKind};
pub use service::{object_base_name, PodcastService, PodcastServiceApi};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /api/generate`; `text` wins when both are present
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateResponse {
    pub audio_url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PodcastResponse {
    pub podcast_id: Uuid,
    pub title: String,
    pub source: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub audio_url: String,
    pub created_at: DateTime<Utc>,
    pub is_favorite: bool,
}

impl From<Podcast> for PodcastResponse {
    fn from(podcast: Podcast) -> Self {
        Self {
            podcast_id: podcast.id,
            title: podcast.title,
            source: podcast.source,
            source_url: podcast.source_url,
            audio_url: podcast.audio_url,
            created_at: podcast.created_at,
            is_favorite: podcast.is_favorite,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PodcastListResponse {
    pub podcasts: Vec<PodcastResponse>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoriteResponse {
    pub message: String,
    pub is_favorite: bool,
}
