use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Where the narrated text came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
pub enum SourceKind {
    #[serde(rename = "url")]
    Url,
    #[serde(rename = "text")]
    Text,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Url => write!(f, "url"),
            SourceKind::Text => write!(f, "text"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Podcast {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub source: SourceKind,
    pub source_url: Option<String>,
    pub audio_url: String,
    pub created_at: DateTime<Utc>,
    pub is_favorite: bool,
}

impl Podcast {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
