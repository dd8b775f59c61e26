use crate::domain::narration::NarrationError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum PodcastServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("could not extract article: {0}")]
    Extraction(String),
    #[error(transparent)]
    Narration(#[from] NarrationError),
    #[error("podcast not found")]
    NotFound,
    #[error("podcast belongs to another user")]
    Forbidden,
    #[error("dependency error: {0}")]
    Dependency(AppError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for PodcastServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => PodcastServiceError::Invalid(msg),
            AppError::NotFound(_) => PodcastServiceError::NotFound,
            AppError::Forbidden(_) => PodcastServiceError::Forbidden,
            other => PodcastServiceError::Dependency(other),
        }
    }
}

impl From<PodcastServiceError> for AppError {
    fn from(err: PodcastServiceError) -> Self {
        match err {
            PodcastServiceError::Invalid(msg) => AppError::BadRequest(msg),
            PodcastServiceError::Extraction(_) => AppError::BadRequest(err.to_string()),
            PodcastServiceError::Narration(e) => AppError::from(e),
            PodcastServiceError::NotFound => AppError::NotFound("Podcast not found".to_string()),
            PodcastServiceError::Forbidden => {
                AppError::Forbidden("Not authorized to modify this podcast".to_string())
            }
            PodcastServiceError::Dependency(e) => e,
            PodcastServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
