pub mod article_repository;
pub mod artifact_repository;
pub mod podcast_repository;
pub mod polly_tts_repository;
pub mod s3_artifact_repository;
pub mod tts_repository;
pub mod user_repository;

pub use article_repository::{extract_article, Article, ArticleRepository, HttpArticleRepository};
pub use artifact_repository::ArtifactRepository;
pub use podcast_repository::{PodcastRepository, PostgresPodcastRepository};
pub use polly_tts_repository::PollyTtsRepository;
pub use s3_artifact_repository::S3ArtifactRepository;
pub use tts_repository::TtsRepository;
pub use user_repository::{PostgresUserRepository, UserRepository};
