use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::Identity;
use crate::domain::podcast::{
    FavoriteResponse, GenerateRequest, GenerateResponse, PodcastListResponse, TextRequest,
    UrlRequest,
};
use crate::{
    domain::podcast::PodcastServiceApi,
    error::{AppError, AppResult},
};

pub struct PodcastController {
    podcast_service: Arc<dyn PodcastServiceApi>,
}

impl PodcastController {
    pub fn new(podcast_service: Arc<dyn PodcastServiceApi>) -> Self {
        Self { podcast_service }
    }

    /// POST /api/generate - Narrate text, or the article at a URL
    pub async fn generate(
        State(controller): State<Arc<PodcastController>>,
        Extension(identity): Extension<Identity>,
        payload: Result<Json<GenerateRequest>, JsonRejection>,
    ) -> AppResult<Json<GenerateResponse>> {
        let Json(request) = payload.map_err(bad_body)?;
        let response = controller
            .podcast_service
            .generate(&identity, request)
            .await?;
        Ok(Json(response))
    }

    /// POST /api/generate-from-url - Narrate the article at a URL
    pub async fn generate_from_url(
        State(controller): State<Arc<PodcastController>>,
        Extension(identity): Extension<Identity>,
        payload: Result<Json<UrlRequest>, JsonRejection>,
    ) -> AppResult<Json<GenerateResponse>> {
        let Json(request) = payload.map_err(bad_body)?;
        let response = controller
            .podcast_service
            .generate_from_url(&identity, &request.url)
            .await?;
        Ok(Json(response))
    }

    /// POST /api/generate-from-text - Narrate raw text
    pub async fn generate_from_text(
        State(controller): State<Arc<PodcastController>>,
        Extension(identity): Extension<Identity>,
        payload: Result<Json<TextRequest>, JsonRejection>,
    ) -> AppResult<Json<GenerateResponse>> {
        let Json(request) = payload.map_err(bad_body)?;
        let response = controller
            .podcast_service
            .generate_from_text(&identity, &request.text)
            .await?;
        Ok(Json(response))
    }

    /// GET /api/podcasts - List the caller's podcasts, newest first
    pub async fn list_podcasts(
        State(controller): State<Arc<PodcastController>>,
        Extension(identity): Extension<Identity>,
    ) -> AppResult<Json<PodcastListResponse>> {
        let podcasts = controller
            .podcast_service
            .list_podcasts(&identity)
            .await?;
        Ok(Json(PodcastListResponse { podcasts }))
    }

    /// POST /api/podcasts/{podcastId}/favorite - Toggle the favorite flag
    pub async fn toggle_favorite(
        State(controller): State<Arc<PodcastController>>,
        Extension(identity): Extension<Identity>,
        Path(podcast_id): Path<String>,
    ) -> AppResult<Json<FavoriteResponse>> {
        // An id that is not a UUID cannot name a stored podcast
        let podcast_id = Uuid::parse_str(&podcast_id)
            .map_err(|_| AppError::NotFound("Podcast not found".to_string()))?;
        let is_favorite = controller
            .podcast_service
            .toggle_favorite(&identity, podcast_id)
            .await?;
        Ok(Json(FavoriteResponse {
            message: "Favorite updated".to_string(),
            is_favorite,
        }))
    }
}

fn bad_body(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}
