use podcastify_backend::controllers::podcast::PodcastController;
use podcastify_backend::domain::auth::IdentityVerifier;
use podcastify_backend::domain::narration::{NarrationPipeline, PunctuationTokenizer};
use podcastify_backend::domain::podcast::PodcastService;
use podcastify_backend::infrastructure::auth::JwksVerifier;
use podcastify_backend::infrastructure::config::{Config, LogFormat};
use podcastify_backend::infrastructure::db::{check_connection, create_pool, run_migrations};
use podcastify_backend::infrastructure::http::{build_router, start_http_server};
use podcastify_backend::infrastructure::repositories::{
    HttpArticleRepository, PollyTtsRepository, PostgresPodcastRepository,
    PostgresUserRepository, S3ArtifactRepository, UserRepository,
};
use podcastify_backend::infrastructure::scratch::ScratchSpace;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting Podcastify Backend on {}:{}",
        config.host,
        config.port
    );

    if !config.is_development() && config.allowed_origins.iter().any(|o| o == "*") {
        tracing::warn!("Wildcard CORS origin configured in production");
    }

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    // AWS clients share one configuration resolved from the default provider chain
    tracing::info!("Loading AWS configuration for region: {}", config.aws_region);
    let has_static_credentials = std::env::var("AWS_ACCESS_KEY_ID").is_ok()
        && std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
    if !has_static_credentials {
        tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (profiles, instance metadata, etc.)");
    }

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;
    let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
    let s3_client = Arc::new(aws_sdk_s3::Client::new(&aws_config));
    tracing::info!(bucket = %config.s3_bucket, voice = %config.polly_voice_id, "AWS clients initialized");

    let scratch = ScratchSpace::new(&config.scratch_dir)?;
    tracing::info!(scratch_dir = %scratch.root().display(), "Scratch space ready");

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Repositories and external clients
    let user_repo: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(
        pool.clone(),
        config.users_table.clone(),
    ));
    let podcast_repo = Arc::new(PostgresPodcastRepository::new(
        pool.clone(),
        config.podcasts_table.clone(),
    ));
    let tts_repo = Arc::new(PollyTtsRepository::new(
        polly_client,
        &config.polly_voice_id,
        &config.polly_engine,
    ));
    let artifact_repo = Arc::new(S3ArtifactRepository::new(
        s3_client,
        config.s3_bucket.clone(),
        config.aws_region.clone(),
        config.s3_public_read,
        config.artifact_public_base_url.clone(),
    ));
    let article_repo = Arc::new(HttpArticleRepository::new(Duration::from_secs(
        config.article_fetch_timeout_seconds,
    ))?);
    let verifier: Arc<dyn IdentityVerifier> = Arc::new(JwksVerifier::new(
        config.jwks_url(),
        config.token_issuer(),
        config.auth0_audience.clone(),
        Duration::from_secs(config.jwks_cache_ttl_seconds),
    ));

    // 2. Services
    let pipeline = Arc::new(NarrationPipeline::new(
        tts_repo,
        artifact_repo,
        Arc::new(PunctuationTokenizer),
        scratch,
        config.max_chunk_chars,
    ));
    let podcast_service = Arc::new(PodcastService::new(
        pipeline,
        article_repo,
        user_repo.clone(),
        podcast_repo,
    ));

    // 3. Controllers
    let podcast_controller = Arc::new(PodcastController::new(podcast_service));

    let app = build_router(
        podcast_controller,
        verifier,
        user_repo,
        &config.allowed_origins,
    );
    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "podcastify_backend=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
