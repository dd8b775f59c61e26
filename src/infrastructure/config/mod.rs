use crate::domain::narration::DEFAULT_MAX_CHUNK_CHARS;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    pub allowed_origins: Vec<String>,
    // AWS
    pub aws_region: String,
    pub s3_bucket: String,
    pub s3_public_read: bool,
    pub artifact_public_base_url: Option<String>,
    pub polly_voice_id: String,
    pub polly_engine: String,
    // Auth0
    pub auth0_domain: String,
    pub auth0_audience: String,
    pub jwks_cache_ttl_seconds: u64,
    // Metadata tables
    pub users_table: String,
    pub podcasts_table: String,
    // Narration pipeline
    pub max_chunk_chars: usize,
    pub scratch_dir: PathBuf,
    pub article_fetch_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            allowed_origins: parse_origins(
                &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".to_string()),
            ),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            s3_bucket: env::var("S3_BUCKET")?,
            s3_public_read: parse_bool(env::var("S3_PUBLIC_READ").ok(), true),
            artifact_public_base_url: env::var("ARTIFACT_PUBLIC_BASE_URL")
                .ok()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            polly_voice_id: env::var("POLLY_VOICE_ID").unwrap_or_else(|_| "Joanna".to_string()),
            polly_engine: env::var("POLLY_ENGINE").unwrap_or_else(|_| "standard".to_string()),
            auth0_domain: env::var("AUTH0_DOMAIN")?,
            auth0_audience: env::var("AUTH0_API_AUDIENCE")?,
            jwks_cache_ttl_seconds: env::var("JWKS_CACHE_TTL_SECONDS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()?,
            users_table: validate_table_name(
                env::var("USERS_TABLE").unwrap_or_else(|_| "users".to_string()),
            )?,
            podcasts_table: validate_table_name(
                env::var("PODCASTS_TABLE").unwrap_or_else(|_| "podcasts".to_string()),
            )?,
            max_chunk_chars: env::var("MAX_CHUNK_CHARS")
                .unwrap_or_else(|_| DEFAULT_MAX_CHUNK_CHARS.to_string())
                .parse()?,
            scratch_dir: env::var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            article_fetch_timeout_seconds: env::var("ARTICLE_FETCH_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,
        };

        if config.max_chunk_chars == 0 {
            return Err("MAX_CHUNK_CHARS must be greater than zero".into());
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// JWKS endpoint of the configured identity provider
    pub fn jwks_url(&self) -> String {
        format!("https://{}/.well-known/jwks.json", self.auth0_domain)
    }

    /// Expected `iss` claim of tokens minted by the identity provider
    pub fn token_issuer(&self) -> String {
        format!("https://{}/", self.auth0_domain)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

fn parse_bool(raw: Option<String>, default: bool) -> bool {
    match raw.map(|v| v.trim().to_lowercase()) {
        Some(v) if v == "true" || v == "1" || v == "yes" => true,
        Some(v) if v == "false" || v == "0" || v == "no" => false,
        _ => default,
    }
}

/// Table names are interpolated into SQL, so only plain identifiers are accepted
fn validate_table_name(name: String) -> Result<String, Box<dyn std::error::Error>> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(name)
    } else {
        Err(format!("Invalid table name: {:?}", name).into())
    }
}
