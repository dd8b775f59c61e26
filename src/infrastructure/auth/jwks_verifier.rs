use crate::domain::auth::{AuthError, Claims, Identity, IdentityVerifier};
use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header,
    jwk::{Jwk, JwkSet},
    Algorithm, DecodingKey, Validation,
};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Unknown key ids trigger at most one key set refetch per this window
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Verifies RS256 access tokens against the identity provider's published JWKS
pub struct JwksVerifier {
    http_client: reqwest::Client,
    jwks_url: String,
    issuer: String,
    audience: String,
    key_sets: Cache<String, Arc<JwkSet>>,
    recent_refreshes: Cache<String, ()>,
}

impl JwksVerifier {
    pub fn new(jwks_url: String, issuer: String, audience: String, cache_ttl: Duration) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            jwks_url,
            issuer,
            audience,
            key_sets: Cache::builder()
                .max_capacity(1)
                .time_to_live(cache_ttl)
                .build(),
            recent_refreshes: Cache::builder()
                .max_capacity(1)
                .time_to_live(MIN_REFRESH_INTERVAL)
                .build(),
        }
    }

    async fn key_set(&self) -> Result<Arc<JwkSet>, AuthError> {
        self.key_sets
            .try_get_with(self.jwks_url.clone(), self.fetch_key_set())
            .await
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))
    }

    async fn fetch_key_set(&self) -> Result<Arc<JwkSet>, AuthError> {
        tracing::debug!(jwks_url = %self.jwks_url, "Fetching signing keys");

        let response = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeySetUnavailable(format!(
                "JWKS endpoint returned {}",
                response.status()
            )));
        }

        let key_set = response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(format!("Invalid JWKS document: {}", e)))?;

        tracing::info!(key_count = key_set.keys.len(), "Signing keys loaded");
        Ok(Arc::new(key_set))
    }

    /// Find the key for `kid`, refetching once when it is missing so rotated keys are picked up
    async fn find_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        let key_set = self.key_set().await?;
        if let Some(jwk) = key_set.find(kid) {
            return Ok(jwk.clone());
        }

        if self.recent_refreshes.contains_key(&self.jwks_url) {
            return Err(AuthError::UnknownKey(Some(kid.to_string())));
        }
        self.recent_refreshes.insert(self.jwks_url.clone(), ()).await;
        self.key_sets.invalidate(&self.jwks_url).await;

        tracing::info!(kid = %kid, "Unknown signing key, refreshing key set");
        self.key_set()
            .await?
            .find(kid)
            .cloned()
            .ok_or_else(|| AuthError::UnknownKey(Some(kid.to_string())))
    }
}

#[async_trait]
impl IdentityVerifier for JwksVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::Malformed(e.to_string()))?;
        let kid = header.kid.ok_or(AuthError::UnknownKey(None))?;

        let jwk = self.find_key(&kid).await?;
        let decoding_key =
            DecodingKey::from_jwk(&jwk).map_err(|e| AuthError::Invalid(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AuthError::Invalid(e.to_string()))?;

        Ok(Identity::from(data.claims))
    }
}
