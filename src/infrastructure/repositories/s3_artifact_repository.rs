use super::artifact_repository::ArtifactRepository;
use async_trait::async_trait;
use aws_sdk_s3::{primitives::ByteStream, types::ObjectCannedAcl, Client as S3Client};
use std::sync::Arc;

/// AWS S3 implementation of the artifact repository
pub struct S3ArtifactRepository {
    s3_client: Arc<S3Client>,
    bucket: String,
    region: String,
    public_read: bool,
    public_base_url: Option<String>,
}

impl S3ArtifactRepository {
    pub fn new(
        s3_client: Arc<S3Client>,
        bucket: String,
        region: String,
        public_read: bool,
        public_base_url: Option<String>,
    ) -> Self {
        Self {
            s3_client,
            bucket,
            region,
            public_read,
            public_base_url,
        }
    }

    /// Public URL of an object key
    pub fn public_url(&self, key: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}", base, key),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}

#[async_trait]
impl ArtifactRepository for S3ArtifactRepository {
    async fn put(&self, name: &str, bytes: Vec<u8>) -> Result<String, String> {
        let size = bytes.len();
        let mut request = self
            .s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(name)
            .content_type("audio/mpeg")
            .body(ByteStream::from(bytes));

        if self.public_read {
            request = request.acl(ObjectCannedAcl::PublicRead);
        }

        request.send().await.map_err(|e| {
            tracing::error!(
                error = ?e,
                bucket = %self.bucket,
                key = %name,
                "S3 put_object failed"
            );
            format!("S3 upload failed: {}", e)
        })?;

        tracing::info!(bucket = %self.bucket, key = %name, size_bytes = size, "Track uploaded");

        Ok(self.public_url(name))
    }
}
