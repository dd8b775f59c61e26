use async_trait::async_trait;

/// Durable, publicly readable storage for finished audio tracks
#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    /// Store `bytes` under `name`, overwriting any previous object,
    /// and return the public address of the stored object
    async fn put(&self, name: &str, bytes: Vec<u8>) -> Result<String, String>;
}
