use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (AWS Polly in production).
///
/// One call synthesizes one chunk. Splitting text into chunks and merging
/// the resulting clips is done by the narration pipeline, not the provider.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize a single chunk of text to speech
    ///
    /// Returns encoded audio (MP3 format)
    ///
    /// # Errors
    /// Returns error if synthesis fails or provider is unavailable
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, String>;
}
