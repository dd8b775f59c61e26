use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum NarrationError {
    #[error("nothing to synthesize")]
    EmptyInput,
    #[error("speech synthesis failed on chunk {chunk}: {message}")]
    Synthesis { chunk: usize, message: String },
    #[error("audio merge failed: {0}")]
    Merge(String),
    #[error("audio upload failed: {0}")]
    Store(String),
    #[error("scratch storage failed: {0}")]
    Scratch(String),
}

/// Provider messages are logged where they occur; callers only learn the
/// failing stage and chunk.
impl From<NarrationError> for AppError {
    fn from(err: NarrationError) -> Self {
        match err {
            NarrationError::EmptyInput => AppError::BadRequest(err.to_string()),
            NarrationError::Synthesis { chunk, .. } => {
                AppError::ExternalService(format!("speech synthesis failed on chunk {}", chunk))
            }
            NarrationError::Store(_) => {
                AppError::ExternalService("audio upload failed".to_string())
            }
            NarrationError::Merge(_) | NarrationError::Scratch(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}
