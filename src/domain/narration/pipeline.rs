use super::error::NarrationError;
use super::merger::{merge_clips, AudioClip};
use super::segmenter::{split_text, SentenceTokenizer};
use crate::infrastructure::repositories::{ArtifactRepository, TtsRepository};
use crate::infrastructure::scratch::ScratchSpace;
use std::sync::Arc;

/// Turns text into one stored audio track.
///
/// Stages run strictly in sequence: segment, synthesize each chunk, merge,
/// upload. The first failure aborts the request. Every clip and the merged
/// track are staged as scratch files whose guards are dropped on every exit
/// path, so nothing is left on local disk once `narrate` returns.
pub struct NarrationPipeline {
    tts_repo: Arc<dyn TtsRepository>,
    artifact_repo: Arc<dyn ArtifactRepository>,
    tokenizer: Arc<dyn SentenceTokenizer>,
    scratch: ScratchSpace,
    max_chunk_chars: usize,
}

impl NarrationPipeline {
    pub fn new(
        tts_repo: Arc<dyn TtsRepository>,
        artifact_repo: Arc<dyn ArtifactRepository>,
        tokenizer: Arc<dyn SentenceTokenizer>,
        scratch: ScratchSpace,
        max_chunk_chars: usize,
    ) -> Self {
        Self {
            tts_repo,
            artifact_repo,
            tokenizer,
            scratch,
            max_chunk_chars,
        }
    }

    /// Synthesize `text` and upload it as `{base_name}_full.mp3`.
    ///
    /// Returns the public address of the uploaded track.
    pub async fn narrate(&self, text: &str, base_name: &str) -> Result<String, NarrationError> {
        let chunks = split_text(self.tokenizer.as_ref(), text, self.max_chunk_chars);
        if chunks.is_empty() {
            return Err(NarrationError::EmptyInput);
        }

        tracing::info!(
            base_name = %base_name,
            chunk_count = chunks.len(),
            text_length = text.chars().count(),
            "Text split into chunks"
        );

        let clips = self.synthesize_chunks(&chunks, base_name).await?;

        let track = merge_clips(&clips).await?;
        let merged_file = self
            .scratch
            .stage(&format!("{}_full", base_name), track.bytes)
            .await
            .map_err(|e| NarrationError::Scratch(e.to_string()))?;
        release_all(clips);

        let object_name = format!("{}_full.mp3", base_name);
        let upload_bytes = merged_file
            .read()
            .await
            .map_err(|e| NarrationError::Scratch(e.to_string()))?;
        let address = self
            .artifact_repo
            .put(&object_name, upload_bytes)
            .await
            .map_err(|message| {
                tracing::error!(object_name = %object_name, error = %message, "Upload failed");
                NarrationError::Store(message)
            })?;

        if let Err(e) = merged_file.release() {
            tracing::warn!(error = %e, "Merged track could not be removed after upload");
        }

        tracing::info!(object_name = %object_name, address = %address, "Narration stored");

        Ok(address)
    }

    /// Synthesize chunks in order, staging one clip per chunk.
    /// Clips staged before a failure are dropped, which deletes their files.
    async fn synthesize_chunks(
        &self,
        chunks: &[String],
        base_name: &str,
    ) -> Result<Vec<AudioClip>, NarrationError> {
        let mut clips = Vec::with_capacity(chunks.len());

        for (index, chunk) in chunks.iter().enumerate() {
            let number = index + 1;

            let audio = self.tts_repo.synthesize(chunk).await.map_err(|message| {
                tracing::error!(
                    chunk = number,
                    chunk_count = chunks.len(),
                    discarded_clips = clips.len(),
                    error = %message,
                    "Chunk synthesis failed, aborting narration"
                );
                NarrationError::Synthesis {
                    chunk: number,
                    message,
                }
            })?;

            let audio_size = audio.len();
            let file = self
                .scratch
                .stage(&format!("{}_part{}", base_name, number), audio)
                .await
                .map_err(|e| NarrationError::Scratch(e.to_string()))?;

            tracing::debug!(chunk = number, audio_size, "Chunk synthesized");
            clips.push(AudioClip {
                chunk: number,
                file,
            });
        }

        Ok(clips)
    }
}

fn release_all(clips: Vec<AudioClip>) {
    for clip in clips {
        let chunk = clip.chunk;
        if let Err(e) = clip.file.release() {
            tracing::warn!(chunk, error = %e, "Clip could not be removed");
        }
    }
}
