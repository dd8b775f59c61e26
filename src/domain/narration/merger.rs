use super::error::NarrationError;
use crate::infrastructure::scratch::StagedFile;

/// Synthesized audio for one chunk, staged on local disk
#[derive(Debug)]
pub struct AudioClip {
    /// 1-based position of the chunk this clip was synthesized from
    pub chunk: usize,
    pub file: StagedFile,
}

/// The concatenation of every clip of a request, in chunk order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedTrack {
    pub bytes: Vec<u8>,
}

/// Append clips back to back. MP3 is a sequence of self-delimiting frames,
/// so the byte concatenation of MP3 clips is itself a playable stream.
pub async fn merge_clips(clips: &[AudioClip]) -> Result<MergedTrack, NarrationError> {
    if clips.is_empty() {
        return Err(NarrationError::EmptyInput);
    }

    let mut bytes = Vec::new();
    for clip in clips {
        let audio = clip.file.read().await.map_err(|e| {
            NarrationError::Merge(format!("Failed to read clip {}: {}", clip.chunk, e))
        })?;
        bytes.extend(audio);
    }

    tracing::debug!(
        clip_count = clips.len(),
        merged_size = bytes.len(),
        "Clips merged"
    );

    Ok(MergedTrack { bytes })
}
