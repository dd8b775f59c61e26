pub mod error;
pub mod merger;
pub mod pipeline;
pub mod segmenter;

pub use error::NarrationError;
pub use merger::{merge_clips, AudioClip, MergedTrack};
pub use pipeline::NarrationPipeline;
pub use segmenter::{split_text, PunctuationTokenizer, SentenceTokenizer, DEFAULT_MAX_CHUNK_CHARS};
