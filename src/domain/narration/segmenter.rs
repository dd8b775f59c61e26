use regex::{Match, Regex};
use std::sync::OnceLock;

/// AWS Polly rejects requests above 3000 billed characters
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 3000;

/// Words that end with a period without ending the sentence
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "inc", "ltd",
];

/// Capitalized words that usually open a new sentence rather than continue a name
const SENTENCE_STARTERS: &[&str] = &[
    "A", "An", "And", "But", "He", "Her", "His", "I", "In", "It", "Its", "My", "Our", "She", "So",
    "That", "The", "Then", "There", "These", "They", "This", "We", "What", "When", "You",
];

/// Splits text into an ordered sequence of sentences
pub trait SentenceTokenizer: Send + Sync {
    fn sentences(&self, text: &str) -> Vec<String>;
}

/// Punctuation-driven tokenizer.
///
/// A boundary is a run of `.`, `!` or `?` (optionally closed by quotes or
/// brackets) followed by whitespace, or a blank line between paragraphs.
/// Periods after common abbreviations and name initials, or followed by a
/// lowercase word, are not boundaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct PunctuationTokenizer;

fn boundary_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"[.!?]+["'”’)\]]*\s+|\n\s*\n"#).expect("sentence boundary pattern is valid")
    })
}

impl PunctuationTokenizer {
    /// Whether a period boundary sits inside a sentence: before a lowercase
    /// word, after an abbreviation, after a name initial, or in `No. 5`
    fn continues_sentence(text: &str, boundary: &Match<'_>) -> bool {
        let terminator = boundary.as_str();
        if !terminator.starts_with('.') || terminator.matches('\n').count() > 1 {
            return false;
        }

        let next_word = text[boundary.end()..]
            .split_whitespace()
            .next()
            .unwrap_or("");
        let Some(next_first) = next_word.chars().next() else {
            return false;
        };
        if next_first.is_lowercase() {
            return true;
        }

        let word = text[..boundary.start()]
            .rsplit(|c: char| c.is_whitespace() || c == '(' || c == '"')
            .next()
            .unwrap_or("");
        if word.is_empty() {
            return false;
        }
        if word == "No" {
            return next_first.is_ascii_digit();
        }

        let mut chars = word.chars();
        if let (Some(first), None) = (chars.next(), chars.next()) {
            if first.is_uppercase() {
                let next_bare = next_word.trim_matches(|c: char| !c.is_alphanumeric());
                return next_first.is_uppercase() && !SENTENCE_STARTERS.contains(&next_bare);
            }
        }

        ABBREVIATIONS.contains(&word.to_lowercase().as_str())
    }
}

impl SentenceTokenizer for PunctuationTokenizer {
    fn sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for mat in boundary_pattern().find_iter(text) {
            if Self::continues_sentence(text, &mat) {
                continue;
            }
            let sentence = text[start..mat.end()].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = mat.end();
        }

        let rest = text[start..].trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }

        sentences
    }
}

/// Greedily packs whole sentences into chunks of at most `max_chars` characters.
///
/// Sentences inside a chunk are joined with a single space. A sentence longer
/// than `max_chars` is never split and becomes a chunk of its own.
pub fn split_text(tokenizer: &dyn SentenceTokenizer, text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in tokenizer.sentences(text) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let sentence_len = sentence.chars().count();

        if current.is_empty() {
            current.push_str(sentence);
            current_len = sentence_len;
        } else if current_len + 1 + sentence_len <= max_chars {
            current.push(' ');
            current.push_str(sentence);
            current_len += 1 + sentence_len;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(sentence);
            current_len = sentence_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
