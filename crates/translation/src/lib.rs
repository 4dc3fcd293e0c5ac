mod chunking;
mod mymemory;

use careermate_core::{normalize_text, Language, TranslationStats};
use thiserror::Error;
use tracing::{debug, instrument, warn};

pub use chunking::{chunk_for_translation, BULLET, MAX_CHUNK_CHARS};
pub use mymemory::{MyMemoryBackend, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("translation service answered with status {0}")]
    Status(u16),
    #[error("translation response is not valid JSON: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("translation response has no translated text")]
    MissingText,
}

/// A single call to an external translation service.
pub trait TranslationBackend: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    Translated { source: String, text: String },
    /// Blank input, returned as is without a backend call.
    Unchanged(String),
    /// The backend failed; the untranslated chunk is kept.
    Fallback { original: String, reason: String },
}

impl ChunkOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Translated { text, .. } => text,
            Self::Unchanged(text) => text,
            Self::Fallback { original, .. } => original,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    fn called_backend(&self) -> bool {
        !matches!(self, Self::Unchanged(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub target: Language,
    pub chunks: Vec<ChunkOutcome>,
}

impl Translation {
    fn untouched(text: &str, target: Language) -> Self {
        Self {
            text: text.to_string(),
            target,
            chunks: Vec::new(),
        }
    }

    pub fn backend_calls(&self) -> usize {
        self.chunks
            .iter()
            .filter(|chunk| chunk.called_backend())
            .count()
    }

    pub fn fallback_count(&self) -> usize {
        self.chunks.iter().filter(|chunk| chunk.is_fallback()).count()
    }

    pub fn stats(&self) -> TranslationStats {
        TranslationStats {
            chunks: self.backend_calls(),
            fallbacks: self.fallback_count(),
        }
    }
}

/// Translates English text of any length through a backend that only takes
/// short inputs. Chunks go out one at a time, in order, and are joined with a
/// blank line. A failing chunk degrades to its source text.
#[derive(Debug, Clone)]
pub struct ChunkedTranslator<B> {
    backend: B,
    max_chunk_chars: usize,
}

impl<B> ChunkedTranslator<B>
where
    B: TranslationBackend,
{
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            max_chunk_chars: MAX_CHUNK_CHARS,
        }
    }

    pub fn with_max_chunk_chars(mut self, max_chunk_chars: usize) -> Self {
        self.max_chunk_chars = max_chunk_chars.max(1);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[instrument(skip(self, text, target), fields(language = target.as_code()))]
    pub async fn translate(&self, text: &str, target: Language) -> Translation {
        if target.is_english() || text.trim().is_empty() {
            return Translation::untouched(text, target);
        }

        if chunking::char_len(text) <= self.max_chunk_chars {
            let outcome = self.translate_one(text, target).await;
            return Translation {
                text: outcome.text().to_string(),
                target,
                chunks: vec![outcome],
            };
        }

        let chunks = chunk_for_translation(text, self.max_chunk_chars);
        let total = chunks.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, chunk) in chunks.iter().enumerate() {
            debug!(
                chunk = index + 1,
                total,
                preview = %chunk.chars().take(50).collect::<String>(),
                "translating chunk"
            );
            outcomes.push(self.translate_one(chunk, target).await);
        }

        let text = outcomes
            .iter()
            .map(ChunkOutcome::text)
            .collect::<Vec<_>>()
            .join("\n\n");

        Translation {
            text,
            target,
            chunks: outcomes,
        }
    }

    pub async fn translate_one(&self, text: &str, target: Language) -> ChunkOutcome {
        if text.trim().is_empty() {
            return ChunkOutcome::Unchanged(text.to_string());
        }

        let cleaned = normalize_text(text);
        match self.backend.translate(&cleaned, Language::En, target).await {
            Ok(translated) => ChunkOutcome::Translated {
                source: text.to_string(),
                text: normalize_text(&translated),
            },
            Err(error) => {
                warn!(
                    target_language = target.as_code(),
                    error = %error,
                    "chunk translation failed, keeping source text"
                );
                ChunkOutcome::Fallback {
                    original: text.to_string(),
                    reason: error.to_string(),
                }
            }
        }
    }
}
