mod openai;

use careermate_core::Language;
use thiserror::Error;

pub use openai::{OpenAiSpeech, DEFAULT_OPENAI_SPEECH_URL, DEFAULT_TTS_MODEL};

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("text-to-speech is not configured")]
    NotConfigured,
    #[error("text-to-speech request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("text-to-speech provider answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("text-to-speech provider returned no audio")]
    EmptyAudio,
}

/// Turns reply text into mp3 audio for a language.
pub trait SpeechSynthesizer: Send + Sync {
    fn provider(&self) -> &'static str;
    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>, SpeechError>;
}

#[derive(Debug, Clone)]
pub enum Speech {
    OpenAi(OpenAiSpeech),
    Disabled,
}

impl Speech {
    /// OpenAI speech when an API key is present, otherwise disabled.
    pub fn from_api_key(
        api_key: Option<String>,
        model: &str,
        endpoint: &str,
    ) -> anyhow::Result<Self> {
        match api_key.filter(|key| !key.trim().is_empty()) {
            Some(key) => Ok(Self::OpenAi(OpenAiSpeech::new(key, model, endpoint)?)),
            None => Ok(Self::Disabled),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::OpenAi(_))
    }
}

impl SpeechSynthesizer for Speech {
    fn provider(&self) -> &'static str {
        match self {
            Speech::OpenAi(speech) => speech.provider(),
            Speech::Disabled => "disabled",
        }
    }

    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>, SpeechError> {
        match self {
            Speech::OpenAi(speech) => speech.synthesize(text, language).await,
            Speech::Disabled => Err(SpeechError::NotConfigured),
        }
    }
}
