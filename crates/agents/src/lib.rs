use std::sync::Arc;
use std::time::Instant;

use careermate_core::{
    analyze_resume_upload, normalize_text, ChatInput, ChatReply, Intent, KeywordSet, Language,
    ResponseCatalog, ResumeAnalysis, ResumeUploadError, SuggestionCatalog,
};
use careermate_observability::AppMetrics;
use careermate_speech::{SpeechError, SpeechSynthesizer};
use careermate_storage::{ChatLogRepository, ChatRecord, InteractionKind, VoiceInteraction};
use careermate_translation::{ChunkedTranslator, TranslationBackend};
use chrono::Utc;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Empty message received")]
    EmptyMessage,
    #[error("No text provided")]
    EmptyText,
    #[error("OpenAI TTS failed: {0}")]
    Speech(#[from] SpeechError),
    #[error(transparent)]
    ResumeUpload(#[from] ResumeUploadError),
}

#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub bytes: Vec<u8>,
    pub voice: &'static str,
    pub language: Language,
    pub content_type: &'static str,
    pub file_name: String,
}

pub struct CareerAgent<B, V, S>
where
    B: TranslationBackend,
    V: SpeechSynthesizer,
    S: ChatLogRepository,
{
    keywords: Arc<KeywordSet>,
    responses: ResponseCatalog,
    suggestions: SuggestionCatalog,
    translator: ChunkedTranslator<B>,
    speech: V,
    store: Arc<S>,
    metrics: Arc<AppMetrics>,
}

impl<B, V, S> CareerAgent<B, V, S>
where
    B: TranslationBackend,
    V: SpeechSynthesizer,
    S: ChatLogRepository,
{
    pub fn new(
        keywords: Arc<KeywordSet>,
        translator: ChunkedTranslator<B>,
        speech: V,
        store: Arc<S>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            keywords,
            responses: ResponseCatalog::new(),
            suggestions: SuggestionCatalog::new(),
            translator,
            speech,
            store,
            metrics,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn speech(&self) -> &V {
        &self.speech
    }

    pub fn classify(&self, message: &str) -> Intent {
        self.keywords.classify(&normalize_text(message))
    }

    /// classify → template → translate (non-English only) → suggestions.
    #[instrument(skip(self, input))]
    pub async fn handle_chat(&self, input: ChatInput) -> Result<ChatReply, AgentError> {
        let started = Instant::now();

        let message = normalize_text(&input.message);
        if message.is_empty() {
            return Err(AgentError::EmptyMessage);
        }
        self.metrics.inc_chat_request();

        let language = Language::from_optional_str(input.language.as_deref());
        let intent = self.keywords.classify(&message);
        let english = self.responses.lookup(intent, &message);

        let (response, translation) = if language.is_english() {
            (english, None)
        } else {
            let translation = self.translator.translate(&english, language).await;
            let stats = translation.stats();
            self.metrics.add_translation(stats.chunks, stats.fallbacks);
            (translation.text, Some(stats))
        };

        let reply = ChatReply {
            response,
            suggestions: self.suggestions.suggestions_owned(intent),
            intent,
            language,
            timestamp: Utc::now(),
            translation,
        };

        let record = ChatRecord {
            id: None,
            user_message: message.clone(),
            bot_response: reply.response.clone(),
            language,
            intent,
            timestamp: reply.timestamp,
        };
        if let Err(error) = self.store.record_chat(&record).await {
            warn!(error = %error, "failed to log chat");
        }

        self.metrics.observe_chat_latency(started.elapsed());
        info!(
            intent = intent.as_str(),
            language = language.as_code(),
            chars = message.chars().count(),
            response_chars = reply.response.chars().count(),
            fallbacks = translation.map(|stats| stats.fallbacks).unwrap_or(0),
            "chat handled"
        );

        Ok(reply)
    }

    #[instrument(skip(self, text))]
    pub async fn speak(&self, text: &str, language: Language) -> Result<SpeechAudio, AgentError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AgentError::EmptyText);
        }
        self.metrics.inc_speech_request();

        let result = self.speech.synthesize(text, language).await;
        let (kind, success) = match &result {
            Ok(_) => (InteractionKind::OpenaiTts, true),
            Err(_) => (InteractionKind::OpenaiTtsFailed, false),
        };
        let interaction = VoiceInteraction {
            interaction_type: kind,
            language,
            success,
            timestamp: Utc::now(),
        };
        if let Err(error) = self.store.record_voice_interaction(&interaction).await {
            warn!(error = %error, "failed to log voice interaction");
        }

        match result {
            Ok(bytes) => Ok(SpeechAudio {
                bytes,
                voice: language.voice(),
                language,
                content_type: "audio/mpeg",
                file_name: format!("careermate_speech_{}.mp3", language.as_code()),
            }),
            Err(error) => {
                self.metrics.inc_speech_failure();
                warn!(
                    provider = self.speech.provider(),
                    voice = language.voice(),
                    error = %error,
                    "speech synthesis failed"
                );
                Err(AgentError::Speech(error))
            }
        }
    }

    pub fn analyze_resume(&self, file_name: &str) -> Result<ResumeAnalysis, AgentError> {
        let analysis = analyze_resume_upload(file_name)?;
        self.metrics.inc_resume_upload();
        info!(file_type = %analysis.file_type, "resume uploaded");
        Ok(analysis)
    }
}
