use std::time::Duration;

use anyhow::{Context, Result};
use careermate_core::Language;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::{SpeechError, SpeechSynthesizer};

pub const DEFAULT_OPENAI_SPEECH_URL: &str = "https://api.openai.com/v1/audio/speech";
pub const DEFAULT_TTS_MODEL: &str = "tts-1-hd";
const SPEECH_SPEED: f32 = 0.9;

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
    speed: f32,
}

#[derive(Debug, Clone)]
pub struct OpenAiSpeech {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiSpeech {
    pub fn new(api_key: String, model: &str, endpoint: &str) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(6))
            .timeout(Duration::from_secs(60))
            .build()
            .context("failed to build speech HTTP client")?;

        Ok(Self {
            client,
            api_key,
            model: model.to_string(),
            endpoint: endpoint.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl SpeechSynthesizer for OpenAiSpeech {
    fn provider(&self) -> &'static str {
        "openai"
    }

    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>, SpeechError> {
        let payload = SpeechRequest {
            model: &self.model,
            voice: language.voice(),
            input: text,
            response_format: "mp3",
            speed: SPEECH_SPEED,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        info!(
            voice = language.voice(),
            model = %self.model,
            bytes = audio.len(),
            "speech synthesized"
        );
        Ok(audio.to_vec())
    }
}
