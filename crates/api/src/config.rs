use std::env;
use std::path::PathBuf;
use std::time::Duration;

use careermate_speech::{DEFAULT_OPENAI_SPEECH_URL, DEFAULT_TTS_MODEL};
use careermate_translation::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};

/// Start-up settings, read once from `CAREERMATE_*` variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind: String,
    /// `None` keeps chat logs in memory.
    pub database_url: Option<String>,
    pub translate_endpoint: String,
    pub translate_timeout: Duration,
    /// `None` disables `/api/speak`.
    pub openai_api_key: Option<String>,
    pub tts_model: String,
    pub openai_url: String,
    pub web_root: PathBuf,
    pub allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
            database_url: None,
            translate_endpoint: DEFAULT_ENDPOINT.to_string(),
            translate_timeout: DEFAULT_TIMEOUT,
            openai_api_key: None,
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            openai_url: DEFAULT_OPENAI_SPEECH_URL.to_string(),
            web_root: PathBuf::from("."),
            allowed_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind: env::var("CAREERMATE_BIND").unwrap_or(defaults.bind),
            database_url: non_empty_var("CAREERMATE_DATABASE_URL"),
            translate_endpoint: env::var("CAREERMATE_TRANSLATE_URL")
                .unwrap_or(defaults.translate_endpoint),
            translate_timeout: env::var("CAREERMATE_TRANSLATE_TIMEOUT_SECONDS")
                .ok()
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.translate_timeout),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            tts_model: env::var("CAREERMATE_TTS_MODEL").unwrap_or(defaults.tts_model),
            openai_url: env::var("CAREERMATE_OPENAI_URL").unwrap_or(defaults.openai_url),
            web_root: env::var("CAREERMATE_WEB_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.web_root),
            allowed_origins: env::var("CAREERMATE_ALLOWED_ORIGINS")
                .map(|raw| parse_allowed_origins(&raw))
                .unwrap_or(defaults.allowed_origins),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn parse_allowed_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            parse_allowed_origins(" http://localhost:5500/ ,, https://careermate.app"),
            vec!["http://localhost:5500", "https://careermate.app"]
        );
        assert!(parse_allowed_origins(" , ").is_empty());
    }

    #[test]
    fn defaults_point_at_public_providers() {
        let config = ApiConfig::default();
        assert_eq!(config.bind, "0.0.0.0:5000");
        assert_eq!(config.translate_timeout, Duration::from_secs(15));
        assert_eq!(config.tts_model, "tts-1-hd");
        assert!(config.database_url.is_none());
        assert!(config.openai_api_key.is_none());
    }
}
