use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    En,
    Hi,
    Pa,
    Kn,
}

impl Language {
    pub const ALL: [Language; 4] = [Self::En, Self::Hi, Self::Pa, Self::Kn];

    /// Lenient parse used at every boundary. Unknown or missing codes resolve
    /// to English.
    pub fn from_optional_str(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "hi" || v == "hi-in" || v == "hindi" => Self::Hi,
            Some(v) if v == "pa" || v == "pa-in" || v == "punjabi" => Self::Pa,
            Some(v) if v == "kn" || v == "kn-in" || v == "kannada" => Self::Kn,
            _ => Self::En,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Pa => "pa",
            Self::Kn => "kn",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hi => "हिन्दी",
            Self::Pa => "ਪੰਜਾਬੀ",
            Self::Kn => "ಕನ್ನಡ",
        }
    }

    /// Text-to-speech voice used when reading a reply aloud.
    pub fn voice(self) -> &'static str {
        match self {
            Self::En => "alloy",
            Self::Hi => "nova",
            Self::Pa => "fable",
            Self::Kn => "shimmer",
        }
    }

    pub fn is_english(self) -> bool {
        self == Self::En
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Salary,
    Skills,
    Interview,
    Job,
    Resume,
    Default,
}

impl Intent {
    /// Order in which keyword sets are tested. `Default` is never matched by
    /// keyword, it is what is left over.
    pub const PRIORITY: [Intent; 6] = [
        Self::Greeting,
        Self::Salary,
        Self::Skills,
        Self::Interview,
        Self::Job,
        Self::Resume,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Salary => "salary",
            Self::Skills => "skills",
            Self::Interview => "interview",
            Self::Job => "job",
            Self::Resume => "resume",
            Self::Default => "default",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "greeting" => Some(Self::Greeting),
            "salary" => Some(Self::Salary),
            "skills" => Some(Self::Skills),
            "interview" => Some(Self::Interview),
            "job" => Some(Self::Job),
            "resume" => Some(Self::Resume),
            "default" => Some(Self::Default),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatInput {
    pub message: String,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationStats {
    pub chunks: usize,
    pub fallbacks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub suggestions: Vec<String>,
    pub intent: Intent,
    pub language: Language,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<TranslationStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_english() {
        assert_eq!(Language::from_optional_str(Some("fr")), Language::En);
        assert_eq!(Language::from_optional_str(None), Language::En);
        assert_eq!(Language::from_optional_str(Some(" KN ")), Language::Kn);
    }

    #[test]
    fn voices_follow_language() {
        let voices = Language::ALL.map(Language::voice);
        assert_eq!(voices, ["alloy", "nova", "fable", "shimmer"]);
    }

    #[test]
    fn intent_serializes_as_label() {
        let json = serde_json::to_string(&Intent::Interview).unwrap();
        assert_eq!(json, "\"interview\"");
        assert_eq!(Intent::parse("Resume"), Some(Intent::Resume));
    }
}
