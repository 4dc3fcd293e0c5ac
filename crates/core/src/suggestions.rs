use crate::models::Intent;

pub type Suggestions = [&'static str; 4];

const DEFAULT_SUGGESTIONS: Suggestions = [
    "🔍 Find me jobs",
    "📄 Analyze my resume",
    "🎤 Interview preparation",
    "📈 Career planning",
];

/// Follow-up prompts shown under a reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestionCatalog;

impl SuggestionCatalog {
    pub fn new() -> Self {
        Self
    }

    pub fn suggestions_for(&self, intent: Intent) -> Suggestions {
        match intent {
            Intent::Skills => [
                "🐍 Python learning roadmap",
                "🤖 AI/ML fundamentals",
                "☁️ Cloud platforms guide",
                "💻 Full-stack development",
            ],
            Intent::Salary => [
                "💼 Entry-level tech salaries",
                "🏢 Big tech compensation",
                "📍 Location-based pay",
                "💰 Salary negotiation tips",
            ],
            Intent::Interview => [
                "❓ Common tech questions",
                "💡 STAR method examples",
                "🎯 System design basics",
                "👔 Behavioral interview prep",
            ],
            Intent::Resume => [
                "📄 Upload my resume now",
                "✨ Resume formatting tips",
                "🎯 ATS optimization guide",
                "💼 Cover letter tips",
            ],
            Intent::Job => [
                "🔍 Remote job opportunities",
                "🚀 Startup positions",
                "🏢 Big tech roles",
                "📈 Career transition tips",
            ],
            Intent::Greeting => [
                "💼 Career guidance",
                "📈 Skill development",
                "💰 Salary information",
                "🎤 Interview preparation",
            ],
            Intent::Default => DEFAULT_SUGGESTIONS,
        }
    }

    pub fn suggestions_owned(&self, intent: Intent) -> Vec<String> {
        self.suggestions_for(intent)
            .iter()
            .map(|label| label.to_string())
            .collect()
    }
}
