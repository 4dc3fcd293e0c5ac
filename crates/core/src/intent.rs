use crate::models::Intent;

const GREETING_KEYWORDS: &[&str] = &[
    "hi", "hello", "hey", "start", "namaste", "namaskar", "hola", "bonjour", "नमस्ते", "नमस्कार",
    "हैलो", "ਸਤ ਸ੍ਰੀ ਅਕਾਲ", "ਨਮਸਕਾਰ", "ਹੈਲੋ", "ನಮಸ್ಕಾರ", "ನಮಸ್ತೆ", "ಹಲೋ", "vanakkam", "adaab",
    "sup", "howdy",
];

const SALARY_KEYWORDS: &[&str] = &[
    "salary", "pay", "compensation", "money", "earning", "income", "wage", "package", "वेतन",
    "तनख्वाह", "पैसा", "कमाई", "पैकेज", "ਤਨਖਾਹ", "ਪੈਸਾ", "ਕਮਾਈ", "ಸಂಬಳ", "ದುಡ್ಡು", "ಕಮಾಯಿ", "पगार",
    "रुपया", "ctc", "lpa",
];

const SKILLS_KEYWORDS: &[&str] = &[
    "skills", "learn", "study", "course", "training", "education", "skill", "technology", "कौशल",
    "सीखना", "अध्ययन", "पढ़ना", "तकनीक", "ਸਿੱਖਣਾ", "ਹੁਨਰ", "ਸਿੱਖਿਆ", "ಕೌಶಲ್ಯ", "ಕಲಿಕೆ", "ಅಧ್ಯಯನ",
    "ತಂತ್ರಜ್ಞಾನ", "शिकणे", "कौशल्य", "tech",
];

const INTERVIEW_KEYWORDS: &[&str] = &[
    "interview", "preparation", "questions", "tips", "prep", "question", "mock", "साक्षात्कार",
    "इंटरव्यू", "प्रश्न", "तैयारी", "ਇੰਟਰਵਿਊ", "ਸਵਾਲ", "ਤਿਆਰੀ", "ಸಂದರ್ಶನ", "ಪ್ರಶ್ನೆ", "ತಯಾರಿ",
    "मुलाखत",
];

const JOB_KEYWORDS: &[&str] = &[
    "job", "career", "work", "employment", "position", "role", "jobs", "company", "नौकरी", "काम",
    "कैरियर", "रोजगार", "कंपनी", "ਨੌਕਰੀ", "ਕੰਮ", "ਕਰੀਅਰ", "ಕೆಲಸ", "ನೌಕರಿ", "ಕ್ಯಾರಿಯರ್", "ಕಂಪನಿ",
    "नोकरी", "vacancy",
];

const RESUME_KEYWORDS: &[&str] = &[
    "resume", "cv", "biodata", "profile", "bio", "portfolio", "बायोडाटा", "रिज्यूमे", "प्रोफाइल",
    "ਬਾਇਓਡਾਟਾ", "ਪ੍ਰੋਫਾਈਲ", "ರೆಸ್ಯೂಮೆ", "ಬಯೋಡಾಟಾ", "ಪ್ರೊಫೈಲ್",
];

/// Trigger strings per intent, across English and the supported Indic
/// scripts. Built once at start-up and shared read-only.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    entries: Vec<(Intent, Vec<String>)>,
}

impl KeywordSet {
    pub fn builtin() -> Self {
        let entries = Intent::PRIORITY
            .iter()
            .map(|intent| {
                let words = builtin_keywords(*intent)
                    .iter()
                    .map(|word| word.to_lowercase())
                    .collect();
                (*intent, words)
            })
            .collect();

        Self { entries }
    }

    pub fn keywords(&self, intent: Intent) -> &[String] {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == intent)
            .map(|(_, words)| words.as_slice())
            .unwrap_or(&[])
    }

    /// First intent in priority order with a keyword contained anywhere in the
    /// lowercased message. Containment is plain substring matching, so "hi"
    /// also fires inside "this".
    pub fn classify(&self, message: &str) -> Intent {
        let lower = message.to_lowercase();

        self.entries
            .iter()
            .find(|(_, words)| contains_any(&lower, words))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Default)
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_keywords(intent: Intent) -> &'static [&'static str] {
    match intent {
        Intent::Greeting => GREETING_KEYWORDS,
        Intent::Salary => SALARY_KEYWORDS,
        Intent::Skills => SKILLS_KEYWORDS,
        Intent::Interview => INTERVIEW_KEYWORDS,
        Intent::Job => JOB_KEYWORDS,
        Intent::Resume => RESUME_KEYWORDS,
        Intent::Default => &[],
    }
}

pub fn normalize_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn contains_any(input: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| input.contains(needle.as_str()))
}
