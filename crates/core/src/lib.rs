pub mod catalog;
pub mod intent;
pub mod models;
pub mod resume;
pub mod suggestions;

pub use catalog::ResponseCatalog;
pub use intent::{normalize_text, KeywordSet};
pub use models::*;
pub use resume::{analyze_resume_upload, JobSuggestion, ResumeAnalysis, ResumeUploadError};
pub use suggestions::{SuggestionCatalog, Suggestions};
