use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ALLOWED_RESUME_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ResumeUploadError {
    #[error("No file selected")]
    NoFileSelected,
    #[error("Invalid file type. Allowed: {}", ALLOWED_RESUME_EXTENSIONS.join(", "))]
    InvalidFileType { extension: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSuggestion {
    pub title: String,
    pub company: String,
    pub match_score: u8,
    pub linkedin_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub message: String,
    pub skills_found: Vec<String>,
    pub job_suggestions: Vec<JobSuggestion>,
    pub file_type: String,
    pub recommendations: Vec<String>,
}

/// Lowercased text after the last dot, or empty when the name has none.
pub fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Validates the upload name and returns the canned analysis. File contents
/// are not inspected.
pub fn analyze_resume_upload(file_name: &str) -> Result<ResumeAnalysis, ResumeUploadError> {
    if file_name.trim().is_empty() {
        return Err(ResumeUploadError::NoFileSelected);
    }

    let extension = file_extension(file_name);
    if !ALLOWED_RESUME_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ResumeUploadError::InvalidFileType { extension });
    }

    let job_suggestions = vec![
        job(
            "Data Scientist",
            "Google",
            92,
            "https://linkedin.com/jobs/search/?keywords=data%20scientist&f_C=1441",
        ),
        job(
            "Machine Learning Engineer",
            "Microsoft",
            88,
            "https://linkedin.com/jobs/search/?keywords=machine%20learning%20engineer&f_C=1035",
        ),
        job(
            "Software Engineer",
            "Amazon",
            85,
            "https://linkedin.com/jobs/search/?keywords=software%20engineer&f_C=1586",
        ),
    ];

    Ok(ResumeAnalysis {
        message: format!(
            "📄 Resume \"{}\" uploaded successfully! Based on your skills, I found {} highly matching opportunities.",
            file_name,
            job_suggestions.len()
        ),
        skills_found: [
            "Python",
            "Machine Learning",
            "Data Analysis",
            "SQL",
            "Statistics",
            "Deep Learning",
        ]
        .iter()
        .map(|skill| skill.to_string())
        .collect(),
        job_suggestions,
        file_type: extension.to_uppercase(),
        recommendations: vec![
            "Add more quantifiable achievements".to_string(),
            "Include relevant certifications".to_string(),
            "Optimize for ATS keywords".to_string(),
            "Consider adding a portfolio link".to_string(),
        ],
    })
}

fn job(title: &str, company: &str, match_score: u8, linkedin_url: &str) -> JobSuggestion {
    JobSuggestion {
        title: title.to_string(),
        company: company.to_string(),
        match_score,
        linkedin_url: linkedin_url.to_string(),
    }
}
