use crate::models::Intent;

const GREETING_RESPONSE: &str = r#"👋 **Hello! I'm CareerMate!**

I help with:
• Job search & salaries
• Tech skills & learning  
• Interview preparation
• Resume optimization

Ask me about salaries, skills, or jobs!

What can I help you with?"#;

const SALARY_RESPONSE: &str = r#"💰 **Tech Salaries 2024-2025**

**Software Engineer:**
Entry: $75k-$120k | Mid: $110k-$180k | Senior: $160k-$350k

**AI/ML Engineer:** 
Entry: $95k-$130k | Mid: $140k-$200k | Senior: $200k-$400k

**Data Scientist:**
Entry: $85k-$120k | Mid: $120k-$180k | Senior: $180k-$300k

**Location boost:** SF +35%, NYC +25%, Remote -15%

Get multiple offers and negotiate!"#;

const SKILLS_RESPONSE: &str = r#"🎓 **Hottest Tech Skills 2024-2025**

**Programming:** Python (AI/ML) • JavaScript (Web) • SQL (Essential)

**AI/ML:** ChatGPT integration • PyTorch • Vector databases

**Cloud:** AWS • Docker • Kubernetes

**Learning plan:** Pick Python → Choose AI/Web/Cloud → Build 3 projects

**Free resources:** freeCodeCamp.org, Fast.ai, AWS Educate

Which area interests you?"#;

const INTERVIEW_RESPONSE: &str = r#"🎤 **Interview Prep Essentials**

**Top 3 questions:**
1. "Tell me about yourself" → Present + Impact + Future
2. "Why this job?" → Research company + Show excitement
3. "Biggest weakness?" → Real weakness + Improvement + Results

**Technical prep:** LeetCode Easy (50) → Medium (100)

**Tips:** Apply Mon-Wed, research interviewer, prepare 5 questions

Need company-specific help?"#;

const JOB_RESPONSE: &str = r#"🔍 **Job Search Strategy**

**Best Job Boards:**
• LinkedIn Jobs (most active)
• AngelList (startups)  
• Glassdoor (salary insights)
• Stack Overflow Jobs (tech focus)

**Application Tips:**
• Apply within 24hrs of posting
• Customize resume for each role
• Follow up in 1 week
• Use referrals when possible

**Remote-friendly companies:** GitLab, Automattic, Buffer, Zapier

Want specific company recommendations?"#;

const RESUME_RESPONSE: &str = r#"📄 **Resume Optimization**

**Structure:** Header → Summary → Experience → Skills

**Writing:** Action verbs + Quantified results + Job keywords

**ATS-friendly:** PDF format, simple layout, standard fonts

**Common mistakes:**
• Generic objective statements
• Missing quantifiable achievements
• Poor formatting
• Typos and grammar errors

**Test:** Upload to Jobscan.co for ATS score

Want help with specific sections?"#;

const DEFAULT_RESPONSE_TAIL: &str = r#"I help with:
💼 Job search & career strategy
💰 Salary data & negotiation
🎓 Tech skills & learning
🎯 Interview preparation

**Quick examples:**
"Software engineer salary"
"Skills for AI jobs"
"Google interview prep"  
"Resume tips"

What do you need help with?"#;

/// Canonical English reply per intent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseCatalog;

impl ResponseCatalog {
    pub fn new() -> Self {
        Self
    }

    /// The default reply echoes `original_message` verbatim.
    pub fn lookup(&self, intent: Intent, original_message: &str) -> String {
        match intent {
            Intent::Greeting => GREETING_RESPONSE.to_string(),
            Intent::Salary => SALARY_RESPONSE.to_string(),
            Intent::Skills => SKILLS_RESPONSE.to_string(),
            Intent::Interview => INTERVIEW_RESPONSE.to_string(),
            Intent::Job => JOB_RESPONSE.to_string(),
            Intent::Resume => RESUME_RESPONSE.to_string(),
            Intent::Default => format!(
                "🤖 **Got it: \"{}\"**\n\n{}",
                original_message, DEFAULT_RESPONSE_TAIL
            ),
        }
    }
}
