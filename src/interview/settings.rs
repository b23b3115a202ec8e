use serde::{Deserialize, Serialize};
use validator::Validate;

/// Kind of interview being rehearsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewType {
    Behavioral,
    Technical,
    #[default]
    General,
}

/// Configuration of one interview, fixed once questions are generated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct InterviewSettings {
    /// Company the candidate is interviewing for (e.g., "Google")
    #[validate(length(min = 1))]
    pub dream_company: String,

    #[validate(length(min = 1))]
    pub industry: String,

    #[validate(length(min = 1))]
    pub job_role: String,

    pub interview_type: InterviewType,

    /// 1 (gentle) to 10 (hardest)
    #[validate(range(min = 1, max = 10))]
    pub difficulty: u8,

    /// Years of experience
    #[validate(range(max = 20))]
    pub experience_level: u8,

    /// Free-text list of skills to emphasise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_skills: Option<String>,

    #[validate(range(min = 3, max = 10))]
    pub num_questions: usize,
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            dream_company: "Google".to_string(),
            industry: "Technology".to_string(),
            job_role: "Software Engineer".to_string(),
            interview_type: InterviewType::General,
            difficulty: 5,
            experience_level: 2,
            focus_skills: None,
            num_questions: 5,
        }
    }
}

impl InterviewSettings {
    /// Focus skills with blank input treated as absent
    pub fn focus_skills(&self) -> Option<&str> {
        self.focus_skills
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
