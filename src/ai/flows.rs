//! Inputs and outputs of the AI flows
//!
//! Each flow takes a typed input record and produces a typed output that must
//! pass schema validation before it is used. Field names follow the camelCase
//! wire format the prompts and model responses use.

use crate::interview::InterviewSettings;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

/// Input for question generation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsInput {
    pub dream_company: String,
    pub industry: String,
    pub job_role: String,
    pub experience_level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_skills: Option<String>,
    pub num_questions: usize,
}

impl From<&InterviewSettings> for QuestionsInput {
    fn from(settings: &InterviewSettings) -> Self {
        Self {
            dream_company: settings.dream_company.clone(),
            industry: settings.industry.clone(),
            job_role: settings.job_role.clone(),
            experience_level: settings.experience_level,
            focus_skills: settings.focus_skills().map(str::to_string),
            num_questions: settings.num_questions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeneratedQuestions {
    #[validate(length(min = 1))]
    pub questions: Vec<String>,
}

/// Input for verbal feedback on one answer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackInput {
    pub dream_company: String,
    pub industry: String,
    pub job_role: String,
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_language_analysis: Option<String>,
}

impl FeedbackInput {
    pub fn new(settings: &InterviewSettings, question: &str, answer: &str) -> Self {
        Self {
            dream_company: settings.dream_company.clone(),
            industry: settings.industry.clone(),
            job_role: settings.job_role.clone(),
            question: question.to_string(),
            answer: answer.to_string(),
            body_language_analysis: None,
        }
    }

    pub fn with_body_language(mut self, analysis: Option<String>) -> Self {
        self.body_language_analysis = analysis;
        self
    }
}

/// Score (0–100) and commentary for one evaluation dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ScoredFeedback {
    #[validate(range(min = 0.0, max = 100.0))]
    pub score: f64,
    pub feedback: String,
}

/// Structured feedback on one answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    #[validate(range(min = 0.0, max = 100.0))]
    pub overall_score: f64,
    #[validate]
    pub clarity_and_conciseness: ScoredFeedback,
    #[validate]
    pub content_relevance: ScoredFeedback,
    #[validate]
    pub star_method_usage: ScoredFeedback,
    #[validate]
    pub impact_and_results: ScoredFeedback,
    pub recommendations: String,
}

impl AnswerFeedback {
    /// Dimensions in display order
    pub fn dimensions(&self) -> [(&'static str, &ScoredFeedback); 4] {
        [
            ("Clarity & Conciseness", &self.clarity_and_conciseness),
            ("Content Relevance", &self.content_relevance),
            ("STAR Method Usage", &self.star_method_usage),
            ("Impact & Results", &self.impact_and_results),
        ]
    }
}

/// Input for body-language analysis of a recorded answer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyLanguageInput {
    /// `data:<mime>;base64,<data>`
    pub video_data_uri: String,
    pub question: String,
}

/// Structured non-verbal analysis of one recorded answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BodyLanguageAnalysis {
    #[validate(range(min = 0.0, max = 100.0))]
    pub confidence_score: f64,
    pub confidence_feedback: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub posture_score: f64,
    pub posture_feedback: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub eye_contact_score: f64,
    pub eye_contact_feedback: String,
    pub overall_analysis: String,
}

impl BodyLanguageAnalysis {
    /// Text handed to the verbal feedback flow as auxiliary context
    pub fn summary(&self) -> Option<String> {
        let text = self.overall_analysis.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

fn scored_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "description": description,
        "properties": {
            "score": { "type": "number", "minimum": 0, "maximum": 100 },
            "feedback": { "type": "string" }
        },
        "required": ["score", "feedback"]
    })
}

/// JSON schema the question generation response must follow
pub fn questions_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "questions": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 1
            }
        },
        "required": ["questions"]
    })
}

/// JSON schema the answer feedback response must follow
pub fn feedback_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "overallScore": { "type": "number", "minimum": 0, "maximum": 100 },
            "clarityAndConciseness": scored_schema("Clarity and conciseness of the answer"),
            "contentRelevance": scored_schema("Relevance to the question and the job role"),
            "starMethodUsage": scored_schema("Situation, Task, Action, Result structure"),
            "impactAndResults": scored_schema("How well impact and results were demonstrated"),
            "recommendations": { "type": "string" }
        },
        "required": [
            "overallScore",
            "clarityAndConciseness",
            "contentRelevance",
            "starMethodUsage",
            "impactAndResults",
            "recommendations"
        ]
    })
}

/// JSON schema the body language response must follow
pub fn body_language_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "confidenceScore": { "type": "number", "minimum": 0, "maximum": 100 },
            "confidenceFeedback": { "type": "string" },
            "postureScore": { "type": "number", "minimum": 0, "maximum": 100 },
            "postureFeedback": { "type": "string" },
            "eyeContactScore": { "type": "number", "minimum": 0, "maximum": 100 },
            "eyeContactFeedback": { "type": "string" },
            "overallAnalysis": { "type": "string" }
        },
        "required": [
            "confidenceScore",
            "confidenceFeedback",
            "postureScore",
            "postureFeedback",
            "eyeContactScore",
            "eyeContactFeedback",
            "overallAnalysis"
        ]
    })
}
