use super::client::InterviewAi;
use super::flows::QuestionsInput;
use crate::error::GenerationError;
use crate::interview::InterviewSettings;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Produces the ordered question list for a new interview
#[async_trait::async_trait]
pub trait QuestionSource: Send + Sync {
    async fn questions(&self, settings: &InterviewSettings) -> Result<Vec<String>, GenerationError>;
}

/// Questions generated by the AI collaborator
pub struct AiQuestionSource {
    ai: Arc<dyn InterviewAi>,
}

impl AiQuestionSource {
    pub fn new(ai: Arc<dyn InterviewAi>) -> Self {
        Self { ai }
    }
}

#[async_trait::async_trait]
impl QuestionSource for AiQuestionSource {
    async fn questions(&self, settings: &InterviewSettings) -> Result<Vec<String>, GenerationError> {
        let generated = self
            .ai
            .generate_questions(&QuestionsInput::from(settings))
            .await?;

        let mut questions: Vec<String> = generated
            .questions
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();

        if questions.is_empty() {
            return Err(GenerationError::Empty);
        }
        if questions.len() != settings.num_questions {
            warn!(
                "Model returned {} questions, {} requested",
                questions.len(),
                settings.num_questions
            );
            questions.truncate(settings.num_questions);
        }

        info!(
            "Generated {} questions for {} at {}",
            questions.len(),
            settings.job_role,
            settings.dream_company
        );

        Ok(questions)
    }
}

/// Fixed question lists keyed by job role
#[derive(Debug, Clone)]
pub struct QuestionBank {
    roles: HashMap<String, Vec<String>>,
}

impl QuestionBank {
    pub fn new(roles: HashMap<String, Vec<String>>) -> Self {
        Self { roles }
    }

    pub fn roles(&self) -> Vec<&str> {
        let mut roles: Vec<&str> = self.roles.keys().map(String::as_str).collect();
        roles.sort_unstable();
        roles
    }

    fn lookup(&self, role: &str) -> Option<&Vec<String>> {
        let role = role.trim();
        self.roles.get(role).or_else(|| {
            self.roles
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(role))
                .map(|(_, questions)| questions)
        })
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        let table: [(&str, [&str; 5]); 5] = [
            (
                "Software Engineer",
                [
                    "Explain one project you built recently.",
                    "What is the difference between REST and GraphQL?",
                    "Tell me about a time you solved a difficult bug.",
                    "How do you optimize code performance?",
                    "Explain OOP concepts in simple words.",
                ],
            ),
            (
                "Web Developer",
                [
                    "What is the difference between HTML and JSX?",
                    "Explain CSS Flexbox and Grid.",
                    "How does React work under the hood?",
                    "What is the DOM?",
                    "Tell me about your best frontend project.",
                ],
            ),
            (
                "Teacher",
                [
                    "Why did you choose teaching as a profession?",
                    "How do you handle weak students?",
                    "How do you maintain discipline?",
                    "Describe your teaching style.",
                    "How do you manage classroom activities?",
                ],
            ),
            (
                "Doctor",
                [
                    "Why did you choose the medical field?",
                    "How do you handle emergency patients?",
                    "Describe a difficult diagnosis you solved.",
                    "How do you communicate with patient families?",
                    "What is the importance of empathy in healthcare?",
                ],
            ),
            (
                "Accountant",
                [
                    "Explain the difference between assets and liabilities.",
                    "What are the golden rules of accounting?",
                    "Tell me about a time you corrected a financial mistake.",
                    "What software have you used?",
                    "How do you avoid financial errors?",
                ],
            ),
        ];

        let roles = table
            .into_iter()
            .map(|(role, questions)| {
                (
                    role.to_string(),
                    questions.into_iter().map(str::to_string).collect(),
                )
            })
            .collect();

        Self { roles }
    }
}

#[async_trait::async_trait]
impl QuestionSource for QuestionBank {
    async fn questions(&self, settings: &InterviewSettings) -> Result<Vec<String>, GenerationError> {
        let questions = self
            .lookup(&settings.job_role)
            .ok_or_else(|| GenerationError::UnknownRole(settings.job_role.clone()))?;

        let selected: Vec<String> = questions
            .iter()
            .take(settings.num_questions)
            .cloned()
            .collect();

        if selected.is_empty() {
            return Err(GenerationError::Empty);
        }

        Ok(selected)
    }
}
