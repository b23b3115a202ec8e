//! AI collaborator
//!
//! Three flows, each a fixed prompt template with a schema-validated output:
//! - question generation
//! - feedback on one answer
//! - body-language analysis of one recorded answer

pub mod client;
pub mod flows;
pub mod prompt;
pub mod questions;

use thiserror::Error;

pub use client::{ChatCompletionsClient, ChatCompletionsConfig, InterviewAi};
pub use flows::{
    AnswerFeedback, BodyLanguageAnalysis, BodyLanguageInput, FeedbackInput, GeneratedQuestions,
    QuestionsInput, ScoredFeedback,
};
pub use prompt::{PromptRenderer, RenderedPrompt};
pub use questions::{AiQuestionSource, QuestionBank, QuestionSource};

/// Failure of a single AI call
#[derive(Error, Debug)]
pub enum AiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response contained no output")]
    EmptyResponse,

    #[error("response is not valid JSON for this flow: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("response failed schema validation: {0}")]
    Schema(#[from] validator::ValidationErrors),

    #[error("media type {0} cannot be attached to a chat completion")]
    UnsupportedMedia(String),

    #[error("prompt template error: {0}")]
    Template(String),

    #[error("{0}")]
    Other(String),
}
