//! In-memory archive of completed interviews

use crate::ai::{AnswerFeedback, BodyLanguageAnalysis};
use crate::feedback::overall_score;
use crate::interview::{InterviewSettings, SessionState, SessionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub answer_transcript: Option<String>,
    pub has_media: bool,
}

/// A finished interview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub id: String,
    pub date: DateTime<Utc>,
    pub settings: InterviewSettings,
    pub questions: Vec<QuestionRecord>,
    pub feedback: Vec<Option<AnswerFeedback>>,
    pub body_language: Vec<Option<BodyLanguageAnalysis>>,
    pub overall_score: u32,
}

impl InterviewRecord {
    /// Snapshot a completed session; `None` for any other status
    pub fn from_state(state: &SessionState) -> Option<Self> {
        if state.status != SessionStatus::Complete {
            return None;
        }

        let questions = state
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let answer = state.answer(index);
                QuestionRecord {
                    question: question.clone(),
                    answer_transcript: answer.map(|a| a.transcript.clone()),
                    has_media: answer.is_some_and(|a| a.media.is_some()),
                }
            })
            .collect();

        Some(Self {
            id: state.session_id.clone()?,
            date: Utc::now(),
            settings: state.settings.clone()?,
            questions,
            feedback: state.feedback.clone(),
            body_language: state.body_language.clone(),
            overall_score: overall_score(&state.feedback),
        })
    }
}

/// Completed interviews, lost on restart
#[derive(Clone, Default)]
pub struct History {
    records: Arc<RwLock<Vec<InterviewRecord>>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, record: InterviewRecord) {
        info!(
            "Archived interview {} (score {})",
            record.id, record.overall_score
        );
        self.records.write().await.push(record);
    }

    /// All records, newest first
    pub async fn list(&self) -> Vec<InterviewRecord> {
        let records = self.records.read().await;
        records.iter().rev().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}
