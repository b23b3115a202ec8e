use super::settings::InterviewSettings;
use crate::ai::{AnswerFeedback, BodyLanguageAnalysis};
use crate::capture::Answer;
use crate::error::{NavigationGuardError, TransitionError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message shown when question generation fails or yields nothing
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate questions.";

/// Lifecycle stage of an interview session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    Configuring,
    GeneratingQuestions,
    InProgress,
    GeneratingFeedback,
    Complete,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Configuring => "configuring",
            SessionStatus::GeneratingQuestions => "generating_questions",
            SessionStatus::InProgress => "in_progress",
            SessionStatus::GeneratingFeedback => "generating_feedback",
            SessionStatus::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Transitions of the interview state machine
#[derive(Debug, Clone)]
pub enum Action {
    StartSetup,
    SetSettings(InterviewSettings),
    QuestionsGenerated {
        questions: Vec<String>,
        session_id: String,
    },
    /// Retake: restart a completed interview with the same questions
    StartInterview,
    SubmitAnswer {
        index: usize,
        answer: Answer,
    },
    NextQuestion,
    StartFeedbackGeneration,
    FeedbackGenerated {
        feedback: Vec<Option<AnswerFeedback>>,
        body_language: Vec<Option<BodyLanguageAnalysis>>,
    },
    Reset,
    SetError(String),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::StartSetup => "START_SETUP",
            Action::SetSettings(_) => "SET_SETTINGS",
            Action::QuestionsGenerated { .. } => "QUESTIONS_GENERATED",
            Action::StartInterview => "START_INTERVIEW",
            Action::SubmitAnswer { .. } => "SUBMIT_ANSWER",
            Action::NextQuestion => "NEXT_QUESTION",
            Action::StartFeedbackGeneration => "START_FEEDBACK_GENERATION",
            Action::FeedbackGenerated { .. } => "FEEDBACK_GENERATED",
            Action::Reset => "RESET",
            Action::SetError(_) => "SET_ERROR",
        }
    }
}

/// Aggregate state of one interview session
///
/// `answers[i]`, `feedback[i]` and `body_language[i]` always refer to
/// `questions[i]`; none of them grows past `questions.len()`.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub status: SessionStatus,
    pub settings: Option<InterviewSettings>,
    pub questions: Vec<String>,
    pub current_question_index: usize,
    pub answers: Vec<Option<Answer>>,
    pub feedback: Vec<Option<AnswerFeedback>>,
    pub body_language: Vec<Option<BodyLanguageAnalysis>>,
    pub session_id: Option<String>,
    pub error: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one transition
    ///
    /// A rejected transition leaves the state untouched, except an empty
    /// question list, which moves the session to `Idle` with an error.
    pub fn apply(&mut self, action: Action) -> Result<(), TransitionError> {
        let name = action.name();
        let invalid = |status| TransitionError::InvalidTransition {
            action: name,
            status,
        };

        match action {
            Action::StartSetup => match self.status {
                SessionStatus::Idle | SessionStatus::Configuring | SessionStatus::Complete => {
                    *self = SessionState {
                        status: SessionStatus::Configuring,
                        ..SessionState::default()
                    };
                }
                status => return Err(invalid(status)),
            },

            Action::SetSettings(settings) => match self.status {
                SessionStatus::Idle | SessionStatus::Configuring => {
                    self.settings = Some(settings);
                    self.error = None;
                    self.status = SessionStatus::GeneratingQuestions;
                }
                status => return Err(invalid(status)),
            },

            Action::QuestionsGenerated {
                questions,
                session_id,
            } => {
                if self.status != SessionStatus::GeneratingQuestions {
                    return Err(invalid(self.status));
                }
                if questions.is_empty() {
                    self.error = Some(GENERATION_FAILED_MESSAGE.to_string());
                    self.status = SessionStatus::Idle;
                    return Err(TransitionError::NoQuestions);
                }
                self.questions = questions;
                self.session_id = Some(session_id);
                self.current_question_index = 0;
                self.answers.clear();
                self.feedback.clear();
                self.body_language.clear();
                self.status = SessionStatus::InProgress;
            }

            Action::StartInterview => {
                if self.status != SessionStatus::Complete {
                    return Err(invalid(self.status));
                }
                self.current_question_index = 0;
                self.answers.clear();
                self.feedback.clear();
                self.body_language.clear();
                self.error = None;
                self.status = SessionStatus::InProgress;
            }

            Action::SubmitAnswer { index, answer } => {
                if self.status != SessionStatus::InProgress {
                    return Err(invalid(self.status));
                }
                if index != self.current_question_index {
                    return Err(TransitionError::AnswerIndexMismatch {
                        expected: self.current_question_index,
                        got: index,
                    });
                }
                debug_assert!(index < self.questions.len());
                if self.answers.len() <= index {
                    self.answers.resize(index + 1, None);
                }
                self.answers[index] = Some(answer);
            }

            Action::NextQuestion => {
                if self.status != SessionStatus::InProgress {
                    return Err(invalid(self.status));
                }
                if !self.is_last_question() {
                    self.current_question_index += 1;
                }
            }

            Action::StartFeedbackGeneration => {
                if self.status != SessionStatus::InProgress {
                    return Err(invalid(self.status));
                }
                self.status = SessionStatus::GeneratingFeedback;
            }

            Action::FeedbackGenerated {
                mut feedback,
                mut body_language,
            } => {
                if self.status != SessionStatus::GeneratingFeedback {
                    return Err(invalid(self.status));
                }
                feedback.truncate(self.questions.len());
                body_language.truncate(self.questions.len());
                self.feedback = feedback;
                self.body_language = body_language;
                self.status = SessionStatus::Complete;
            }

            Action::Reset => *self = SessionState::default(),

            Action::SetError(message) => {
                self.error = Some(message);
                self.status = SessionStatus::Idle;
            }
        }

        Ok(())
    }

    pub fn current_question(&self) -> Option<&str> {
        match self.status {
            SessionStatus::InProgress => self
                .questions
                .get(self.current_question_index)
                .map(String::as_str),
            _ => None,
        }
    }

    pub fn is_last_question(&self) -> bool {
        self.current_question_index + 1 >= self.questions.len()
    }

    pub fn answer(&self, index: usize) -> Option<&Answer> {
        self.answers.get(index).and_then(Option::as_ref)
    }

    /// Only a completed session whose id matches may be shown
    pub fn guard_results(&self, session_id: &str) -> Result<(), NavigationGuardError> {
        let matches = self.session_id.as_deref() == Some(session_id);
        if self.status == SessionStatus::Complete && matches {
            Ok(())
        } else {
            Err(NavigationGuardError {
                requested: session_id.to_string(),
                current: self.session_id.clone(),
            })
        }
    }
}
