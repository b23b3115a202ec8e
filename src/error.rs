//! Error types for the interview coach
//!
//! Device and generation failures abort the current stage and carry a message
//! for the user. Feedback failures stay local to one question. Navigation
//! failures are redirects, not errors the user sees.

use crate::ai::AiError;
use crate::interview::SessionStatus;
use thiserror::Error;

/// Failure to acquire or drive capture devices
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The user (or the platform) refused access to a device
    #[error("{0} access denied")]
    PermissionDenied(String),

    /// No devices have been acquired for this interview
    #[error("capture devices have not been requested")]
    NoDevices,

    #[error("capture device error: {0:#}")]
    Device(#[from] anyhow::Error),
}

/// Failure while producing the question list for a new session
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("question generation failed: {0}")]
    Ai(#[from] AiError),

    #[error("question source returned no questions")]
    Empty,

    #[error("no question bank for role: {0}")]
    UnknownRole(String),

    #[error("invalid interview settings: {0}")]
    InvalidSettings(#[from] validator::ValidationErrors),
}

/// Failure of one collaborator call for one question
#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("body language analysis failed for question {index}: {source}")]
    BodyLanguage { index: usize, source: AiError },

    #[error("answer feedback failed for question {index}: {source}")]
    Verbal { index: usize, source: AiError },
}

/// A results view was requested for a session that is not the current one
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("results for session {requested} are not available (current: {current:?})")]
pub struct NavigationGuardError {
    pub requested: String,
    pub current: Option<String>,
}

/// Rejected state machine transition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("{action} is not allowed while {status}")]
    InvalidTransition {
        action: &'static str,
        status: SessionStatus,
    },

    #[error("answer submitted for question {got}, current question is {expected}")]
    AnswerIndexMismatch { expected: usize, got: usize },

    #[error("question list is empty")]
    NoQuestions,
}

/// Errors surfaced by [`crate::InterviewCoach`] operations
#[derive(Error, Debug)]
pub enum CoachError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Navigation(#[from] NavigationGuardError),
}
