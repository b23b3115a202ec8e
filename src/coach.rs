//! Interview orchestration
//!
//! `InterviewCoach` wires the session store to the question source, the
//! capture subsystem and the feedback aggregator. It owns at most one
//! capture session at a time and makes sure the current answer is committed
//! before feedback generation starts.

use crate::ai::QuestionSource;
use crate::capture::{
    Answer, CaptureConfig, CaptureSession, CaptureStats, DeviceConfig, MediaDevices,
    RecognizerFactory,
};
use crate::error::{CaptureError, CoachError, GenerationError, TransitionError};
use crate::feedback::{FeedbackAggregator, ResultsView};
use crate::history::{History, InterviewRecord};
use crate::interview::{
    Action, InterviewSettings, InterviewStore, SessionState, SessionStatus,
    GENERATION_FAILED_MESSAGE,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use validator::Validate;

/// Shown when a device request is refused
pub fn permission_denied_message(device: &str) -> String {
    format!("{} access denied.", device)
}

pub struct InterviewCoach {
    store: InterviewStore,
    questions: Arc<dyn QuestionSource>,
    aggregator: FeedbackAggregator,
    devices: Arc<dyn MediaDevices>,
    recognizers: Arc<dyn RecognizerFactory>,
    capture: Mutex<Option<CaptureSession>>,
    drain_timeout: Duration,
    history: History,
}

impl InterviewCoach {
    pub fn new(
        questions: Arc<dyn QuestionSource>,
        aggregator: FeedbackAggregator,
        devices: Arc<dyn MediaDevices>,
        recognizers: Arc<dyn RecognizerFactory>,
    ) -> Self {
        Self {
            store: InterviewStore::new(),
            questions,
            aggregator,
            devices,
            recognizers,
            capture: Mutex::new(None),
            drain_timeout: CaptureConfig::default().drain_timeout,
            history: History::new(),
        }
    }

    pub fn with_drain_timeout(mut self, drain_timeout: Duration) -> Self {
        self.drain_timeout = drain_timeout;
        self
    }

    pub fn store(&self) -> &InterviewStore {
        &self.store
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub async fn state(&self) -> SessionState {
        self.store.snapshot().await
    }

    /// Store the settings and generate the question list
    ///
    /// On failure the session returns to idle with a message for the user.
    pub async fn configure(&self, settings: InterviewSettings) -> Result<SessionState, CoachError> {
        settings.validate().map_err(GenerationError::InvalidSettings)?;

        self.release_capture().await;
        match self.store.read(|s| s.status).await {
            SessionStatus::Complete => {
                self.store.dispatch(Action::StartSetup).await?;
            }
            SessionStatus::InProgress => {
                warn!("Abandoning interview in progress");
                self.store.dispatch(Action::Reset).await?;
            }
            _ => {}
        }
        self.store.dispatch(Action::SetSettings(settings.clone())).await?;

        let questions = match self.questions.questions(&settings).await {
            Ok(questions) => questions,
            Err(e) => {
                error!("Failed to generate questions: {}", e);
                self.store
                    .dispatch(Action::SetError(GENERATION_FAILED_MESSAGE.to_string()))
                    .await?;
                return Err(e.into());
            }
        };

        let session_id = format!("session-{}", uuid::Uuid::new_v4());
        match self
            .store
            .dispatch(Action::QuestionsGenerated {
                questions,
                session_id,
            })
            .await
        {
            Ok(state) => Ok(state),
            Err(TransitionError::NoQuestions) => Err(GenerationError::Empty.into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Acquire capture devices for the running interview
    ///
    /// A refused device puts the session into the error state; there is no
    /// retry.
    pub async fn request_devices(&self, devices: DeviceConfig) -> Result<(), CoachError> {
        let session_id = self.require_in_progress("REQUEST_DEVICES").await?;

        self.release_capture().await;

        let recognizer = self
            .recognizers
            .create(&session_id)
            .await
            .map_err(CaptureError::Device)?;

        let config = CaptureConfig {
            devices,
            drain_timeout: self.drain_timeout,
        };

        match CaptureSession::open(session_id, self.devices.as_ref(), recognizer, config).await {
            Ok(session) => {
                *self.capture.lock().await = Some(session);
                Ok(())
            }
            Err(CaptureError::PermissionDenied(device)) => {
                self.store
                    .dispatch(Action::SetError(permission_denied_message(&device)))
                    .await?;
                Err(CaptureError::PermissionDenied(device).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn start_capture(&self) -> Result<(), CoachError> {
        self.require_in_progress("START_CAPTURE").await?;

        let mut capture = self.capture.lock().await;
        let session = capture.as_mut().ok_or(CaptureError::NoDevices)?;
        session.start().await?;
        Ok(())
    }

    /// Stop capture and commit the answer for the current question
    pub async fn stop_capture(&self) -> Result<SessionState, CoachError> {
        self.submit_answer(None).await
    }

    /// Commit the answer for the current question
    ///
    /// A running capture is stopped first. Non-blank typed text replaces the
    /// transcript only; recorded media of an earlier capture is kept. With
    /// nothing captured and nothing typed the stored answer is left alone.
    pub async fn submit_answer(&self, typed: Option<String>) -> Result<SessionState, CoachError> {
        self.require_in_progress("SUBMIT_ANSWER").await?;

        let index = self.store.read(|s| s.current_question_index).await;
        let typed = typed.as_deref().map(str::trim).filter(|t| !t.is_empty());

        let answer = match (self.stop_running_capture().await?, typed) {
            (Some(captured), typed) => captured.with_typed_text(typed),
            (None, Some(text)) => self
                .store
                .read(|s| s.answer(index).cloned())
                .await
                .unwrap_or_default()
                .with_typed_text(Some(text)),
            (None, None) => return Ok(self.store.snapshot().await),
        };

        Ok(self
            .store
            .dispatch(Action::SubmitAnswer { index, answer })
            .await?)
    }

    /// Advance to the next question, or end the interview after the last one
    pub async fn next_question(&self) -> Result<SessionState, CoachError> {
        self.require_in_progress("NEXT_QUESTION").await?;
        self.commit_running_capture().await?;

        if self.store.read(SessionState::is_last_question).await {
            return self.end_interview().await;
        }

        Ok(self.store.dispatch(Action::NextQuestion).await?)
    }

    /// Finish the interview and generate feedback for every answer
    pub async fn end_interview(&self) -> Result<SessionState, CoachError> {
        self.require_in_progress("START_FEEDBACK_GENERATION").await?;

        // The last answer must be in the store before the aggregator reads it
        self.commit_running_capture().await?;
        let state = self.store.dispatch(Action::StartFeedbackGeneration).await?;
        info!(
            "Interview finished with {} answers, generating feedback",
            state.answers.iter().flatten().count()
        );

        let settings = state.settings.clone().unwrap_or_default();
        let aggregated = self
            .aggregator
            .aggregate(&settings, &state.questions, &state.answers)
            .await;

        let state = self
            .store
            .dispatch(Action::FeedbackGenerated {
                feedback: aggregated.feedback,
                body_language: aggregated.body_language,
            })
            .await?;

        self.release_capture().await;

        if let Some(record) = InterviewRecord::from_state(&state) {
            self.history.record(record).await;
        }

        Ok(state)
    }

    /// Restart a completed interview with the same questions
    pub async fn retake(&self) -> Result<SessionState, CoachError> {
        Ok(self.store.dispatch(Action::StartInterview).await?)
    }

    /// Wipe the session and release all devices
    pub async fn reset(&self) -> Result<SessionState, CoachError> {
        self.release_capture().await;
        Ok(self.store.dispatch(Action::Reset).await?)
    }

    /// Results for `session_id`, refused unless it is the completed current session
    pub async fn results(&self, session_id: &str) -> Result<ResultsView, CoachError> {
        let state = self.store.snapshot().await;
        state.guard_results(session_id)?;
        Ok(ResultsView::from_state(&state))
    }

    pub async fn capture_stats(&self) -> Option<CaptureStats> {
        let capture = self.capture.lock().await;
        match capture.as_ref() {
            Some(session) => Some(session.stats().await),
            None => None,
        }
    }

    pub async fn is_capturing(&self) -> bool {
        self.capture
            .lock()
            .await
            .as_ref()
            .is_some_and(CaptureSession::is_capturing)
    }

    /// Release devices; the coach stays usable
    pub async fn shutdown(&self) {
        self.release_capture().await;
    }

    async fn require_in_progress(&self, action: &'static str) -> Result<String, CoachError> {
        let (status, session_id) = self
            .store
            .read(|s| (s.status, s.session_id.clone()))
            .await;

        match (status, session_id) {
            (SessionStatus::InProgress, Some(id)) => Ok(id),
            (status, _) => Err(TransitionError::InvalidTransition { action, status }.into()),
        }
    }

    /// Stop an active capture and return its answer
    async fn stop_running_capture(&self) -> Result<Option<Answer>, CoachError> {
        let mut capture = self.capture.lock().await;
        match capture.as_mut() {
            Some(session) if session.is_capturing() => Ok(Some(session.stop().await?)),
            _ => Ok(None),
        }
    }

    /// Commit the answer of an active capture, if any
    async fn commit_running_capture(&self) -> Result<(), CoachError> {
        if let Some(answer) = self.stop_running_capture().await? {
            let index = self.store.read(|s| s.current_question_index).await;
            self.store
                .dispatch(Action::SubmitAnswer { index, answer })
                .await?;
        }
        Ok(())
    }

    async fn release_capture(&self) {
        let session = self.capture.lock().await.take();
        if let Some(session) = session {
            session.shutdown().await;
        }
    }
}
