use super::state::AppState;
use crate::capture::{AnswerSummary, CaptureStats, DeviceConfig};
use crate::error::{CaptureError, CoachError, GenerationError};
use crate::interview::{InterviewSettings, SessionState, SessionStatus};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Where a refused results request is sent
pub const REDIRECT_TARGET: &str = "/interview/state";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    /// Typed answer; replaces the spoken transcript when not blank
    pub text: Option<String>,
}

/// Client view of the session; recorded media is summarized, not embedded
#[derive(Debug, Serialize, Deserialize)]
pub struct StateView {
    pub status: SessionStatus,
    pub session_id: Option<String>,
    pub settings: Option<InterviewSettings>,
    pub questions: Vec<String>,
    pub current_question_index: usize,
    pub current_question: Option<String>,
    pub answers: Vec<Option<AnswerSummary>>,
    pub error: Option<String>,
    pub is_capturing: bool,
}

impl StateView {
    fn new(state: &SessionState, is_capturing: bool) -> Self {
        Self {
            status: state.status,
            session_id: state.session_id.clone(),
            settings: state.settings.clone(),
            questions: state.questions.clone(),
            current_question_index: state.current_question_index,
            current_question: state.current_question().map(str::to_string),
            answers: state
                .answers
                .iter()
                .map(|a| a.as_ref().map(|a| a.summary()))
                .collect(),
            error: state.error.clone(),
            is_capturing,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub live_transcript: String,
    pub stats: Option<CaptureStats>,
}

#[derive(Debug, Serialize)]
pub struct CaptureResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(err: CoachError) -> Response {
    let status = match &err {
        CoachError::Navigation(guard) => {
            info!("Redirecting: {}", guard);
            return Redirect::to(REDIRECT_TARGET).into_response();
        }
        CoachError::Capture(CaptureError::PermissionDenied(_)) => StatusCode::FORBIDDEN,
        CoachError::Capture(CaptureError::NoDevices) => StatusCode::CONFLICT,
        CoachError::Capture(CaptureError::Device(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        CoachError::Generation(GenerationError::InvalidSettings(_))
        | CoachError::Generation(GenerationError::UnknownRole(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CoachError::Generation(_) => StatusCode::BAD_GATEWAY,
        CoachError::Transition(_) => StatusCode::CONFLICT,
    };

    if status.is_server_error() {
        error!("Request failed: {}", err);
    } else {
        warn!("Request rejected: {}", err);
    }

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

async fn state_response(state: &AppState, result: Result<SessionState, CoachError>) -> Response {
    match result {
        Ok(session) => {
            let is_capturing = state.coach.is_capturing().await;
            (StatusCode::OK, Json(StateView::new(&session, is_capturing))).into_response()
        }
        Err(e) => error_response(e),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /interview/state
pub async fn get_state(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.coach.state().await;
    state_response(&state, Ok(session)).await
}

/// POST /interview/setup
/// Store settings and generate the questions for a new session
pub async fn setup_interview(
    State(state): State<AppState>,
    Json(settings): Json<InterviewSettings>,
) -> impl IntoResponse {
    info!(
        "Setting up interview: {} at {}",
        settings.job_role, settings.dream_company
    );
    let result = state.coach.configure(settings).await;
    state_response(&state, result).await
}

/// POST /interview/devices
/// Acquire capture devices; an empty body requests the configured defaults
pub async fn request_devices(
    State(state): State<AppState>,
    body: Option<Json<DeviceConfig>>,
) -> impl IntoResponse {
    let devices = body.map_or(state.default_devices, |Json(devices)| devices);

    match state.coach.request_devices(devices).await {
        Ok(()) => (
            StatusCode::OK,
            Json(CaptureResponse {
                status: "ready".to_string(),
                message: format!(
                    "Devices acquired (audio={}, video={})",
                    devices.audio, devices.video
                ),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /interview/capture/start
pub async fn start_capture(State(state): State<AppState>) -> impl IntoResponse {
    match state.coach.start_capture().await {
        Ok(()) => (
            StatusCode::OK,
            Json(CaptureResponse {
                status: "capturing".to_string(),
                message: "Capture started".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /interview/capture/stop
/// Stop capture and commit the answer for the current question
pub async fn stop_capture(State(state): State<AppState>) -> impl IntoResponse {
    let result = state.coach.stop_capture().await;
    state_response(&state, result).await
}

/// GET /interview/transcript
pub async fn get_transcript(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.coach.capture_stats().await;
    let live_transcript = stats
        .as_ref()
        .map(|s| s.live_transcript.clone())
        .unwrap_or_default();

    (
        StatusCode::OK,
        Json(TranscriptResponse {
            live_transcript,
            stats,
        }),
    )
}

/// POST /interview/answer
pub async fn submit_answer(
    State(state): State<AppState>,
    body: Option<Json<SubmitAnswerRequest>>,
) -> impl IntoResponse {
    let typed = body.and_then(|Json(req)| req.text);
    let result = state.coach.submit_answer(typed).await;
    state_response(&state, result).await
}

/// POST /interview/next
/// Advance, or end the interview after the last question
pub async fn next_question(State(state): State<AppState>) -> impl IntoResponse {
    let result = state.coach.next_question().await;
    state_response(&state, result).await
}

/// POST /interview/end
pub async fn end_interview(State(state): State<AppState>) -> impl IntoResponse {
    let result = state.coach.end_interview().await;
    state_response(&state, result).await
}

/// POST /interview/retake
pub async fn retake_interview(State(state): State<AppState>) -> impl IntoResponse {
    let result = state.coach.retake().await;
    state_response(&state, result).await
}

/// POST /interview/reset
pub async fn reset_interview(State(state): State<AppState>) -> impl IntoResponse {
    let result = state.coach.reset().await;
    state_response(&state, result).await
}

/// GET /interview/results/:session_id
/// Results are only served for the completed current session
pub async fn get_results(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.coach.results(&session_id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /interview/history
pub async fn get_history(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.coach.history().list().await))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
