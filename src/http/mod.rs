//! HTTP API driving the interview coach
//!
//! This module provides a REST API over the single hosted interview:
//! - POST /interview/setup - Store settings and generate questions
//! - POST /interview/devices - Acquire microphone and camera
//! - POST /interview/capture/start, /interview/capture/stop - Record an answer
//! - POST /interview/answer - Commit the answer, optionally typed
//! - POST /interview/next, /interview/end - Advance or finish
//! - GET /interview/results/:id - Results for the completed session
//! - GET /interview/history - Archived interviews
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{ErrorResponse, StateView, REDIRECT_TARGET};
pub use routes::create_router;
pub use state::AppState;
