use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session lifecycle
        .route("/interview/state", get(handlers::get_state))
        .route("/interview/setup", post(handlers::setup_interview))
        .route("/interview/next", post(handlers::next_question))
        .route("/interview/end", post(handlers::end_interview))
        .route("/interview/retake", post(handlers::retake_interview))
        .route("/interview/reset", post(handlers::reset_interview))
        // Capture control
        .route("/interview/devices", post(handlers::request_devices))
        .route("/interview/capture/start", post(handlers::start_capture))
        .route("/interview/capture/stop", post(handlers::stop_capture))
        .route("/interview/transcript", get(handlers::get_transcript))
        .route("/interview/answer", post(handlers::submit_answer))
        // Results
        .route(
            "/interview/results/:session_id",
            get(handlers::get_results),
        )
        .route("/interview/history", get(handlers::get_history))
        // Browser clients on another origin drive the same session
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
