pub mod ai;
pub mod capture;
pub mod coach;
pub mod config;
pub mod error;
pub mod feedback;
pub mod history;
pub mod http;
pub mod interview;
pub mod nats;

pub use ai::{AiError, ChatCompletionsClient, InterviewAi, QuestionBank, QuestionSource};
pub use capture::{Answer, CaptureSession, DeviceConfig, MediaDevices, SpeechRecognizer};
pub use coach::InterviewCoach;
pub use config::Config;
pub use error::{CaptureError, CoachError, GenerationError, NavigationGuardError, TransitionError};
pub use feedback::{FeedbackAggregator, ResultsView, ScoreBand};
pub use history::{History, InterviewRecord};
pub use http::{create_router, AppState};
pub use interview::{Action, InterviewSettings, InterviewStore, SessionState, SessionStatus};
pub use nats::{AudioFrameMessage, NatsClient, NatsRecognizerFactory, TranscriptMessage};
