//! Interview session state
//!
//! This module provides:
//! - `InterviewSettings`: configuration chosen before questions are generated
//! - `SessionState`: the aggregate root, mutated only through `Action`s
//! - `InterviewStore`: single-writer dispatch over the shared state

mod machine;
mod settings;
mod store;

pub use machine::{Action, SessionState, SessionStatus, GENERATION_FAILED_MESSAGE};
pub use settings::{InterviewSettings, InterviewType};
pub use store::InterviewStore;
