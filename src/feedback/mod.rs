//! Feedback generation and results
//!
//! - `FeedbackAggregator`: concurrent, index-stable fan-out over the AI flows
//! - `ResultsView`: overall score and per-question breakdown

mod aggregator;
mod results;

pub use aggregator::{AggregatedFeedback, FeedbackAggregator};
pub use results::{
    overall_score, QuestionResult, ResultsView, ScoreBand, NO_ANSWER_MESSAGE,
    NO_BODY_LANGUAGE_MESSAGE, NO_FEEDBACK_MESSAGE,
};
