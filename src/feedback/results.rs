use crate::ai::{AnswerFeedback, BodyLanguageAnalysis};
use crate::interview::SessionState;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NO_ANSWER_MESSAGE: &str = "No answer recorded.";
pub const NO_FEEDBACK_MESSAGE: &str = "AI feedback could not be generated for this question.";
pub const NO_BODY_LANGUAGE_MESSAGE: &str = "Body language analysis is not available for this question.";

/// Rounded mean of every available score, 0 when there is none
pub fn overall_score(feedback: &[Option<AnswerFeedback>]) -> u32 {
    let scores: Vec<f64> = feedback
        .iter()
        .flatten()
        .map(|f| f.overall_score)
        .collect();

    if scores.is_empty() {
        return 0;
    }

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    mean.round().clamp(0.0, 100.0) as u32
}

/// Coarse grading of a 0–100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Strong,
    Fair,
    NeedsWork,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Strong
        } else if score >= 60.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::NeedsWork
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScoreBand::Strong => "strong",
            ScoreBand::Fair => "fair",
            ScoreBand::NeedsWork => "needs work",
        })
    }
}

/// Breakdown for one question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResult {
    pub index: usize,
    pub question: String,
    /// `None` when the question was never answered
    pub transcript: Option<String>,
    pub has_media: bool,
    pub feedback: Option<AnswerFeedback>,
    pub body_language: Option<BodyLanguageAnalysis>,
    pub band: Option<ScoreBand>,
}

/// Results of a completed interview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsView {
    pub session_id: String,
    pub overall_score: u32,
    pub band: ScoreBand,
    pub questions: Vec<QuestionResult>,
}

impl ResultsView {
    /// Build the view for a completed session
    ///
    /// Callers check [`SessionState::guard_results`] first.
    pub fn from_state(state: &SessionState) -> Self {
        let overall = overall_score(&state.feedback);

        let questions = state
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let answer = state.answer(index);
                let feedback = state.feedback.get(index).cloned().flatten();
                let body_language = state.body_language.get(index).cloned().flatten();

                QuestionResult {
                    index,
                    question: question.clone(),
                    transcript: answer
                        .map(|a| a.transcript.trim().to_string())
                        .filter(|t| !t.is_empty()),
                    has_media: answer.is_some_and(|a| a.media.is_some()),
                    band: feedback.as_ref().map(|f| ScoreBand::for_score(f.overall_score)),
                    feedback,
                    body_language,
                }
            })
            .collect();

        Self {
            session_id: state.session_id.clone().unwrap_or_default(),
            overall_score: overall,
            band: ScoreBand::for_score(overall as f64),
            questions,
        }
    }
}

impl fmt::Display for ResultsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Overall Score: {}% ({})", self.overall_score, self.band)?;

        for result in &self.questions {
            writeln!(f)?;
            writeln!(f, "Question {}: {}", result.index + 1, result.question)?;
            match &result.transcript {
                Some(text) => writeln!(f, "  Your answer: \"{}\"", text)?,
                None => writeln!(f, "  {}", NO_ANSWER_MESSAGE)?,
            }

            match &result.feedback {
                Some(feedback) => {
                    writeln!(f, "  Score: {:.0}%", feedback.overall_score)?;
                    for (name, dimension) in feedback.dimensions() {
                        writeln!(
                            f,
                            "  {} ({:.0}/100): {}",
                            name, dimension.score, dimension.feedback
                        )?;
                    }
                    writeln!(f, "  Recommendations: {}", feedback.recommendations)?;
                }
                None => writeln!(f, "  {}", NO_FEEDBACK_MESSAGE)?,
            }

            if result.has_media {
                match &result.body_language {
                    Some(analysis) => {
                        writeln!(
                            f,
                            "  Body language: confidence {:.0}, posture {:.0}, eye contact {:.0}",
                            analysis.confidence_score,
                            analysis.posture_score,
                            analysis.eye_contact_score
                        )?;
                        writeln!(f, "  {}", analysis.overall_analysis)?;
                    }
                    None => writeln!(f, "  {}", NO_BODY_LANGUAGE_MESSAGE)?,
                }
            }
        }

        Ok(())
    }
}
