use crate::ai::{AnswerFeedback, BodyLanguageAnalysis, BodyLanguageInput, FeedbackInput, InterviewAi};
use crate::capture::Answer;
use crate::error::FeedbackError;
use crate::interview::InterviewSettings;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

/// Feedback for every answered question, aligned by question index
#[derive(Debug, Clone, Default)]
pub struct AggregatedFeedback {
    pub feedback: Vec<Option<AnswerFeedback>>,
    pub body_language: Vec<Option<BodyLanguageAnalysis>>,
}

impl AggregatedFeedback {
    pub fn len(&self) -> usize {
        self.feedback.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feedback.is_empty()
    }
}

/// Fans out one collaborator call chain per answer and collects the results
#[derive(Clone)]
pub struct FeedbackAggregator {
    ai: Arc<dyn InterviewAi>,
}

impl FeedbackAggregator {
    pub fn new(ai: Arc<dyn InterviewAi>) -> Self {
        Self { ai }
    }

    /// Produce feedback for all answers
    ///
    /// Runs every index concurrently and waits for all of them. The result
    /// has one entry per answer slot; a failed call leaves `None` at its
    /// index and never affects the others.
    pub async fn aggregate(
        &self,
        settings: &InterviewSettings,
        questions: &[String],
        answers: &[Option<Answer>],
    ) -> AggregatedFeedback {
        info!("Generating feedback for {} answers", answers.len());

        let tasks = answers.iter().enumerate().map(|(index, answer)| {
            let question = questions.get(index).map(String::as_str);
            self.feedback_for(settings, index, question, answer.as_ref())
        });

        let (feedback, body_language): (Vec<_>, Vec<_>) = join_all(tasks).await.into_iter().unzip();

        let generated = feedback.iter().filter(|f| f.is_some()).count();
        info!(
            "Feedback generated for {}/{} answers",
            generated,
            feedback.len()
        );

        AggregatedFeedback {
            feedback,
            body_language,
        }
    }

    async fn feedback_for(
        &self,
        settings: &InterviewSettings,
        index: usize,
        question: Option<&str>,
        answer: Option<&Answer>,
    ) -> (Option<AnswerFeedback>, Option<BodyLanguageAnalysis>) {
        let (Some(question), Some(answer)) = (question, answer) else {
            return (None, None);
        };
        if answer.is_empty() {
            return (None, None);
        }

        let body_language = match &answer.media {
            Some(media) => {
                let input = BodyLanguageInput {
                    video_data_uri: media.to_data_uri(),
                    question: question.to_string(),
                };
                match self.ai.analyze_body_language(&input).await {
                    Ok(analysis) => Some(analysis),
                    Err(source) => {
                        warn!("{}", FeedbackError::BodyLanguage { index, source });
                        None
                    }
                }
            }
            None => None,
        };

        let input = FeedbackInput::new(settings, question, &answer.transcript)
            .with_body_language(body_language.as_ref().and_then(BodyLanguageAnalysis::summary));

        let feedback = match self.ai.provide_feedback(&input).await {
            Ok(feedback) => Some(feedback),
            Err(source) => {
                warn!("{}", FeedbackError::Verbal { index, source });
                None
            }
        };

        (feedback, body_language)
    }
}
