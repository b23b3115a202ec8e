// Integration tests for feedback aggregation
//
// These tests verify that feedback is generated concurrently, stays aligned
// with question indices, and that one failed call only blanks its own slot.

mod common;

use anyhow::Result;
use common::MockAi;
use interview_coach::capture::{Answer, MediaBlob};
use interview_coach::feedback::{overall_score, FeedbackAggregator};
use interview_coach::interview::InterviewSettings;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

fn questions(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("Question {}", i)).collect()
}

fn answered(n: usize) -> Vec<Option<Answer>> {
    (1..=n)
        .map(|i| Some(Answer::typed(format!("Answer {}", i))))
        .collect()
}

#[tokio::test]
async fn test_one_failure_leaves_exactly_one_gap() -> Result<()> {
    let ai = Arc::new(MockAi::new(&[]).failing_on("Question 2"));
    let aggregator = FeedbackAggregator::new(ai.clone());

    let result = aggregator
        .aggregate(&InterviewSettings::default(), &questions(3), &answered(3))
        .await;

    assert_eq!(result.len(), 3);
    assert!(result.feedback[0].is_some());
    assert!(result.feedback[1].is_none());
    assert!(result.feedback[2].is_some());
    assert_eq!(ai.feedback_inputs().len(), 3);
    assert_eq!(overall_score(&result.feedback), 80);

    Ok(())
}

#[tokio::test]
async fn test_feedback_runs_concurrently() -> Result<()> {
    let ai = Arc::new(MockAi::new(&[]).with_delay(Duration::from_millis(50)));
    let aggregator = FeedbackAggregator::new(ai.clone());

    let result = aggregator
        .aggregate(&InterviewSettings::default(), &questions(5), &answered(5))
        .await;

    assert_eq!(result.len(), 5);
    assert!(result.feedback.iter().all(Option::is_some));
    assert_eq!(ai.max_in_flight.load(Ordering::SeqCst), 5);

    Ok(())
}

#[tokio::test]
async fn test_unanswered_questions_are_not_sent() -> Result<()> {
    let ai = Arc::new(MockAi::new(&[]));
    let aggregator = FeedbackAggregator::new(ai.clone());

    // Question 2 skipped, question 3 answered with nothing
    let answers = vec![
        Some(Answer::typed("Answer 1")),
        None,
        Some(Answer::default()),
        Some(Answer::typed("Answer 4")),
    ];

    let result = aggregator
        .aggregate(&InterviewSettings::default(), &questions(4), &answers)
        .await;

    assert_eq!(result.len(), 4);
    assert!(result.feedback[1].is_none());
    assert!(result.feedback[2].is_none());

    let asked: Vec<String> = ai.feedback_inputs().into_iter().map(|i| i.question).collect();
    assert_eq!(asked.len(), 2);
    assert!(asked.contains(&"Question 1".to_string()));
    assert!(asked.contains(&"Question 4".to_string()));

    Ok(())
}

#[tokio::test]
async fn test_output_matches_answer_count() -> Result<()> {
    let ai = Arc::new(MockAi::new(&[]));
    let aggregator = FeedbackAggregator::new(ai);

    // Interview ended after two of five questions
    let result = aggregator
        .aggregate(&InterviewSettings::default(), &questions(5), &answered(2))
        .await;

    assert_eq!(result.len(), 2);
    assert_eq!(result.body_language.len(), 2);

    let empty = FeedbackAggregator::new(Arc::new(MockAi::new(&[])))
        .aggregate(&InterviewSettings::default(), &questions(5), &[])
        .await;
    assert!(empty.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_body_language_feeds_verbal_feedback() -> Result<()> {
    let ai = Arc::new(MockAi::new(&[]));
    let aggregator = FeedbackAggregator::new(ai.clone());

    let with_video = Answer {
        transcript: "I shipped the migration.".to_string(),
        media: MediaBlob::assemble(
            "video/webm",
            vec![interview_coach::capture::MediaChunk {
                data: b"video".to_vec(),
                timestamp_ms: 0,
            }],
        ),
    };
    let answers = vec![Some(with_video), Some(Answer::typed("No camera here."))];

    let result = aggregator
        .aggregate(&InterviewSettings::default(), &questions(2), &answers)
        .await;

    assert_eq!(ai.body_language_calls.load(Ordering::SeqCst), 1);
    assert!(result.body_language[0].is_some());
    assert!(result.body_language[1].is_none());

    let inputs = ai.feedback_inputs();
    let first = inputs
        .iter()
        .find(|i| i.question == "Question 1")
        .expect("feedback requested for question 1");
    assert_eq!(
        first.body_language_analysis.as_deref(),
        Some("Calm and engaged.")
    );
    let second = inputs
        .iter()
        .find(|i| i.question == "Question 2")
        .expect("feedback requested for question 2");
    assert!(second.body_language_analysis.is_none());

    Ok(())
}
