//! Prompt templates for the AI flows
//!
//! Uses Handlebars for rendering. Each template is paired with the JSON
//! schema its response must follow, so a rendered prompt carries everything
//! a client needs to make the call and check the answer.

use super::flows::{
    body_language_schema, feedback_schema, questions_schema, BodyLanguageInput, FeedbackInput,
    QuestionsInput,
};
use super::AiError;
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::Value;

pub const QUESTIONS_PROMPT: &str = "generate_interview_questions";
pub const FEEDBACK_PROMPT: &str = "provide_answer_feedback";
pub const BODY_LANGUAGE_PROMPT: &str = "analyze_body_language";

const QUESTIONS_TEMPLATE: &str = r#"You are an expert career coach specializing in helping candidates prepare for job interviews. Generate a list of {{numQuestions}} interview questions for the role of {{jobRole}} at {{dreamCompany}} in the {{industry}} industry.

The candidate has {{experienceLevel}} years of experience.
{{#if focusSkills}}
The candidate wants to specifically focus on the following skills: {{focusSkills}}.
{{/if}}

Tailor the questions to the candidate's experience level. Mix behavioral and technical questions that assess the candidate's skills and experience, and keep them challenging and relevant to the current job market.

Respond with a single JSON object of the form {"questions": ["..."]}."#;

const FEEDBACK_TEMPLATE: &str = r#"You are an interview coach providing detailed feedback on an interview answer.

Candidate's context:
- Target role: {{jobRole}}
- Company: {{dreamCompany}}
- Industry: {{industry}}

Interview question:
"{{question}}"

Candidate's answer:
"{{answer}}"
{{#if bodyLanguageAnalysis}}

Body language analysis:
{{bodyLanguageAnalysis}}
{{/if}}

Score each of the following from 0 to 100 and give specific feedback:
1. Clarity & Conciseness: was the answer clear, well structured and to the point?
2. Content Relevance: was it relevant to the question and tailored to the {{jobRole}} role at {{dreamCompany}}?
3. STAR Method Usage: did the candidate use Situation, Task, Action, Result? If the question is not behavioral, say so.
4. Impact & Results: were achievements quantified and their impact shown?

Then summarize strengths, weaknesses and actionable recommendations{{#if bodyLanguageAnalysis}}, taking the body language analysis into account{{/if}}. Give an overall score from 0 to 100.

Respond with a single JSON object with the keys overallScore, clarityAndConciseness, contentRelevance, starMethodUsage, impactAndResults (each {"score", "feedback"}) and recommendations."#;

const BODY_LANGUAGE_TEMPLATE: &str = r#"You are a communication coach specializing in non-verbal cues in job interviews. Analyze the attached video of a candidate answering an interview question.

The question was: "{{question}}"

Evaluate confidence, posture and eye contact. Give a score from 0 to 100 for each, specific feedback with examples, and an overall analysis with actionable recommendations. Focus only on non-verbal cues; do not judge the content of the spoken answer.

Respond with a single JSON object with the keys confidenceScore, confidenceFeedback, postureScore, postureFeedback, eyeContactScore, eyeContactFeedback and overallAnalysis."#;

/// A prompt ready to send, with the schema its response must satisfy
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    pub name: &'static str,
    pub text: String,
    /// Media attached to the request as a data URI
    pub media: Option<String>,
    pub output_schema: Value,
}

/// Compiled prompt templates
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl PromptRenderer {
    pub fn new() -> Result<Self, AiError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);

        for (name, template) in [
            (QUESTIONS_PROMPT, QUESTIONS_TEMPLATE),
            (FEEDBACK_PROMPT, FEEDBACK_TEMPLATE),
            (BODY_LANGUAGE_PROMPT, BODY_LANGUAGE_TEMPLATE),
        ] {
            handlebars
                .register_template_string(name, template)
                .map_err(|e| AiError::Template(e.to_string()))?;
        }

        Ok(Self { handlebars })
    }

    fn render<T: Serialize>(&self, name: &str, input: &T) -> Result<String, AiError> {
        self.handlebars
            .render(name, input)
            .map_err(|e| AiError::Template(e.to_string()))
    }

    pub fn questions(&self, input: &QuestionsInput) -> Result<RenderedPrompt, AiError> {
        Ok(RenderedPrompt {
            name: QUESTIONS_PROMPT,
            text: self.render(QUESTIONS_PROMPT, input)?,
            media: None,
            output_schema: questions_schema(),
        })
    }

    pub fn feedback(&self, input: &FeedbackInput) -> Result<RenderedPrompt, AiError> {
        Ok(RenderedPrompt {
            name: FEEDBACK_PROMPT,
            text: self.render(FEEDBACK_PROMPT, input)?,
            media: None,
            output_schema: feedback_schema(),
        })
    }

    pub fn body_language(&self, input: &BodyLanguageInput) -> Result<RenderedPrompt, AiError> {
        Ok(RenderedPrompt {
            name: BODY_LANGUAGE_PROMPT,
            text: self.render(BODY_LANGUAGE_PROMPT, input)?,
            media: Some(input.video_data_uri.clone()),
            output_schema: body_language_schema(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::InterviewSettings;

    #[test]
    fn test_questions_prompt_includes_settings() {
        let renderer = PromptRenderer::new().unwrap();
        let settings = InterviewSettings {
            num_questions: 7,
            focus_skills: Some("system design".to_string()),
            ..Default::default()
        };

        let prompt = renderer.questions(&QuestionsInput::from(&settings)).unwrap();

        assert_eq!(prompt.name, QUESTIONS_PROMPT);
        assert!(prompt.text.contains("a list of 7 interview questions"));
        assert!(prompt.text.contains("Software Engineer at Google"));
        assert!(prompt.text.contains("focus on the following skills: system design"));
        assert!(prompt.media.is_none());
        assert_eq!(prompt.output_schema["required"][0], "questions");
    }

    #[test]
    fn test_questions_prompt_omits_missing_focus_skills() {
        let renderer = PromptRenderer::new().unwrap();
        let prompt = renderer
            .questions(&QuestionsInput::from(&InterviewSettings::default()))
            .unwrap();

        assert!(!prompt.text.contains("focus on the following skills"));
    }

    #[test]
    fn test_feedback_prompt_does_not_escape_quotes() {
        let renderer = PromptRenderer::new().unwrap();
        let input = FeedbackInput::new(
            &InterviewSettings::default(),
            "Tell me about a bug you fixed.",
            "I'd traced a \"heisenbug\" in our <scheduler>.",
        );

        let prompt = renderer.feedback(&input).unwrap();

        assert!(prompt.text.contains("I'd traced a \"heisenbug\" in our <scheduler>."));
        assert!(!prompt.text.contains("Body language analysis"));
    }

    #[test]
    fn test_feedback_prompt_includes_body_language() {
        let renderer = PromptRenderer::new().unwrap();
        let input = FeedbackInput::new(&InterviewSettings::default(), "Why us?", "Mission.")
            .with_body_language(Some("Steady eye contact, relaxed posture.".to_string()));

        let prompt = renderer.feedback(&input).unwrap();

        assert!(prompt.text.contains("Body language analysis:\nSteady eye contact"));
        assert!(prompt.text.contains("taking the body language analysis into account"));
    }

    #[test]
    fn test_body_language_prompt_attaches_media() {
        let renderer = PromptRenderer::new().unwrap();
        let input = BodyLanguageInput {
            video_data_uri: "data:video/webm;base64,AAAA".to_string(),
            question: "Describe a conflict.".to_string(),
        };

        let prompt = renderer.body_language(&input).unwrap();

        assert_eq!(prompt.media.as_deref(), Some("data:video/webm;base64,AAAA"));
        assert!(prompt.text.contains("The question was: \"Describe a conflict.\""));
        assert!(!prompt.text.contains("base64"));
    }
}
