use super::flows::{
    AnswerFeedback, BodyLanguageAnalysis, BodyLanguageInput, FeedbackInput, GeneratedQuestions,
    QuestionsInput,
};
use super::prompt::{PromptRenderer, RenderedPrompt};
use super::AiError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};
use validator::Validate;

/// The generative AI collaborator
///
/// Every call either returns a schema-validated output or fails; there are no
/// retries.
#[async_trait::async_trait]
pub trait InterviewAi: Send + Sync {
    async fn generate_questions(&self, input: &QuestionsInput)
        -> Result<GeneratedQuestions, AiError>;

    async fn provide_feedback(&self, input: &FeedbackInput) -> Result<AnswerFeedback, AiError>;

    async fn analyze_body_language(
        &self,
        input: &BodyLanguageInput,
    ) -> Result<BodyLanguageAnalysis, AiError>;
}

/// Settings for [`ChatCompletionsClient`]
#[derive(Debug, Clone)]
pub struct ChatCompletionsConfig {
    /// Base URL of an OpenAI-compatible API (e.g., "https://api.openai.com/v1")
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
    pub temperature: f64,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    response_format: Value,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// [`InterviewAi`] over an OpenAI-compatible chat completions endpoint
pub struct ChatCompletionsClient {
    client: Client,
    config: ChatCompletionsConfig,
    prompts: PromptRenderer,
}

impl ChatCompletionsClient {
    pub fn new(config: ChatCompletionsConfig) -> Result<Self, AiError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            config,
            prompts: PromptRenderer::new()?,
        })
    }

    /// Chat completions only take images as attachments; anything else is
    /// refused here instead of by the endpoint
    fn build_request(&self, prompt: &RenderedPrompt) -> Result<ChatRequest<'_>, AiError> {
        let system = format!(
            "Respond only with JSON that matches this schema:\n{}",
            prompt.output_schema
        );

        let user = match &prompt.media {
            Some(data_uri) => {
                let mime = data_uri_mime(data_uri);
                if !mime.starts_with("image/") {
                    return Err(AiError::UnsupportedMedia(mime.to_string()));
                }
                json!([
                    { "type": "text", "text": prompt.text },
                    { "type": "image_url", "image_url": { "url": data_uri } }
                ])
            }
            None => Value::String(prompt.text.clone()),
        };

        Ok(ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: Value::String(system),
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.config.temperature,
            response_format: json!({ "type": "json_object" }),
        })
    }

    /// Send a rendered prompt and validate the structured response
    async fn complete<T>(&self, prompt: RenderedPrompt) -> Result<T, AiError>
    where
        T: DeserializeOwned + Validate,
    {
        let request = self.build_request(&prompt)?;
        info!("Calling {} with model {}", prompt.name, self.config.model);

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response: ChatResponse = response.json().await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(AiError::EmptyResponse)?;

        debug!("{} returned {} bytes", prompt.name, content.len());

        parse_output(&content)
    }
}

/// MIME type of a `data:` URI, empty when there is none
fn data_uri_mime(uri: &str) -> &str {
    uri.strip_prefix("data:")
        .and_then(|rest| rest.split([';', ',']).next())
        .unwrap_or_default()
}

/// Parse and validate a model response, tolerating a fenced code block
pub fn parse_output<T>(content: &str) -> Result<T, AiError>
where
    T: DeserializeOwned + Validate,
{
    let trimmed = content.trim();
    let json = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    if json.is_empty() {
        return Err(AiError::EmptyResponse);
    }

    let output: T = serde_json::from_str(json)?;
    output.validate()?;
    Ok(output)
}

#[async_trait::async_trait]
impl InterviewAi for ChatCompletionsClient {
    async fn generate_questions(
        &self,
        input: &QuestionsInput,
    ) -> Result<GeneratedQuestions, AiError> {
        let prompt = self.prompts.questions(input)?;
        self.complete(prompt).await
    }

    async fn provide_feedback(&self, input: &FeedbackInput) -> Result<AnswerFeedback, AiError> {
        let prompt = self.prompts.feedback(input)?;
        self.complete(prompt).await
    }

    async fn analyze_body_language(
        &self,
        input: &BodyLanguageInput,
    ) -> Result<BodyLanguageAnalysis, AiError> {
        let prompt = self.prompts.body_language(input)?;
        self.complete(prompt).await
    }
}
