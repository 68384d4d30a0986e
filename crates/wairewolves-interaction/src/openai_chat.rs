//! OpenAiChat - chat completions backend for agent seats.
//!
//! Keeps the whole conversation of one seat and replays it on every request.
//! Calls are blocking; the agent worker runs them on the blocking pool.

use crate::config::OpenAiConfig;
use crate::error::InteractionError;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use wairewolves_core::agent::{AgentError, ChatCapability, ChatFactory};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// One entry of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role("assistant", content)
    }

    fn with_role(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

/// [`ChatCapability`] backed by the OpenAI chat completions API.
pub struct OpenAiChat {
    config: OpenAiConfig,
    client: Option<Client>,
    transcript: Vec<ChatMessage>,
}

impl OpenAiChat {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            client: None,
            transcript: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// The HTTP client, built on first use so it is created on the thread
    /// that blocks on it.
    fn client(&mut self) -> Result<Client, InteractionError> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| InteractionError::Request(format!("Failed to build client: {err}")))?;
        self.client = Some(client.clone());
        Ok(client)
    }

    fn complete(&mut self) -> Result<String, InteractionError> {
        let client = self.client()?;
        let request = ChatCompletionRequest {
            model: self.config.model(),
            messages: &self.transcript,
            max_tokens: self.config.max_tokens,
        };

        let mut builder = client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request);
        if let Some(organization) = &self.config.organization {
            builder = builder.header("OpenAI-Organization", organization);
        }

        let response = builder
            .send()
            .map_err(|err| InteractionError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, &body));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|err| InteractionError::Parse(err.to_string()))?;
        extract_text_response(parsed)
    }
}

impl ChatCapability for OpenAiChat {
    fn system(&mut self, context: &str) {
        self.transcript.clear();
        self.transcript.push(ChatMessage::system(context));
    }

    fn advice(&mut self, question: &str, answer: Option<&str>) {
        self.transcript.push(ChatMessage::user(question));
        if let Some(answer) = answer {
            self.transcript.push(ChatMessage::assistant(answer));
        }
    }

    fn ask(&mut self, prompt: &str) -> Result<String, AgentError> {
        self.transcript.push(ChatMessage::user(prompt));
        match self.complete() {
            Ok(reply) => {
                self.transcript.push(ChatMessage::assistant(reply.clone()));
                Ok(reply)
            }
            Err(err) => {
                // An unanswered prompt would be replayed with the next request.
                self.transcript.pop();
                tracing::warn!(model = self.config.model(), retryable = err.is_retryable(), "{}", err);
                Err(err.into())
            }
        }
    }
}

/// Hands every agent seat its own [`OpenAiChat`].
#[derive(Debug, Clone)]
pub struct OpenAiChatFactory {
    config: OpenAiConfig,
}

impl OpenAiChatFactory {
    pub fn new(config: OpenAiConfig) -> Self {
        Self { config }
    }

    /// See [`OpenAiConfig::try_from_env`].
    pub fn try_from_env() -> Result<Self, InteractionError> {
        OpenAiConfig::try_from_env().map(Self::new)
    }
}

impl ChatFactory for OpenAiChatFactory {
    fn create(&self, seat: &str) -> Box<dyn ChatCapability> {
        tracing::debug!(seat, model = self.config.model(), "Creating OpenAI chat");
        Box::new(OpenAiChat::new(self.config.clone()))
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Joins the content of every choice, one per line.
fn extract_text_response(response: ChatCompletionResponse) -> Result<String, InteractionError> {
    let parts: Vec<String> = response
        .choices
        .into_iter()
        .filter_map(|choice| choice.message.content)
        .collect();
    if parts.is_empty() {
        return Err(InteractionError::EmptyResponse);
    }
    Ok(parts.join("\n"))
}

fn map_http_error(status: StatusCode, body: &str) -> InteractionError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    InteractionError::Api {
        status: status.as_u16(),
        message,
        is_retryable,
    }
}
