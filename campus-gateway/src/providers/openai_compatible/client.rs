//! OpenAI-compatible API client.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::prompt::PromptMessage;
use crate::providers::provider::{
    Provider, ProviderError, ProviderRequest, ProviderResponse, ProviderUsage,
};

/// OpenAI-compatible API client.
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    provider_name: String,
}

/// Request body for the Chat Completions API
#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

/// OpenAI-compatible message format
#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// OpenAI-compatible chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

/// Choice in the response
#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Usage information
#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl OpenAiCompatibleClient {
    /// Create a new OpenAI-compatible client.
    ///
    /// `timeout` bounds each whole request, connection included.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        provider_name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            base_url: base_url.into(),
            provider_name: provider_name.into(),
        })
    }

    /// Build request headers with optional auth.
    fn build_headers(&self) -> Result<HeaderMap, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(api_key) = &self.api_key {
            let auth_value = format!("Bearer {}", api_key);
            let header_value = HeaderValue::from_str(&auth_value).map_err(|_| {
                ProviderError::InvalidRequest("API key is not a valid header value".to_string())
            })?;
            headers.insert(AUTHORIZATION, header_value);
        }

        Ok(headers)
    }

    fn normalized_base_url(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }

    fn chat_completions_url(&self) -> String {
        let base = self.normalized_base_url();
        if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }

    fn build_request_body<'a>(&self, request: &'a ProviderRequest) -> ChatCompletionsRequest<'a> {
        ChatCompletionsRequest {
            model: &request.model,
            messages: request.messages.iter().map(convert_message).collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
        }
    }

    /// Convert OpenAI response to provider response
    fn convert_response(&self, response: ChatCompletionsResponse) -> ProviderResponse {
        let choice = response.choices.into_iter().next();
        let (text, stop_reason) = match choice {
            Some(choice) => (choice.message.content, choice.finish_reason),
            None => (None, None),
        };

        ProviderResponse {
            id: response.id,
            model: response.model,
            text,
            usage: response.usage.map(|u| ProviderUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            }),
            stop_reason,
        }
    }
}

fn convert_message(message: &PromptMessage) -> OpenAiMessage<'_> {
    OpenAiMessage {
        role: message.role.as_str(),
        content: &message.content,
    }
}

/// Classify a transport-level failure.
fn classify_transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_builder() {
        ProviderError::InvalidRequest(format!("failed to build request: {error}"))
    } else if error.is_timeout() {
        ProviderError::Unavailable(format!("request timed out: {error}"))
    } else {
        ProviderError::Unavailable(format!("request failed: {error}"))
    }
}

#[async_trait::async_trait]
impl Provider for OpenAiCompatibleClient {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(&self, request: &ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let url = self.chat_completions_url();
        let request_body = self.build_request_body(request);

        let response = self
            .http_client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&request_body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let response_text = response.text().await.map_err(classify_transport_error)?;

        let completions_response: ChatCompletionsResponse = serde_json::from_str(&response_text)
            .map_err(|e| {
                let preview: String = response_text.chars().take(500).collect();
                ProviderError::Unavailable(format!(
                    "Failed to parse OpenAI-compatible response: {e}\nBody preview: {preview}"
                ))
            })?;
        Ok(self.convert_response(completions_response))
    }
}
