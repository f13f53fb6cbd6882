//! Anthropic gateway using the Messages API
//!
//! One system prompt, one user turn, no tools. The first text block of the
//! answer is run through [`extract_json`].

use super::{extract_json, AgentGateway, AgentRequest, GatewayError};
use crate::models::{AgentModels, ModelConfig, API_KEY_ENV};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

pub struct AnthropicGateway {
    client: Client,
    models: AgentModels,
    api_key: Option<String>,
}

impl std::fmt::Debug for AnthropicGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicGateway")
            .field("models", &self.models)
            .field("api_key", &self.api_key.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl AnthropicGateway {
    pub fn new(models: AgentModels, api_key: Option<String>) -> Self {
        tracing::debug!(
            model = %models.global.model,
            has_key = api_key.is_some(),
            "Creating Anthropic gateway"
        );
        Self {
            client: Client::new(),
            models,
            api_key,
        }
    }

    /// Build a gateway whose key comes from `ANTHROPIC_API_KEY`
    pub fn from_env(models: AgentModels) -> Self {
        Self::new(models, ModelConfig::api_key_from_env())
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send the request and return the first text block verbatim
    async fn complete(&self, request: &AgentRequest) -> Result<String, GatewayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingCredential { env: API_KEY_ENV })?;

        let config = self.models.resolve(&request.agent);
        let url = config.messages_url();

        let body = json!({
            "model": config.model,
            "max_tokens": config.max_tokens,
            "system": request.system_prompt,
            "messages": [
                { "role": "user", "content": request.user_message() }
            ],
        });

        tracing::debug!(agent = %request.agent, model = %config.model, "Sending agent request");

        let mut builder = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", &config.api_version)
            .header("content-type", "application/json")
            .json(&body);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let response = builder.send().await.map_err(|source| GatewayError::Request {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| GatewayError::Request { url, source })?;

        if !status.is_success() {
            tracing::warn!(agent = %request.agent, status = status.as_u16(), "Anthropic API error");
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .map(str::to_string)
                        .unwrap_or_else(|| text.chars().take(200).collect())
                });
            return Err(GatewayError::Transport {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse =
            serde_json::from_str(&text).map_err(GatewayError::MalformedResponse)?;

        parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or(GatewayError::NoTextContent)
    }
}

#[async_trait]
impl AgentGateway for AnthropicGateway {
    async fn invoke(&self, request: AgentRequest) -> Result<Value, GatewayError> {
        let text = self.complete(&request).await?;
        extract_json(&text).map_err(|e| {
            tracing::warn!(agent = %request.agent, "Failed to parse JSON from agent response");
            e
        })
    }
}
