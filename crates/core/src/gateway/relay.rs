//! Relay gateway
//!
//! Posts [`AgentRequest`] as JSON to a remote `POST /api/agent` endpoint
//! (see the `redline` server) and returns its body. The relay owns the
//! credential, so callers of this gateway never see an API key.

use super::{AgentGateway, AgentRequest, GatewayError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Relay route, relative to the server's base URL
pub const RELAY_PATH: &str = "/api/agent";

#[derive(Debug, Clone)]
pub struct RelayGateway {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct RelayErrorBody {
    error: String,
}

impl RelayGateway {
    /// `base_url` is the server root, e.g. `http://localhost:3000`
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), RELAY_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AgentGateway for RelayGateway {
    async fn invoke(&self, request: AgentRequest) -> Result<Value, GatewayError> {
        tracing::debug!(agent = %request.agent, endpoint = %self.endpoint, "Relaying agent request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|source| GatewayError::Request {
                url: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| GatewayError::Request {
                url: self.endpoint.clone(),
                source,
            })?;

        if !status.is_success() {
            let message = serde_json::from_str::<RelayErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            // the relay already rendered upstream transport failures
            let relayed = format!("API call failed: {} ", status.as_u16());
            let message = message
                .strip_prefix(&relayed)
                .map(str::to_string)
                .unwrap_or(message);
            return Err(GatewayError::Transport {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| GatewayError::InvalidRelayResponse(e.to_string()))
    }
}
