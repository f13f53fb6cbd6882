//! # Agent Gateway
//!
//! The single boundary between Redline and the remote text-generation service.
//! Every agent wrapper goes through [`AgentGateway::invoke`].
//!
//! ## Implementations
//!
//! - [`AnthropicGateway`] - calls the Messages API directly
//! - [`RelayGateway`] - forwards to a remote `POST /api/agent` relay

pub mod anthropic;
pub mod error;
pub mod parse;
pub mod relay;

pub use anthropic::AnthropicGateway;
pub use error::GatewayError;
pub use parse::extract_json;
pub use relay::RelayGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// One agent call as it crosses the gateway boundary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentRequest {
    /// Persona identifier, e.g. "skeptic" or "head-cx"
    pub agent: String,
    /// Instruction block for the model
    pub system_prompt: String,
    /// Document under review
    pub document: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
}

impl AgentRequest {
    pub fn new(
        agent: impl Into<String>,
        system_prompt: impl Into<String>,
        document: impl Into<String>,
    ) -> Self {
        Self {
            agent: agent.into(),
            system_prompt: system_prompt.into(),
            document: document.into(),
            goal: None,
            additional_context: None,
        }
    }

    /// Attach the document goal; blank goals are dropped
    pub fn with_goal(mut self, goal: Option<&str>) -> Self {
        self.goal = goal
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string);
        self
    }

    pub fn with_additional_context(mut self, context: impl Into<String>) -> Self {
        self.additional_context = Some(context.into());
        self
    }

    /// Render the single user turn sent upstream.
    ///
    /// `GOAL:` prefix when a goal is set, then the document, then any
    /// additional context.
    pub fn user_message(&self) -> String {
        let mut message = format!("DOCUMENT:\n\n{}", self.document);

        if let Some(goal) = self.goal.as_deref().filter(|g| !g.is_empty()) {
            message = format!("GOAL: {}\n\n{}", goal, message);
        }

        if let Some(context) = self.additional_context.as_deref().filter(|c| !c.is_empty()) {
            message.push_str("\n\n");
            message.push_str(context);
        }

        message
    }
}

/// Opaque request/response operation fronting the model provider
#[async_trait]
pub trait AgentGateway: Send + Sync {
    /// Invoke one agent and return its structured JSON answer
    async fn invoke(&self, request: AgentRequest) -> Result<Value, GatewayError>;
}

#[async_trait]
impl<G: AgentGateway + ?Sized> AgentGateway for Arc<G> {
    async fn invoke(&self, request: AgentRequest) -> Result<Value, GatewayError> {
        (**self).invoke(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_plain() {
        let request = AgentRequest::new("voice", "be terse", "Hello world");
        assert_eq!(request.user_message(), "DOCUMENT:\n\nHello world");
    }

    #[test]
    fn test_user_message_with_goal_and_context() {
        let request = AgentRequest::new("revision", "fix it", "Body")
            .with_goal(Some("Convince execs"))
            .with_additional_context("ACCEPTED FEEDBACK TO ADDRESS:\n\n1. thing");
        assert_eq!(
            request.user_message(),
            "GOAL: Convince execs\n\nDOCUMENT:\n\nBody\n\nACCEPTED FEEDBACK TO ADDRESS:\n\n1. thing"
        );
    }

    #[test]
    fn test_blank_goal_is_dropped() {
        let request = AgentRequest::new("skeptic", "p", "d").with_goal(Some("   "));
        assert!(request.goal.is_none());
        assert!(!request.user_message().contains("GOAL"));
    }

    #[test]
    fn test_request_wire_format_is_camel_case() {
        let request = AgentRequest::new("ceo", "p", "d").with_additional_context("ctx");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["systemPrompt"], "p");
        assert_eq!(json["additionalContext"], "ctx");
        assert!(json.get("goal").is_none());
    }
}
