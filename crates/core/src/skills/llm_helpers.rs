//! # LLM Helpers
//!
//! Shared plumbing for the agent wrappers: instruction assembly and the typed
//! gateway call. Every wrapper goes through [`run_agent`], so failure wrapping
//! happens in one place.

use super::agent_definitions::AgentId;
use super::error::AgentError;
use crate::gateway::{AgentGateway, AgentRequest};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// Append the JSON schema of `T` to an instruction block.
pub fn system_prompt<T: JsonSchema>(instructions: &str) -> String {
    let schema = schemars::schema_for!(T);
    let rendered = serde_json::to_string_pretty(&schema).unwrap_or_default();
    format!(
        "{}\n\nReturn only valid JSON matching this schema. No other text.\n{}",
        instructions.trim_end(),
        rendered
    )
}

/// Invoke `agent` through the gateway and decode its answer into `T`.
pub async fn run_agent<T: DeserializeOwned>(
    gateway: &dyn AgentGateway,
    agent: AgentId,
    request: AgentRequest,
) -> Result<T, AgentError> {
    let value = gateway.invoke(request).await.map_err(|source| {
        tracing::warn!(agent = %agent, error = %source, "Agent call failed");
        AgentError::Gateway { agent, source }
    })?;

    serde_json::from_value(value).map_err(|source| {
        tracing::warn!(agent = %agent, error = %source, "Agent returned unexpected shape");
        AgentError::Shape { agent, source }
    })
}
