//! # Voice Skill
//!
//! Style normalization of the revised document.

use super::agent_definitions::AgentId;
use super::error::AgentError;
use super::llm_helpers::{run_agent, system_prompt};
use super::prompts;
use crate::gateway::{AgentGateway, AgentRequest};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output from the voice pass
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoiceOutput {
    /// Full document with voice applied
    pub document: String,
    #[serde(default)]
    pub changes_applied: Vec<String>,
}

pub struct VoiceSkill;

impl VoiceSkill {
    pub async fn run(gateway: &dyn AgentGateway, document: &str) -> Result<VoiceOutput, AgentError> {
        let agent = AgentId::Voice;
        let request = AgentRequest::new(
            agent.as_str(),
            system_prompt::<VoiceOutput>(prompts::for_agent(agent)),
            document,
        );

        run_agent(gateway, agent, request).await
    }
}
