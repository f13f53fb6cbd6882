//! # Buyer Skill
//!
//! Cold read of the latest document by one buyer persona.

use super::agent_definitions::BuyerPersona;
use super::error::AgentError;
use super::llm_helpers::{run_agent, system_prompt};
use super::prompts;
use crate::gateway::{AgentGateway, AgentRequest};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output from a buyer
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuyerOutput {
    /// Exact text where the buyer stopped reading, if they did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<String>,
    /// The part the buyer would quote to their team
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quotable: Option<String>,
    #[serde(default)]
    pub questions: Vec<String>,
    /// Overall reaction in one or two sentences
    pub reaction: String,
    /// Single emoji capturing the reaction
    pub reaction_emoji: String,
}

pub struct BuyerSkill;

impl BuyerSkill {
    pub async fn run(
        gateway: &dyn AgentGateway,
        persona: BuyerPersona,
        document: &str,
    ) -> Result<BuyerOutput, AgentError> {
        let agent = persona.agent_id();
        let request = AgentRequest::new(
            agent.as_str(),
            system_prompt::<BuyerOutput>(prompts::for_agent(agent)),
            document,
        );

        run_agent(gateway, agent, request).await
    }
}
