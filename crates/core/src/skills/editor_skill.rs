//! # Editor Skill
//!
//! Critique of the round's input document by one editor persona.
//! Ids and triage status are assigned by the pipeline, not the agent.

use super::agent_definitions::EditorPersona;
use super::error::AgentError;
use super::llm_helpers::{run_agent, system_prompt};
use super::prompts;
use crate::gateway::{AgentGateway, AgentRequest};
use crate::state::Severity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One issue raised by an editor
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EditorFinding {
    /// Quote or section reference where the issue applies
    #[serde(default)]
    pub location: String,
    /// What is wrong
    pub issue: String,
    /// How to fix it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub severity: Severity,
}

/// Output from an editor
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EditorOutput {
    #[serde(default)]
    pub feedback: Vec<EditorFinding>,
}

pub struct EditorSkill;

impl EditorSkill {
    /// Critique `document` as `persona`.
    pub async fn run(
        gateway: &dyn AgentGateway,
        persona: EditorPersona,
        document: &str,
        goal: Option<&str>,
    ) -> Result<EditorOutput, AgentError> {
        let agent = persona.agent_id();
        let request = AgentRequest::new(
            agent.as_str(),
            system_prompt::<EditorOutput>(prompts::for_agent(agent)),
            document,
        )
        .with_goal(goal);

        run_agent(gateway, agent, request).await
    }
}
