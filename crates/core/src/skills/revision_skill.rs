//! # Revision Skill
//!
//! Folds the accepted feedback of a round into its input document.

use super::agent_definitions::AgentId;
use super::error::AgentError;
use super::llm_helpers::{run_agent, system_prompt};
use super::prompts;
use crate::gateway::{AgentGateway, AgentRequest};
use crate::state::FeedbackItem;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output from the revision agent
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevisionOutput {
    /// Full revised document text
    pub revised_document: String,
    /// One line per change made
    #[serde(default)]
    pub changes_summary: Vec<String>,
}

pub struct RevisionSkill;

impl RevisionSkill {
    pub async fn run(
        gateway: &dyn AgentGateway,
        document: &str,
        accepted: &[FeedbackItem],
        goal: Option<&str>,
    ) -> Result<RevisionOutput, AgentError> {
        let agent = AgentId::Revision;
        let request = AgentRequest::new(
            agent.as_str(),
            system_prompt::<RevisionOutput>(prompts::for_agent(agent)),
            document,
        )
        .with_goal(goal)
        .with_additional_context(format!(
            "ACCEPTED FEEDBACK TO ADDRESS:\n\n{}",
            render_feedback(accepted)
        ));

        run_agent(gateway, agent, request).await
    }
}

/// Numbered rendering of accepted feedback, including the author's notes.
pub fn render_feedback(accepted: &[FeedbackItem]) -> String {
    if accepted.is_empty() {
        return "(none)".to_string();
    }

    accepted
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let mut entry = format!(
                "{}. [{}] Location: \"{}\"\n   Issue: {}",
                i + 1,
                item.editor.as_str().to_uppercase(),
                item.location,
                item.issue
            );
            if let Some(suggestion) = &item.suggestion {
                entry.push_str(&format!("\n   Suggestion: {}", suggestion));
            }
            if let Some(edit) = &item.user_edit {
                entry.push_str(&format!("\n   User note: {}", edit));
            }
            if let Some(response) = &item.user_response {
                entry.push_str(&format!("\n   User response: {}", response));
            }
            entry
        })
        .collect::<Vec<String>>()
        .join("\n\n")
}
