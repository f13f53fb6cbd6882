//! Default instruction blocks bundled at compile time.
//!
//! The JSON schema of each agent's response is appended at call time by
//! [`super::llm_helpers::system_prompt`], so these files only describe the role.

use super::agent_definitions::{AgentId, BuyerPersona, EditorPersona};

/// Skeptic - holes, unsupported claims, wandering structure
pub const SKEPTIC: &str = include_str!("defaults/skeptic.md");

/// BeSci - behavioral-science rigor
pub const BESCI: &str = include_str!("defaults/besci.md");

/// Clarity - readability and flow
pub const CLARITY: &str = include_str!("defaults/clarity.md");

/// Revision - folds accepted feedback into the document
pub const REVISION: &str = include_str!("defaults/revision.md");

/// Voice - normalizes the author's style
pub const VOICE: &str = include_str!("defaults/voice.md");

/// CEO buyer - strategic lens
pub const CEO: &str = include_str!("defaults/ceo.md");

/// CPO buyer - product lens
pub const CPO: &str = include_str!("defaults/cpo.md");

/// CRO buyer - revenue lens
pub const CRO: &str = include_str!("defaults/cro.md");

/// Head of CX buyer - customer lens
pub const HEAD_CX: &str = include_str!("defaults/head_cx.md");

/// Instruction block for one agent
pub fn for_agent(agent: AgentId) -> &'static str {
    match agent {
        AgentId::Editor(EditorPersona::Skeptic) => SKEPTIC,
        AgentId::Editor(EditorPersona::Besci) => BESCI,
        AgentId::Editor(EditorPersona::Clarity) => CLARITY,
        AgentId::Revision => REVISION,
        AgentId::Voice => VOICE,
        AgentId::Buyer(BuyerPersona::Ceo) => CEO,
        AgentId::Buyer(BuyerPersona::Cpo) => CPO,
        AgentId::Buyer(BuyerPersona::Cro) => CRO,
        AgentId::Buyer(BuyerPersona::HeadCx) => HEAD_CX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_prompts_non_empty() {
        for agent in AgentId::all() {
            let content = for_agent(agent);
            assert!(content.len() > 50, "Prompt '{}' seems too short", agent);
        }
    }
}
