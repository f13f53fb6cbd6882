//! # Agent Definitions
//!
//! The fixed cast of the pipeline: three editors, one reviser, one voice
//! normalizer and four buyers. Declaration order is merge order.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Editor persona that produced a feedback item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EditorPersona {
    /// Looks for holes, unsupported claims and wandering structure
    Skeptic,
    /// Behavioral-science rigor
    Besci,
    /// Clarity and flow
    Clarity,
}

impl EditorPersona {
    /// Merge order for editor results
    pub const ALL: [EditorPersona; 3] = [Self::Skeptic, Self::Besci, Self::Clarity];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skeptic => "skeptic",
            Self::Besci => "besci",
            Self::Clarity => "clarity",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Skeptic => "Skeptic",
            Self::Besci => "BeSci",
            Self::Clarity => "Clarity",
        }
    }

    pub fn agent_id(&self) -> AgentId {
        AgentId::Editor(*self)
    }
}

impl fmt::Display for EditorPersona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buyer persona reacting to a revised document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum BuyerPersona {
    Ceo,
    Cpo,
    Cro,
    HeadCx,
}

impl BuyerPersona {
    /// Merge order for buyer results
    pub const ALL: [BuyerPersona; 4] = [Self::Ceo, Self::Cpo, Self::Cro, Self::HeadCx];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ceo => "ceo",
            Self::Cpo => "cpo",
            Self::Cro => "cro",
            Self::HeadCx => "head-cx",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ceo => "CEO",
            Self::Cpo => "CPO",
            Self::Cro => "CRO",
            Self::HeadCx => "Head of CX",
        }
    }

    pub fn agent_id(&self) -> AgentId {
        AgentId::Buyer(*self)
    }
}

impl fmt::Display for BuyerPersona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one of the nine agent wrappers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentId {
    Editor(EditorPersona),
    Revision,
    Voice,
    Buyer(BuyerPersona),
}

impl AgentId {
    /// Every agent, in pipeline order
    pub fn all() -> Vec<AgentId> {
        EditorPersona::ALL
            .iter()
            .map(EditorPersona::agent_id)
            .chain([AgentId::Revision, AgentId::Voice])
            .chain(BuyerPersona::ALL.iter().map(BuyerPersona::agent_id))
            .collect()
    }

    /// Identifier sent to the gateway as `agent`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Editor(persona) => persona.as_str(),
            Self::Revision => "revision",
            Self::Voice => "voice",
            Self::Buyer(persona) => persona.as_str(),
        }
    }

    /// Prefix of every error raised by this agent's wrapper
    pub fn failure_message(&self) -> String {
        match self {
            Self::Editor(persona) => format!("{} agent failed", persona.display_name()),
            Self::Revision => "Revision agent failed".to_string(),
            Self::Voice => "Voice Pass agent failed".to_string(),
            Self::Buyer(persona) => format!("{} buyer agent failed", persona.display_name()),
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
