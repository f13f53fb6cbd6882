//! # Pipeline Stages
//!
//! Defines the stages of one refinement round.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of a round
///
/// `Editors` and `Revision` are transient: they are visible on the pipeline
/// while agents run, but a stored round only ever rests in `Draft`, `Review`,
/// `Buyers` or `Synthesis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Round created, editors not yet run
    #[default]
    Draft,
    /// Editor personas are critiquing
    Editors,
    /// Human triage of editor feedback
    Review,
    /// Revision and voice pass are running
    Revision,
    /// Buyer personas are reacting
    Buyers,
    /// Round complete; diff and reactions available
    Synthesis,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Editors => "editors",
            Self::Review => "review",
            Self::Revision => "revision",
            Self::Buyers => "buyers",
            Self::Synthesis => "synthesis",
        }
    }

    pub fn is_complete(&self) -> bool {
        *self == Self::Synthesis
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
