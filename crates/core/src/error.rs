//! # Pipeline Errors
//!
//! Everything a controller transition can fail with. The display string of
//! the error is what lands in `PipelineState::error`.

use crate::pipeline::PipelineStage;
use crate::skills::AgentError;
use crate::state::FeedbackStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No pipeline started")]
    NotStarted,

    #[error("Document is empty")]
    EmptyDocument,

    #[error("Cannot {operation} while round is in {actual} (expected {expected})")]
    InvalidStage {
        operation: &'static str,
        expected: PipelineStage,
        actual: PipelineStage,
    },

    #[error("Round {requested} does not exist ({available} rounds)")]
    RoundOutOfRange { requested: usize, available: usize },

    #[error("Feedback item {0} not found")]
    FeedbackNotFound(String),

    #[error("Feedback item {id} is already {status}")]
    FeedbackAlreadyTriaged { id: String, status: FeedbackStatus },

    #[error(transparent)]
    Agent(#[from] AgentError),

    /// One or more calls of a fan-out group failed; siblings were discarded
    #[error("{}", join_failures(.failures))]
    FanOut {
        stage: PipelineStage,
        failures: Vec<AgentError>,
    },
}

fn join_failures(failures: &[AgentError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join("; ")
}

impl PipelineError {
    /// Agents that failed, in merge order
    pub fn failed_agents(&self) -> Vec<&'static str> {
        match self {
            Self::Agent(err) => vec![err.agent().as_str()],
            Self::FanOut { failures, .. } => failures.iter().map(|e| e.agent().as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use crate::skills::{AgentId, EditorPersona};

    fn transport(persona: EditorPersona) -> AgentError {
        AgentError::Gateway {
            agent: AgentId::Editor(persona),
            source: GatewayError::Transport {
                status: 500,
                message: "Internal Server Error".into(),
            },
        }
    }

    #[test]
    fn test_single_failure_fan_out_reads_like_agent_error() {
        let err = PipelineError::FanOut {
            stage: PipelineStage::Editors,
            failures: vec![transport(EditorPersona::Skeptic)],
        };
        assert_eq!(
            err.to_string(),
            "Skeptic agent failed: API call failed: 500 Internal Server Error"
        );
        assert_eq!(err.failed_agents(), vec!["skeptic"]);
    }

    #[test]
    fn test_fan_out_names_every_failure() {
        let err = PipelineError::FanOut {
            stage: PipelineStage::Editors,
            failures: vec![
                transport(EditorPersona::Skeptic),
                transport(EditorPersona::Clarity),
            ],
        };
        let message = err.to_string();
        assert!(message.starts_with("Skeptic agent failed"));
        assert!(message.contains("; Clarity agent failed"));
        assert_eq!(err.failed_agents(), vec!["skeptic", "clarity"]);
    }

    #[test]
    fn test_invalid_stage_message() {
        let err = PipelineError::InvalidStage {
            operation: "run editors",
            expected: PipelineStage::Draft,
            actual: PipelineStage::Review,
        };
        assert_eq!(
            err.to_string(),
            "Cannot run editors while round is in review (expected draft)"
        );
    }
}
