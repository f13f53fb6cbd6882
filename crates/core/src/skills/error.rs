use super::agent_definitions::AgentId;
use crate::gateway::GatewayError;
use thiserror::Error;

/// Failure of one agent wrapper call.
///
/// The display always starts with the wrapper's failure message, e.g.
/// `"Skeptic agent failed: API call failed: 500 Internal Server Error"`.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{prefix}: {source}", prefix = .agent.failure_message())]
    Gateway {
        agent: AgentId,
        #[source]
        source: GatewayError,
    },

    /// The gateway returned JSON that does not match the agent's response shape
    #[error("{prefix}: unexpected response shape: {source}", prefix = .agent.failure_message())]
    Shape {
        agent: AgentId,
        #[source]
        source: serde_json::Error,
    },
}

impl AgentError {
    pub fn agent(&self) -> AgentId {
        match self {
            Self::Gateway { agent, .. } | Self::Shape { agent, .. } => *agent,
        }
    }
}
