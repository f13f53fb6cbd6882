//! # Pipeline Events
//!
//! Progress notifications streamed to an optional observer channel.
//! State snapshots remain the source of truth; events only narrate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of pipeline event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineEventKind {
    /// A new document was loaded as round 1
    PipelineStarted,
    /// A follow-up round was appended
    RoundOpened,
    /// A fan-out or revision step began
    StageStarted,
    /// A step landed its results
    StageCompleted,
    /// One agent call failed
    AgentFailed,
    /// Triage changed the active round's feedback
    FeedbackUpdated,
    /// A transition was refused or aborted
    TransitionFailed,
    /// The round pointer moved
    RoundViewed,
    // === Autonomous mode ===
    CookStarted,
    CookFinished,
    PipelineReset,
}

/// An event in the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    /// Monotonic per controller
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: PipelineEventKind,
    /// Round the event concerns, if any
    #[serde(default)]
    pub round: Option<u32>,
    /// Agent that produced this event
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl PipelineEvent {
    pub fn new(seq: u64, kind: PipelineEventKind) -> Self {
        Self {
            seq,
            timestamp: Utc::now(),
            kind,
            round: None,
            agent: None,
            data: None,
        }
    }

    pub fn with_round(mut self, round: u32) -> Self {
        self.round = Some(round);
        self
    }

    pub fn with_agent(mut self, agent: &str) -> Self {
        self.agent = Some(agent.to_string());
        self
    }

    /// Add data to the event
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}
