//! # Pipeline State
//!
//! The read-only snapshot published to observers after every mutation.

use super::round::RoundRecord;
use super::store::RoundStore;
use crate::pipeline::PipelineStage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineState {
    pub current_stage: PipelineStage,
    /// 1-based pointer into `rounds`; `0` only while the store is empty
    pub current_round: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_goal: Option<String>,
    pub rounds: RoundStore,
    pub is_processing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub let_it_cook_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub let_it_cook_rounds: Option<u32>,
}

impl PipelineState {
    /// The round the pointer is on
    pub fn active_round(&self) -> Option<&Arc<RoundRecord>> {
        self.rounds.get(self.current_round)
    }

    pub fn has_started(&self) -> bool {
        !self.rounds.is_empty()
    }
}
