//! # Round Store
//!
//! Ordered, append-only list of rounds. Round `n` lives at index `n - 1`.

use super::round::RoundRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundStore {
    rounds: Vec<Arc<RoundRecord>>,
}

impl RoundStore {
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Round by 1-based number
    pub fn get(&self, round_number: usize) -> Option<&Arc<RoundRecord>> {
        round_number
            .checked_sub(1)
            .and_then(|index| self.rounds.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<RoundRecord>> {
        self.rounds.iter()
    }

    /// Append a draft round numbered `len + 1` and return its number
    pub fn open_round(&mut self, input_document: impl Into<String>) -> usize {
        let number = self.rounds.len() + 1;
        self.rounds
            .push(Arc::new(RoundRecord::new(number as u32, input_document)));
        number
    }

    /// Append a round seeded with round `from`'s latest document
    pub fn open_round_from(&mut self, from: usize) -> Option<usize> {
        let seed = self.get(from)?.latest_document().to_string();
        Some(self.open_round(seed))
    }

    /// Swap in a new version of an existing round, matched by number
    pub fn replace(&mut self, record: RoundRecord) -> bool {
        let Some(index) = (record.round_number as usize).checked_sub(1) else {
            return false;
        };
        match self.rounds.get_mut(index) {
            Some(slot) => {
                *slot = Arc::new(record);
                true
            }
            None => false,
        }
    }
}
