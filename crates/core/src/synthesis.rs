//! # Synthesis
//!
//! Word-level comparison of a round's input with its final document, the data
//! behind the round summary view.

use crate::state::{BuyerReaction, RoundRecord};
use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

/// A run of consecutive words sharing one change tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum DiffSegment {
    Unchanged(String),
    Added(String),
    Removed(String),
}

impl DiffSegment {
    fn new(tag: ChangeTag, text: &str) -> Self {
        match tag {
            ChangeTag::Equal => Self::Unchanged(text.to_string()),
            ChangeTag::Insert => Self::Added(text.to_string()),
            ChangeTag::Delete => Self::Removed(text.to_string()),
        }
    }

    fn tag(&self) -> ChangeTag {
        match self {
            Self::Unchanged(_) => ChangeTag::Equal,
            Self::Added(_) => ChangeTag::Insert,
            Self::Removed(_) => ChangeTag::Delete,
        }
    }

    fn push_str(&mut self, text: &str) {
        match self {
            Self::Unchanged(s) | Self::Added(s) | Self::Removed(s) => s.push_str(text),
        }
    }
}

/// Word diff between two texts; additions and removals count runs, not words
pub fn word_diff(original: &str, revised: &str) -> Vec<DiffSegment> {
    let diff = TextDiff::from_words(original, revised);
    let mut segments: Vec<DiffSegment> = Vec::new();

    for change in diff.iter_all_changes() {
        match segments.last_mut() {
            Some(last) if last.tag() == change.tag() => last.push_str(change.value()),
            _ => segments.push(DiffSegment::new(change.tag(), change.value())),
        }
    }
    segments
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Synthesis {
    pub round_number: u32,
    pub segments: Vec<DiffSegment>,
    pub additions: usize,
    pub removals: usize,
    pub final_document: String,
    pub buyer_reactions: Vec<BuyerReaction>,
}

impl Synthesis {
    /// Summary of a round whose revision has landed; `None` before that
    pub fn from_round(round: &RoundRecord) -> Option<Self> {
        round.revised_document.as_ref()?;

        let final_document = round.latest_document().to_string();
        let segments = word_diff(&round.input_document, &final_document);
        let additions = segments
            .iter()
            .filter(|s| matches!(s, DiffSegment::Added(_)))
            .count();
        let removals = segments
            .iter()
            .filter(|s| matches!(s, DiffSegment::Removed(_)))
            .count();

        Some(Self {
            round_number: round.round_number,
            segments,
            additions,
            removals,
            final_document,
            buyer_reactions: round.buyer_reactions.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::{RevisionOutput, VoiceOutput};

    fn rejoin(segments: &[DiffSegment], keep_added: bool) -> String {
        segments
            .iter()
            .filter_map(|s| match s {
                DiffSegment::Unchanged(t) => Some(t.as_str()),
                DiffSegment::Added(t) if keep_added => Some(t.as_str()),
                DiffSegment::Removed(t) if !keep_added => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_word_diff_reconstructs_both_sides() {
        let original = "The quick brown fox jumps";
        let revised = "The slow brown fox leaps high";
        let segments = word_diff(original, revised);

        assert_eq!(rejoin(&segments, false), original);
        assert_eq!(rejoin(&segments, true), revised);
        assert!(segments.contains(&DiffSegment::Unchanged("The ".into())));
    }

    #[test]
    fn test_identical_texts_have_no_changes() {
        let segments = word_diff("same words here", "same words here");
        assert_eq!(segments, vec![DiffSegment::Unchanged("same words here".into())]);
    }

    #[test]
    fn test_synthesis_needs_a_revision() {
        let round = RoundRecord::new(1, "draft text");
        assert!(Synthesis::from_round(&round).is_none());

        let revised = round.with_revision(
            vec![],
            RevisionOutput {
                revised_document: "draft copy".into(),
                changes_summary: vec![],
            },
            VoiceOutput {
                document: "final text".into(),
                changes_applied: vec![],
            },
        );
        let synthesis = Synthesis::from_round(&revised).unwrap();
        assert_eq!(synthesis.final_document, "final text");
        assert_eq!(synthesis.additions, 1);
        assert_eq!(synthesis.removals, 1);
    }
}
