//! # Round Records
//!
//! One pass of editors, triage, revision, voice and buyers over a document.
//!
//! Records are immutable once published. Every transition builds a new record
//! with `with_*` and the controller swaps it into the store whole.

use super::feedback::FeedbackItem;
use crate::pipeline::PipelineStage;
use crate::skills::{BuyerOutput, BuyerPersona, RevisionOutput, VoiceOutput};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One buyer's cold read of a round's final document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerReaction {
    pub buyer: BuyerPersona,
    pub reaction: String,
    pub reaction_emoji: String,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quotable: Option<String>,
}

impl BuyerReaction {
    pub fn from_output(buyer: BuyerPersona, output: BuyerOutput) -> Self {
        Self {
            buyer,
            reaction: output.reaction,
            reaction_emoji: output.reaction_emoji,
            questions: output.questions,
            stopped_at: output.stopped_at,
            quotable: output.quotable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    pub round_number: u32,
    pub input_document: String,
    #[serde(default)]
    pub editor_feedback: Vec<FeedbackItem>,
    #[serde(default)]
    pub accepted_feedback: Vec<FeedbackItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_passed_document: Option<String>,
    #[serde(default)]
    pub buyer_reactions: Vec<BuyerReaction>,
    pub timestamp: DateTime<Utc>,
    /// Furthest stage this round has reached
    #[serde(default)]
    pub stage: PipelineStage,
    #[serde(default)]
    pub revision_notes: Vec<String>,
    #[serde(default)]
    pub voice_notes: Vec<String>,
}

impl RoundRecord {
    pub fn new(round_number: u32, input_document: impl Into<String>) -> Self {
        Self {
            round_number,
            input_document: input_document.into(),
            editor_feedback: Vec::new(),
            accepted_feedback: Vec::new(),
            revised_document: None,
            voice_passed_document: None,
            buyer_reactions: Vec::new(),
            timestamp: Utc::now(),
            stage: PipelineStage::Draft,
            revision_notes: Vec::new(),
            voice_notes: Vec::new(),
        }
    }

    /// Voice-passed text, else revised text, else the input
    pub fn latest_document(&self) -> &str {
        self.voice_passed_document
            .as_deref()
            .or(self.revised_document.as_deref())
            .unwrap_or(&self.input_document)
    }

    /// Items whose status flows into revision, in feedback order
    pub fn actionable_feedback(&self) -> Vec<FeedbackItem> {
        self.editor_feedback
            .iter()
            .filter(|item| item.is_actionable())
            .cloned()
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.editor_feedback
            .iter()
            .filter(|item| item.is_pending())
            .count()
    }

    pub fn find_feedback(&self, id: &str) -> Option<&FeedbackItem> {
        self.editor_feedback.iter().find(|item| item.id == id)
    }

    /// Merged editor results; the round moves to review
    pub fn with_editor_feedback(&self, feedback: Vec<FeedbackItem>) -> Self {
        Self {
            editor_feedback: feedback,
            stage: PipelineStage::Review,
            ..self.clone()
        }
    }

    /// Replace the feedback list wholesale
    pub fn with_feedback_replaced(&self, feedback: Vec<FeedbackItem>) -> Self {
        Self {
            editor_feedback: feedback,
            ..self.clone()
        }
    }

    /// Swap one item by id, leaving order untouched
    pub fn with_feedback_item(&self, updated: FeedbackItem) -> Self {
        let editor_feedback = self
            .editor_feedback
            .iter()
            .map(|item| {
                if item.id == updated.id {
                    updated.clone()
                } else {
                    item.clone()
                }
            })
            .collect();
        self.with_feedback_replaced(editor_feedback)
    }

    /// Every pending item becomes accepted; decided items keep their status
    pub fn with_all_pending_accepted(&self) -> Self {
        let editor_feedback = self
            .editor_feedback
            .iter()
            .map(FeedbackItem::accepted_if_pending)
            .collect();
        self.with_feedback_replaced(editor_feedback)
    }

    /// Revision and voice outputs land together; the round moves to buyers
    pub fn with_revision(
        &self,
        accepted: Vec<FeedbackItem>,
        revision: RevisionOutput,
        voice: VoiceOutput,
    ) -> Self {
        Self {
            accepted_feedback: accepted,
            revised_document: Some(revision.revised_document),
            revision_notes: revision.changes_summary,
            voice_passed_document: Some(voice.document),
            voice_notes: voice.changes_applied,
            stage: PipelineStage::Buyers,
            ..self.clone()
        }
    }

    /// Buyer reactions land; the round is complete
    pub fn with_buyer_reactions(&self, reactions: Vec<BuyerReaction>) -> Self {
        Self {
            buyer_reactions: reactions,
            stage: PipelineStage::Synthesis,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::EditorPersona;
    use crate::state::{FeedbackDecision, FeedbackStatus, Severity};

    fn item(persona: EditorPersona, index: usize) -> FeedbackItem {
        FeedbackItem::new(persona, index, "intro", "Too long", None, Severity::Low)
    }

    fn revision(text: &str) -> RevisionOutput {
        RevisionOutput {
            revised_document: text.to_string(),
            changes_summary: vec!["Tightened intro".into()],
        }
    }

    fn voice(text: &str) -> VoiceOutput {
        VoiceOutput {
            document: text.to_string(),
            changes_applied: vec![],
        }
    }

    #[test]
    fn test_latest_document_falls_back_to_input() {
        let round = RoundRecord::new(1, "original");
        assert_eq!(round.latest_document(), "original");
    }

    #[test]
    fn test_latest_document_prefers_revised_over_input() {
        let mut round = RoundRecord::new(1, "original");
        round.revised_document = Some("revised".into());
        assert_eq!(round.latest_document(), "revised");
    }

    #[test]
    fn test_latest_document_prefers_voice_pass() {
        let round = RoundRecord::new(1, "original").with_revision(
            vec![],
            revision("revised"),
            voice("voiced"),
        );
        assert_eq!(round.latest_document(), "voiced");
        assert_eq!(round.stage, PipelineStage::Buyers);
        assert_eq!(round.revision_notes, vec!["Tightened intro".to_string()]);
    }

    #[test]
    fn test_accept_all_only_promotes_pending() {
        let rejected = item(EditorPersona::Besci, 0)
            .apply(FeedbackDecision::Reject)
            .unwrap();
        let edited = item(EditorPersona::Clarity, 0)
            .apply(FeedbackDecision::Edit("mine".into()))
            .unwrap();
        let responded = item(EditorPersona::Clarity, 1)
            .apply(FeedbackDecision::Respond("keep the claim, cite it".into()))
            .unwrap();
        let round = RoundRecord::new(1, "doc").with_editor_feedback(vec![
            item(EditorPersona::Skeptic, 0),
            rejected,
            edited,
            responded,
        ]);
        assert_eq!(round.pending_count(), 1);

        let accepted = round.with_all_pending_accepted();
        let statuses: Vec<FeedbackStatus> =
            accepted.editor_feedback.iter().map(|i| i.status).collect();
        assert_eq!(
            statuses,
            vec![
                FeedbackStatus::Accepted,
                FeedbackStatus::Rejected,
                FeedbackStatus::Edited,
                FeedbackStatus::Responded,
            ]
        );
        assert_eq!(accepted.editor_feedback[2].user_edit.as_deref(), Some("mine"));
        assert_eq!(
            accepted.editor_feedback[3].user_response.as_deref(),
            Some("keep the claim, cite it")
        );
        assert_eq!(accepted.actionable_feedback().len(), 3);
        // the source record is untouched
        assert_eq!(round.pending_count(), 1);
    }

    #[test]
    fn test_with_feedback_item_keeps_order() {
        let round = RoundRecord::new(1, "doc").with_editor_feedback(vec![
            item(EditorPersona::Skeptic, 0),
            item(EditorPersona::Skeptic, 1),
        ]);
        let triaged = round.editor_feedback[1]
            .apply(FeedbackDecision::Accept)
            .unwrap();

        let updated = round.with_feedback_item(triaged);
        assert_eq!(updated.editor_feedback[0].id, "skeptic-0");
        assert_eq!(updated.editor_feedback[1].status, FeedbackStatus::Accepted);
        assert_eq!(updated.find_feedback("skeptic-1").map(|i| i.status), Some(FeedbackStatus::Accepted));
    }

    #[test]
    fn test_stage_progression_through_builders() {
        let round = RoundRecord::new(2, "doc");
        assert_eq!(round.stage, PipelineStage::Draft);
        let round = round.with_editor_feedback(vec![]);
        assert_eq!(round.stage, PipelineStage::Review);
        let round = round.with_revision(vec![], revision("r"), voice("v"));
        let round = round.with_buyer_reactions(vec![]);
        assert_eq!(round.stage, PipelineStage::Synthesis);
        assert_eq!(round.round_number, 2);
    }

    #[test]
    fn test_round_wire_format() {
        let json = serde_json::to_value(RoundRecord::new(1, "doc")).unwrap();
        assert_eq!(json["roundNumber"], 1);
        assert_eq!(json["inputDocument"], "doc");
        assert_eq!(json["stage"], "draft");
        assert!(json.get("revisedDocument").is_none());
    }
}
