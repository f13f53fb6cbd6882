//! # Feedback Items
//!
//! Editor critique points and their triage sub-machine:
//! `pending -> {accepted, rejected, edited, responded}`. All targets are terminal.

use crate::error::PipelineError;
use crate::skills::{EditorFinding, EditorPersona};
use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Display grouping for feedback; no numeric meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    const NAMES: &'static [&'static str] = &["high", "medium", "low"];
}

// models capitalize freely ("High", "MEDIUM")
impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(de::Error::unknown_variant(&raw, Self::NAMES)),
        }
    }
}

/// Triage status of a feedback item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    /// Accepted with the author's own wording
    Edited,
    /// Accepted with an author reply for the reviser
    Responded,
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Edited => "edited",
            Self::Responded => "responded",
        }
    }

    /// Statuses that flow into revision
    pub fn is_actionable(&self) -> bool {
        matches!(self, Self::Accepted | Self::Edited | Self::Responded)
    }
}

impl fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A human triage decision on one pending item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "text", rename_all = "snake_case")]
pub enum FeedbackDecision {
    Accept,
    Reject,
    /// Accept, replacing the suggestion with the author's text
    Edit(String),
    /// Accept, with a reply the reviser should take into account
    Respond(String),
}

/// One critique point from one editor persona
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackItem {
    /// `<editor>-<index>`, unique within a round
    pub id: String,
    pub editor: EditorPersona,
    pub location: String,
    pub issue: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub severity: Severity,
    #[serde(default)]
    pub status: FeedbackStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_edit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_response: Option<String>,
}

/// Id of the `index`-th item in one editor's result list
pub fn feedback_id(editor: EditorPersona, index: usize) -> String {
    format!("{}-{}", editor.as_str(), index)
}

impl FeedbackItem {
    /// Create a pending item
    pub fn new(
        editor: EditorPersona,
        index: usize,
        location: impl Into<String>,
        issue: impl Into<String>,
        suggestion: Option<String>,
        severity: Severity,
    ) -> Self {
        Self {
            id: feedback_id(editor, index),
            editor,
            location: location.into(),
            issue: issue.into(),
            suggestion,
            severity,
            status: FeedbackStatus::Pending,
            user_edit: None,
            user_response: None,
        }
    }

    /// Lift an editor's finding into a pending item
    pub fn from_finding(editor: EditorPersona, index: usize, finding: EditorFinding) -> Self {
        Self::new(
            editor,
            index,
            finding.location,
            finding.issue,
            finding.suggestion,
            finding.severity,
        )
    }

    pub fn is_pending(&self) -> bool {
        self.status == FeedbackStatus::Pending
    }

    pub fn is_actionable(&self) -> bool {
        self.status.is_actionable()
    }

    /// Apply a triage decision, producing the triaged item.
    pub fn apply(&self, decision: FeedbackDecision) -> Result<Self, PipelineError> {
        if !self.is_pending() {
            return Err(PipelineError::FeedbackAlreadyTriaged {
                id: self.id.clone(),
                status: self.status,
            });
        }

        let mut next = self.clone();
        match decision {
            FeedbackDecision::Accept => next.status = FeedbackStatus::Accepted,
            FeedbackDecision::Reject => next.status = FeedbackStatus::Rejected,
            FeedbackDecision::Edit(text) => {
                next.status = FeedbackStatus::Edited;
                next.user_edit = Some(text);
            }
            FeedbackDecision::Respond(text) => {
                next.status = FeedbackStatus::Responded;
                next.user_response = Some(text);
            }
        }
        Ok(next)
    }

    /// `pending -> accepted`; other statuses are returned unchanged
    pub fn accepted_if_pending(&self) -> Self {
        if self.is_pending() {
            Self {
                status: FeedbackStatus::Accepted,
                ..self.clone()
            }
        } else {
            self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ignores_case() {
        let parsed: Vec<Severity> =
            serde_json::from_str(r#"["High", "MEDIUM", "low", " Low "]"#).unwrap();
        assert_eq!(
            parsed,
            vec![Severity::High, Severity::Medium, Severity::Low, Severity::Low]
        );
        assert!(serde_json::from_str::<Severity>(r#""urgent""#).is_err());
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), r#""high""#);
    }

    fn pending() -> FeedbackItem {
        FeedbackItem::new(
            EditorPersona::Skeptic,
            3,
            "Opening line",
            "Overclaims",
            Some("Soften".into()),
            Severity::Medium,
        )
    }

    #[test]
    fn test_new_item_is_pending_with_editor_scoped_id() {
        let item = pending();
        assert_eq!(item.id, "skeptic-3");
        assert!(item.is_pending());
        assert!(!item.is_actionable());
    }

    #[test]
    fn test_decisions_reach_terminal_states() {
        let accepted = pending().apply(FeedbackDecision::Accept).unwrap();
        assert_eq!(accepted.status, FeedbackStatus::Accepted);

        let rejected = pending().apply(FeedbackDecision::Reject).unwrap();
        assert_eq!(rejected.status, FeedbackStatus::Rejected);
        assert!(!rejected.is_actionable());

        let edited = pending()
            .apply(FeedbackDecision::Edit("Say 'may' instead".into()))
            .unwrap();
        assert_eq!(edited.status, FeedbackStatus::Edited);
        assert_eq!(edited.user_edit.as_deref(), Some("Say 'may' instead"));
        assert!(edited.user_response.is_none());

        let responded = pending()
            .apply(FeedbackDecision::Respond("We have data for this".into()))
            .unwrap();
        assert_eq!(responded.status, FeedbackStatus::Responded);
        assert!(responded.is_actionable());
    }

    #[test]
    fn test_terminal_states_cannot_be_triaged_again() {
        let rejected = pending().apply(FeedbackDecision::Reject).unwrap();
        let err = rejected.apply(FeedbackDecision::Accept).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::FeedbackAlreadyTriaged {
                status: FeedbackStatus::Rejected,
                ..
            }
        ));
    }

    #[test]
    fn test_accepted_if_pending_leaves_decided_items() {
        let rejected = pending().apply(FeedbackDecision::Reject).unwrap();
        assert_eq!(rejected.accepted_if_pending().status, FeedbackStatus::Rejected);
        assert_eq!(pending().accepted_if_pending().status, FeedbackStatus::Accepted);
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(pending()).unwrap();
        assert_eq!(json["editor"], "skeptic");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["severity"], "medium");
        assert!(json.get("userEdit").is_none());

        let decision: FeedbackDecision =
            serde_json::from_str(r#"{"decision":"edit","text":"tighter"}"#).unwrap();
        assert_eq!(decision, FeedbackDecision::Edit("tighter".into()));
    }
}
