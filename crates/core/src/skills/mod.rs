//! # Redline Skills
//!
//! Typed agent wrappers over the [`crate::gateway::AgentGateway`].
//!
//! ## Architecture
//!
//! ```text
//! Skill::run(gateway, persona, document, ...)
//!   └── llm_helpers::run_agent  (AgentRequest -> JSON -> typed output)
//!         └── AgentGateway::invoke
//! ```
//!
//! ## Skill Families
//!
//! - `EditorSkill` - skeptic, besci, clarity critique
//! - `RevisionSkill` - applies accepted feedback
//! - `VoiceSkill` - style normalization
//! - `BuyerSkill` - ceo, cpo, cro, head-cx reactions
//!
//! Wrappers hold no state and never retry.

pub mod agent_definitions;
pub mod error;
pub mod llm_helpers;
pub mod prompts;

pub mod buyer_skill;
pub mod editor_skill;
pub mod revision_skill;
pub mod voice_skill;

pub use agent_definitions::{AgentId, BuyerPersona, EditorPersona};
pub use buyer_skill::{BuyerOutput, BuyerSkill};
pub use editor_skill::{EditorFinding, EditorOutput, EditorSkill};
pub use error::AgentError;
pub use revision_skill::{RevisionOutput, RevisionSkill};
pub use voice_skill::{VoiceOutput, VoiceSkill};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{AgentGateway, AgentRequest, GatewayError};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Records requests and answers with a fixed result
    struct FixedGateway {
        answer: fn() -> Result<Value, GatewayError>,
        seen: Mutex<Vec<AgentRequest>>,
    }

    #[async_trait]
    impl AgentGateway for FixedGateway {
        async fn invoke(&self, request: AgentRequest) -> Result<Value, GatewayError> {
            self.seen.lock().unwrap().push(request);
            (self.answer)()
        }
    }

    #[tokio::test]
    async fn test_editor_skill_sends_persona_and_goal() {
        let gateway = FixedGateway {
            answer: || Ok(json!({"feedback": [{"location": "intro", "issue": "vague", "severity": "low"}]})),
            seen: Mutex::new(Vec::new()),
        };

        let output = EditorSkill::run(&gateway, EditorPersona::Clarity, "Doc", Some("Inform"))
            .await
            .unwrap();
        assert_eq!(output.feedback[0].issue, "vague");

        let seen = gateway.seen.lock().unwrap();
        assert_eq!(seen[0].agent, "clarity");
        assert_eq!(seen[0].goal.as_deref(), Some("Inform"));
        assert!(seen[0].system_prompt.contains("Clarity editor"));
    }

    #[tokio::test]
    async fn test_transport_failure_carries_wrapper_message() {
        let gateway = FixedGateway {
            answer: || {
                Err(GatewayError::Transport {
                    status: 500,
                    message: "Internal Server Error".into(),
                })
            },
            seen: Mutex::new(Vec::new()),
        };

        let err = BuyerSkill::run(&gateway, BuyerPersona::HeadCx, "Doc")
            .await
            .unwrap_err();
        assert_eq!(err.agent(), AgentId::Buyer(BuyerPersona::HeadCx));
        assert_eq!(
            err.to_string(),
            "Head of CX buyer agent failed: API call failed: 500 Internal Server Error"
        );
    }

    #[tokio::test]
    async fn test_wrong_shape_is_shape_error() {
        let gateway = FixedGateway {
            answer: || Ok(json!({"revised": "missing the right key"})),
            seen: Mutex::new(Vec::new()),
        };

        let err = RevisionSkill::run(&gateway, "Doc", &[], None).await.unwrap_err();
        assert!(matches!(err, AgentError::Shape { agent: AgentId::Revision, .. }));
        assert!(err.to_string().starts_with("Revision agent failed"));

        let seen = gateway.seen.lock().unwrap();
        assert_eq!(
            seen[0].additional_context.as_deref(),
            Some("ACCEPTED FEEDBACK TO ADDRESS:\n\n(none)")
        );
    }
}
