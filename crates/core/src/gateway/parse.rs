//! Two-tier extraction of structured JSON from model text.
//!
//! Tier one parses the whole text. Tier two parses the span from the first
//! `{` to the last `}`, which recovers answers wrapped in prose or code fences.

use super::GatewayError;
use serde_json::Value;

/// Extract a JSON value from raw model output.
pub fn extract_json(text: &str) -> Result<Value, GatewayError> {
    let strict = match serde_json::from_str::<Value>(text.trim()) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let Some(candidate) = brace_span(text) else {
        return Err(GatewayError::Parse {
            strict,
            fallback: None,
        });
    };

    tracing::debug!(
        candidate_len = candidate.len(),
        "Strict JSON parse failed, trying brace-matched span"
    );

    serde_json::from_str(candidate).map_err(|fallback| GatewayError::Parse {
        strict,
        fallback: Some(fallback),
    })
}

/// Greedy `{ ... }` span: first opening brace to last closing brace.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_parse() {
        let value = extract_json(r#"{"reaction": "fine", "questions": []}"#).unwrap();
        assert_eq!(value["reaction"], "fine");
    }

    #[test]
    fn test_fallback_strips_prose_and_fences() {
        let text = "Here you go:\n```json\n{\"feedback\": [{\"issue\": \"vague\"}]}\n```\nThanks!";
        let value = extract_json(text).unwrap();
        assert_eq!(value["feedback"][0]["issue"], "vague");
    }

    #[test]
    fn test_no_braces_reports_only_strict_failure() {
        match extract_json("I cannot help with that.") {
            Err(GatewayError::Parse { fallback, .. }) => assert!(fallback.is_none()),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_broken_span_reports_both_tiers() {
        match extract_json("prefix { not json } suffix") {
            Err(GatewayError::Parse { fallback, .. }) => assert!(fallback.is_some()),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_reversed_braces_are_not_a_span() {
        assert!(brace_span("} backwards {").is_none());
    }
}
