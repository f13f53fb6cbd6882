//! # Agent Relay API
//!
//! `POST /api/agent` forwards one agent request to the configured gateway so
//! browser clients never hold the upstream API key.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use redline_core::gateway::{AgentGateway, AgentRequest, GatewayError};

use crate::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    credential: bool,
}

pub fn agent_routes() -> Router<AppState> {
    Router::new()
        .route("/api/agent", post(invoke_agent))
        .route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        credential: state.has_credential,
    })
}

/// Relay one agent call; transport failures keep the upstream status
async fn invoke_agent(
    State(state): State<AppState>,
    Json(request): Json<AgentRequest>,
) -> Response {
    let agent = request.agent.clone();

    match state.gateway.invoke(request).await {
        Ok(value) => Json(value).into_response(),
        Err(err) => {
            let status = error_status(&err);
            tracing::warn!(agent = %agent, status = status.as_u16(), error = %err, "Agent relay failed");
            (status, Json(json!({ "error": err.to_string() }))).into_response()
        }
    }
}

fn error_status(err: &GatewayError) -> StatusCode {
    err.status()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Echoes the agent id or fails the way it is told to
    struct StubGateway;

    #[async_trait]
    impl AgentGateway for StubGateway {
        async fn invoke(&self, request: AgentRequest) -> Result<Value, GatewayError> {
            match request.agent.as_str() {
                "overloaded" => Err(GatewayError::Transport {
                    status: 529,
                    message: "Overloaded".into(),
                }),
                "unparseable" => Err(GatewayError::NoTextContent),
                "keyless" => Err(GatewayError::MissingCredential {
                    env: "ANTHROPIC_API_KEY",
                }),
                _ => Ok(json!({ "agent": request.agent, "goal": request.goal })),
            }
        }
    }

    fn app() -> Router {
        agent_routes().with_state(AppState {
            gateway: Arc::new(StubGateway),
            has_credential: true,
        })
    }

    async fn post_agent(agent: &str) -> (StatusCode, Value) {
        let body = json!({
            "agent": agent,
            "systemPrompt": "You are a test",
            "document": "Doc",
            "goal": "Ship it"
        });
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/agent")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_success_returns_parsed_json() {
        let (status, body) = post_agent("skeptic").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["agent"], "skeptic");
        assert_eq!(body["goal"], "Ship it");
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_upstream_status() {
        let (status, body) = post_agent("overloaded").await;
        assert_eq!(status.as_u16(), 529);
        assert_eq!(body["error"], "API call failed: 529 Overloaded");
    }

    #[tokio::test]
    async fn test_other_failures_are_internal_errors() {
        let (status, body) = post_agent("unparseable").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "No text content in response");

        let (status, body) = post_agent("keyless").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "ANTHROPIC_API_KEY not configured");
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["credential"], true);
    }
}
