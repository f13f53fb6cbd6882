//! # Redline Models
//!
//! Centralized LLM configuration for the Agent Gateway.
//!
//! The gateway talks to the Anthropic Messages API. The API key is never part
//! of the serialized config; it is read from `ANTHROPIC_API_KEY` at the edge.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Environment variable holding the upstream API key
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Default Messages API host
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Pinned Messages API version header
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Default model for every agent
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Configuration for LLM model selection
///
/// Used by the gateway for every request. Per-agent overrides live in
/// [`AgentModels`].
///
/// ## Example
/// ```rust,ignore
/// use redline_core::models::ModelConfig;
///
/// let config = ModelConfig::default().with_base_url("http://localhost:4000");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    /// Model name (e.g., "claude-sonnet-4-20250514")
    pub model: String,
    /// Upper bound on generated tokens per call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Base URL of the Messages API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Value of the `anthropic-version` header
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Optional request timeout; `None` waits indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: default_max_tokens(),
            base_url: default_base_url(),
            api_version: default_api_version(),
            timeout_secs: None,
        }
    }
}

impl ModelConfig {
    /// Set base URL (for proxies and test servers)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Messages endpoint derived from the base URL
    pub fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }

    /// Read the API key from the environment.
    ///
    /// Empty values count as missing.
    pub fn api_key_from_env() -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

/// Model selection across agents: one global config plus per-agent overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AgentModels {
    /// Config used by every agent without an override
    #[serde(default)]
    pub global: ModelConfig,
    /// Per-agent model name overrides (agent_id -> model name)
    #[serde(default)]
    pub per_agent_models: HashMap<String, String>,
    /// Per-agent token limit overrides (agent_id -> max_tokens)
    #[serde(default)]
    pub per_agent_max_tokens: HashMap<String, u32>,
}

impl AgentModels {
    pub fn new(global: ModelConfig) -> Self {
        Self {
            global,
            ..Self::default()
        }
    }

    /// Override the model for one agent
    pub fn with_agent_model(mut self, agent_id: &str, model: impl Into<String>) -> Self {
        self.per_agent_models
            .insert(agent_id.to_string(), model.into());
        self
    }

    /// Load model selection from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse model config {}", path.display()))
    }

    /// Get model config for a specific agent: per-agent override -> global
    pub fn resolve(&self, agent_id: &str) -> ModelConfig {
        let mut config = self.global.clone();
        if let Some(model) = self.per_agent_models.get(agent_id) {
            config.model = model.clone();
        }
        if let Some(max_tokens) = self.per_agent_max_tokens.get(agent_id) {
            config.max_tokens = *max_tokens;
        }
        config
    }
}
