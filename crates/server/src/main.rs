//! Redline Server
//!
//! Axum relay in front of the Anthropic Messages API. Clients post agent
//! requests to `/api/agent`; the upstream key never leaves this process.

mod api;

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use axum::Router;
use clap::Parser;
use redline_core::gateway::{AgentGateway, AnthropicGateway};
use redline_core::models::{AgentModels, API_KEY_ENV};
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn AgentGateway>,
    pub has_credential: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Redline - agent relay for the document refinement pipeline")]
struct Args {
    /// Address to bind
    #[arg(long, env = "REDLINE_HOST", default_value = "127.0.0.1")]
    host: String,
    /// Port to listen on
    #[arg(short, long, env = "REDLINE_PORT", default_value = "8080")]
    port: u16,
    /// JSON file with global and per-agent model selection
    #[arg(long, env = "REDLINE_MODELS")]
    models: Option<PathBuf>,
    /// Model for every agent without an override
    #[arg(long, env = "REDLINE_MODEL")]
    model: Option<String>,
    #[arg(long)]
    max_tokens: Option<u32>,
    /// Messages API host (proxies, test servers)
    #[arg(long, env = "ANTHROPIC_BASE_URL")]
    base_url: Option<String>,
    /// Per-request upstream timeout
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl Args {
    /// File config first, then flag overrides on the global model
    fn agent_models(&self) -> anyhow::Result<AgentModels> {
        let mut models = match &self.models {
            Some(path) => AgentModels::load(path)?,
            None => AgentModels::default(),
        };
        if let Some(model) = &self.model {
            models.global.model = model.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            models.global.max_tokens = max_tokens;
        }
        if let Some(base_url) = &self.base_url {
            models.global.base_url = base_url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            models.global.timeout_secs = Some(secs);
        }
        Ok(models)
    }
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::fmt().with_env_filter(filter).with_target(false).init();
}

fn app(state: AppState) -> Router {
    api::agent_routes().with_state(state)
}

async fn run_server(args: Args) -> anyhow::Result<()> {
    let models = args.agent_models()?;
    let gateway = AnthropicGateway::from_env(models);
    let has_credential = gateway.has_credential();
    if !has_credential {
        tracing::warn!("{} not set; agent calls will fail until it is configured", API_KEY_ENV);
    }

    let state = AppState {
        gateway: Arc::new(gateway),
        has_credential,
    };

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Redline relay listening on http://{}", addr);
    tracing::info!("Routes: POST /api/agent, GET /health");

    axum::serve(listener, app(state)).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // a missing .env is fine
    let _ = dotenvy::dotenv();
    setup_logging();

    let args = Args::parse();
    run_server(args).await
}
