//! # Redline Core
//!
//! Round-based document refinement: three editor personas critique a draft,
//! a human triages the feedback, a reviser and a voice pass rewrite it, and
//! four buyer personas react to the result.
//!
//! ## Architecture
//!
//! - `pipeline/` - Stage machine, controller and event stream
//! - `skills/` - Typed agent wrappers (editors, revision, voice, buyers)
//! - `gateway/` - LLM transport: Anthropic Messages API or an HTTP relay
//! - `state/` - Rounds, feedback items and the published snapshot
//! - `models` - Model selection per agent
//! - `synthesis` - Word diff of a round's input against its final text
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use redline_core::gateway::AnthropicGateway;
//! use redline_core::models::AgentModels;
//! use redline_core::pipeline::PipelineController;
//!
//! let gateway = Arc::new(AnthropicGateway::from_env(AgentModels::default()));
//! let mut controller = PipelineController::new(gateway);
//! controller.start_pipeline(draft, Some("Win the renewal")).await?;
//! controller.let_it_cook(3).await?;
//! ```

pub mod error;
pub mod gateway;
pub mod models;
pub mod pipeline;
pub mod skills;
pub mod state;
pub mod synthesis;

pub use error::PipelineError;
pub use pipeline::{PipelineController, PipelineStage};
pub use state::PipelineState;
