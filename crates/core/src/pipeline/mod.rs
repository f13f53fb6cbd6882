//! # Redline Pipeline
//!
//! Round orchestration: stages, the controller and its event stream.

pub mod controller;
pub mod events;
pub mod stage;

pub use controller::PipelineController;
pub use events::{PipelineEvent, PipelineEventKind};
pub use stage::PipelineStage;
