pub mod feedback;
pub mod pipeline_state;
pub mod round;
pub mod store;

pub use feedback::{feedback_id, FeedbackDecision, FeedbackItem, FeedbackStatus, Severity};
pub use pipeline_state::PipelineState;
pub use round::{BuyerReaction, RoundRecord};
pub use store::RoundStore;
