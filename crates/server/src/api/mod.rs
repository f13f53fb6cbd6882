pub mod agent;

pub use agent::agent_routes;
