// Portfolio generation pipeline.
// Implements: prompt parsing, project cards, template rendering, model output validation,
// and the orchestrator that falls back to deterministic rendering.
// All model calls go through llm_client — no direct HTTP calls here.

pub mod agent;
pub mod cards;
pub mod model_output;
pub mod parser;
pub mod prompts;
pub mod record;
pub mod template;

// Re-export the public API consumed by the binary.
pub use agent::{AgentSettings, PortfolioAgent};
