//! Decision providers and the agent brief they consume.

pub mod context;
mod heuristic;
mod http;
mod scripted;

pub use context::{AgentBrief, ContactBrief, SightingBrief, TargetBrief};
pub use heuristic::HeuristicDecisionProvider;
pub use http::HttpDecisionProvider;
pub use scripted::ScriptedDecisionProvider;
