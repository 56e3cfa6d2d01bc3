//! Runtime orchestration for the battlefield simulation.
//!
//! This crate wires the pure rules in `game-core` to an async world: a single
//! worker task owns the authoritative [`game_core::GameState`], clients talk to
//! it through [`RuntimeHandle`], and AI decisions are sourced from pluggable
//! [`DecisionProvider`] implementations bounded by a timeout.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`providers`] holds the decision provider implementations
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod providers;
pub mod runtime;

mod workers;

pub use api::{Decision, DecisionProvider, Result, RuntimeError, RuntimeHandle};
pub use events::{DecisionEvent, Event, EventBus, GameStateEvent, Topic, TurnEvent};
pub use providers::{
    AgentBrief, ContactBrief, HeuristicDecisionProvider, HttpDecisionProvider,
    ScriptedDecisionProvider, SightingBrief, TargetBrief,
};
pub use runtime::{ForfeitReason, RunSummary, Runtime, RuntimeBuilder, RuntimeConfig, StepOutcome};
