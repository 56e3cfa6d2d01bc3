//! Deterministic battlefield rules and data types shared across crates.
//!
//! `game-core` defines the canonical rules (board geometry, visibility,
//! pathfinding, intents, projectiles, turn sequencing) and exposes pure APIs
//! that can be reused by the runtime, tests, and offline tools. All state
//! mutation flows through [`engine::GameEngine`].
pub mod action;
pub mod board;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod pathfinding;
pub mod sight;
pub mod state;

pub use action::{
    ActionOutcome, ActionTransition, AttackAction, Intent, IntentError, IntentParseError,
    LegalIntents, MoveAction, QueuedIntent, SpeakAction, legal_intents,
};
pub use board::{Board, Point};
pub use combat::ProjectileOutcome;
pub use config::GameConfig;
pub use engine::{EngineEvent, GameEngine, TickReport, TurnError, TurnPhase};
pub use env::{PcgRng, RngOracle, SeedStream, compute_seed};
pub use error::{ErrorSeverity, GameError};
pub use pathfinding::{find_path, reachable_cells};
pub use sight::{compute_sight, compute_visible_cells, line_of_sight, refresh_agent_sight};
pub use state::{
    AgentState, Animation, EffectKind, EntityId, EntityKind, EntityRef, GameState,
    HistoricEntry, InitializationError, LastSeen, Message, ObstacleState, OccupancyViolation,
    Position, Projectile, TargetState, Team, TransientEffect, TurnState,
};
