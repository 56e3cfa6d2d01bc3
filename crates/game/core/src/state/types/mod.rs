pub mod common;
pub mod entities;
pub mod projectile;
pub mod turn;

pub use common::{EntityId, EntityKind, EntityRef, Position, Team};
pub use entities::{AgentState, HistoricEntry, LastSeen, Message, ObstacleState, TargetState};
pub use projectile::{Animation, EffectKind, Projectile, TransientEffect};
pub use turn::TurnState;
