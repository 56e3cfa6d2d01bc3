use super::{EntityId, Position};
use crate::board::Point;

/// A bullet in flight.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projectile {
    pub id: EntityId,
    pub shooter: EntityId,
    pub origin: Position,
    pub target: Position,
    /// Distance covered from the centre of `origin`.
    pub travelled: f64,
    pub position: Point,
}

impl Projectile {
    pub fn new(id: EntityId, shooter: EntityId, origin: Position, target: Position) -> Self {
        Self {
            id,
            shooter,
            origin,
            target,
            travelled: 0.0,
            position: Point::from(origin),
        }
    }

    /// Full flight length from origin to target.
    pub fn length(&self) -> f64 {
        Point::from(self.origin).distance(Point::from(self.target))
    }
}

/// Visual-only effect that decays one step per engine tick.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransientEffect {
    pub kind: EffectKind,
    pub remaining_ticks: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// An agent or target was hit.
    Shake { entity: EntityId },
    /// A message travelled between two cells.
    Connection { from: Position, to: Position },
}

/// Resolution step currently running. At most one exists at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Animation {
    /// The agent is walking the remainder of its path.
    Moving { agent: EntityId },
    /// A projectile is travelling.
    Projectile { id: EntityId },
}
