//! Projectile flight and collision resolution.
//!
//! Each step advances a projectile `bullet_speed` units toward its target
//! cell, snapping onto the target once less than one step remains, then tests
//! the new point against every cell box: living agents (except whoever stands
//! on the firing cell), then targets, then obstacles. The first match wins.
//!
//! # Core Functions
//!
//! - `step_projectile`: advance one projectile by one tick
//! - `find_collision`: first entity whose cell box contains a point
//! - `apply_damage`: life reduction (clamped to 0) plus shake effect

use crate::board::Point;
use crate::config::GameConfig;
use crate::state::{
    EffectKind, EntityId, EntityKind, EntityRef, GameState, Position, TransientEffect,
};

/// Result of advancing a projectile by one tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProjectileOutcome {
    /// Still in flight.
    Traveling { position: Point },
    /// Struck an agent or target.
    Hit {
        entity: EntityRef,
        damage: i32,
        remaining_life: i32,
        eliminated: bool,
    },
    /// Stopped by an obstacle.
    Blocked { obstacle: EntityId },
    /// Reached the target cell without touching anything.
    Arrived { cell: Position },
}

impl ProjectileOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProjectileOutcome::Traveling { .. })
    }
}

/// First entity whose cell box contains `point`.
///
/// Agents standing on `origin` are skipped so a shot never hits its shooter
/// at the moment of firing.
pub fn find_collision(state: &GameState, origin: Position, point: Point) -> Option<EntityRef> {
    let agent = state
        .agents
        .iter()
        .filter(|a| a.is_alive() && a.position != origin)
        .find(|a| point.in_cell(a.position))
        .map(|a| EntityRef::agent(a.id));
    let target = || {
        state
            .targets
            .iter()
            .filter(|t| t.is_alive())
            .find(|t| point.in_cell(t.position))
            .map(|t| EntityRef::target(t.id))
    };
    let obstacle = || {
        state
            .obstacles
            .iter()
            .find(|o| point.in_cell(o.position))
            .map(|o| EntityRef::obstacle(o.id))
    };
    agent.or_else(target).or_else(obstacle)
}

/// Removes `damage` life from an agent or target and makes it shake.
///
/// Returns the remaining life and whether the hit destroyed the entity, or
/// `None` for obstacles and unknown ids.
pub fn apply_damage(
    state: &mut GameState,
    entity: EntityRef,
    damage: i32,
    config: &GameConfig,
) -> Option<(i32, bool)> {
    let life = match entity.kind {
        EntityKind::Agent => {
            let agent = state.agent_mut(entity.id)?;
            agent.life = (agent.life - damage).max(0);
            if !agent.is_alive() {
                agent.path.clear();
                agent.thinking = false;
            }
            agent.life
        }
        EntityKind::Target => {
            let target = state.targets.iter_mut().find(|t| t.id == entity.id)?;
            target.life = (target.life - damage).max(0);
            target.life
        }
        EntityKind::Obstacle => return None,
    };

    state.effects.push(TransientEffect {
        kind: EffectKind::Shake { entity: entity.id },
        remaining_ticks: config.shake_ticks,
    });
    Some((life, life <= 0))
}

/// Advances projectile `id` by one tick and resolves any collision.
///
/// Terminal outcomes remove the projectile. Returns `None` when no projectile
/// with that id is in flight.
pub fn step_projectile(
    state: &mut GameState,
    id: EntityId,
    config: &GameConfig,
) -> Option<ProjectileOutcome> {
    let index = state.projectiles.iter().position(|p| p.id == id)?;

    let projectile = &mut state.projectiles[index];
    let length = projectile.length();
    let arrived = length - projectile.travelled <= config.bullet_speed;
    if arrived {
        projectile.travelled = length;
        projectile.position = Point::from(projectile.target);
    } else {
        projectile.travelled += config.bullet_speed;
        projectile.position = Point::from(projectile.origin)
            .toward(Point::from(projectile.target), projectile.travelled);
    }
    let (origin, target, position) = (projectile.origin, projectile.target, projectile.position);

    let outcome = match find_collision(state, origin, position) {
        Some(entity) if entity.kind == EntityKind::Obstacle => ProjectileOutcome::Blocked {
            obstacle: entity.id,
        },
        Some(entity) => {
            let damage = config.bullet_damage;
            let (remaining_life, eliminated) =
                apply_damage(state, entity, damage, config).unwrap_or((0, false));
            ProjectileOutcome::Hit {
                entity,
                damage,
                remaining_life,
                eliminated,
            }
        }
        None if arrived => ProjectileOutcome::Arrived { cell: target },
        None => ProjectileOutcome::Traveling { position },
    };

    if outcome.is_terminal() {
        state.projectiles.retain(|p| p.id != id);
    }
    Some(outcome)
}
