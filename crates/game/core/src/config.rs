/// Game configuration constants and tunable parameters.
///
/// Every rule that the simulation consults lives here so a match can be
/// replayed exactly from `(GameConfig, seed, intents)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Half-width of the board; cells span `[-board_size, board_size]` on both axes.
    pub board_size: i32,
    /// Number of agents spawned for each team.
    pub agents_per_team: u8,
    /// Action slots available to the active agent before the turn passes.
    pub actions_per_turn: u8,
    /// Obstacles scattered over the board at generation time.
    pub obstacle_count: u16,
    /// Half-width of the square around a team's target where its agents spawn.
    pub spawn_range: i32,
    /// Manhattan radius (inclusive) within which entities can be observed.
    pub sight_range: u32,
    /// Starting life of every agent.
    pub agent_life: i32,
    /// Starting life of every target.
    pub target_life: i32,
    /// Life removed by a projectile hit.
    pub bullet_damage: i32,
    /// Board units a projectile travels per tick.
    pub bullet_speed: f64,
    /// Ray-march step used by the visibility engine, in board units.
    pub ray_step: f64,
    /// Longest path a single move may take. `None` means unlimited.
    pub move_range: Option<u32>,
    /// Radius used when enumerating move suggestions for decision providers.
    pub suggested_move_radius: u32,
    /// Ticks a hit entity keeps its shake effect.
    pub shake_ticks: u32,
    /// Ticks a speak connection stays visible.
    pub connection_ticks: u32,
}

impl GameConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BOARD_SIZE: i32 = 10;
    pub const DEFAULT_AGENTS_PER_TEAM: u8 = 5;
    pub const DEFAULT_ACTIONS_PER_TURN: u8 = 4;
    pub const DEFAULT_OBSTACLE_COUNT: u16 = 50;
    pub const DEFAULT_SPAWN_RANGE: i32 = 3;
    pub const DEFAULT_SIGHT_RANGE: u32 = 10;
    pub const DEFAULT_AGENT_LIFE: i32 = 100;
    pub const DEFAULT_TARGET_LIFE: i32 = 200;
    pub const DEFAULT_BULLET_DAMAGE: i32 = 25;
    pub const DEFAULT_BULLET_SPEED: f64 = 0.2;
    pub const DEFAULT_RAY_STEP: f64 = 0.1;
    pub const DEFAULT_SUGGESTED_MOVE_RADIUS: u32 = 3;
    pub const DEFAULT_SHAKE_TICKS: u32 = 30;
    pub const DEFAULT_CONNECTION_TICKS: u32 = 120;

    pub fn new() -> Self {
        Self {
            board_size: Self::DEFAULT_BOARD_SIZE,
            agents_per_team: Self::DEFAULT_AGENTS_PER_TEAM,
            actions_per_turn: Self::DEFAULT_ACTIONS_PER_TURN,
            obstacle_count: Self::DEFAULT_OBSTACLE_COUNT,
            spawn_range: Self::DEFAULT_SPAWN_RANGE,
            sight_range: Self::DEFAULT_SIGHT_RANGE,
            agent_life: Self::DEFAULT_AGENT_LIFE,
            target_life: Self::DEFAULT_TARGET_LIFE,
            bullet_damage: Self::DEFAULT_BULLET_DAMAGE,
            bullet_speed: Self::DEFAULT_BULLET_SPEED,
            ray_step: Self::DEFAULT_RAY_STEP,
            move_range: None,
            suggested_move_radius: Self::DEFAULT_SUGGESTED_MOVE_RADIUS,
            shake_ticks: Self::DEFAULT_SHAKE_TICKS,
            connection_ticks: Self::DEFAULT_CONNECTION_TICKS,
        }
    }

    pub fn with_board_size(mut self, board_size: i32) -> Self {
        self.board_size = board_size;
        self
    }

    pub fn with_sight_range(mut self, sight_range: u32) -> Self {
        self.sight_range = sight_range;
        self
    }

    pub fn with_actions_per_turn(mut self, actions_per_turn: u8) -> Self {
        self.actions_per_turn = actions_per_turn;
        self
    }

    pub fn with_move_range(mut self, move_range: Option<u32>) -> Self {
        self.move_range = move_range;
        self
    }

    /// Returns the board described by this configuration.
    pub fn board(&self) -> crate::board::Board {
        crate::board::Board::new(self.board_size)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
