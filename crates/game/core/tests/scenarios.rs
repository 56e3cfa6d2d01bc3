use game_core::{
    Board, EngineEvent, EntityId, EntityRef, GameConfig, GameEngine, GameState, Intent,
    IntentError, Position, Team, TurnPhase, compute_sight, legal_intents,
};

const MAX_SETTLE: usize = 10_000;

/// Tracks `(active, actions_taken)` across ticks and asserts the turn rules.
#[derive(Default)]
struct TurnWatch {
    last: Option<(Option<EntityId>, u8)>,
    turn_changes: usize,
}

impl TurnWatch {
    fn observe(&mut self, state: &GameState, config: &GameConfig) {
        state
            .check_occupancy()
            .unwrap_or_else(|violation| panic!("occupancy violated: {violation}"));
        let current = (state.turn.active, state.turn.actions_taken);
        assert!(current.1 <= config.actions_per_turn);
        if let Some(active) = state.turn.active {
            assert!(state.agent(active).is_some_and(|a| a.is_alive()) || state.winner.is_some());
        }

        if let Some((active, taken)) = self.last {
            if active == current.0 {
                assert!(current.1 >= taken, "slots went backwards within a turn");
            } else {
                assert_eq!(current.1, 0, "slots must reset on agent change");
                self.turn_changes += 1;
            }
        }
        self.last = Some(current);
    }
}

/// Plays `decisions` decisions with a greedy policy: attack the first visible
/// enemy, else take the first legal move, else shoot wild.
fn play(state: &mut GameState, config: &GameConfig, decisions: usize) -> TurnWatch {
    let mut watch = TurnWatch::default();
    let mut engine = GameEngine::new(state, config);

    for _ in 0..decisions {
        watch.observe(engine.state(), config);
        if engine.phase() == TurnPhase::GameOver {
            break;
        }
        let Some(active) = engine.state().turn.active else {
            break;
        };

        let legal = legal_intents(engine.state(), active, config);
        let intent = legal
            .attacks
            .first()
            .map(|cell| Intent::Attack(Some(*cell)))
            .or_else(|| legal.moves.first().map(|cell| Intent::Move(*cell)))
            .unwrap_or(Intent::Attack(None));
        engine.submit(intent, None).expect("slot available");

        for _ in 0..MAX_SETTLE {
            let report = engine.tick();
            watch.observe(engine.state(), config);
            if matches!(report.phase, TurnPhase::WaitingForInput | TurnPhase::GameOver) {
                break;
            }
        }
    }
    watch
}

#[test]
fn identical_inputs_yield_identical_worlds() {
    let config = GameConfig::default();
    let mut a = GameState::generate(&config, 2024).expect("generate");
    let mut b = GameState::generate(&config, 2024).expect("generate");

    play(&mut a, &config, 60);
    play(&mut b, &config, 60);
    assert_eq!(a, b);
}

#[test]
fn occupancy_and_turn_rules_hold_over_a_long_match() {
    let config = GameConfig::default();
    for seed in [1, 17, 404] {
        let mut state = GameState::generate(&config, seed).expect("generate");
        let watch = play(&mut state, &config, 200);
        assert!(watch.turn_changes > 0 || state.winner.is_some());
    }
}

#[test]
fn move_detours_around_center_obstacle() {
    let config = GameConfig::default();
    let mut state = GameState::empty(Board::new(10), 0);
    state.add_obstacle(Position::ORIGIN).expect("obstacle");
    let mover = state
        .add_agent(Team::Red, Position::new(-2, 0), 100)
        .expect("mover");

    let mut engine = GameEngine::new(&mut state, &config);
    engine.reset_turn_order();
    engine
        .submit(Intent::Move(Position::new(2, 0)), None)
        .expect("queued");
    let events = engine.settle(MAX_SETTLE);

    let mut visited = Vec::new();
    for event in &events {
        match event {
            EngineEvent::ActionResolved {
                outcome: game_core::ActionOutcome::Moved { to, .. },
                ..
            } => visited.push(*to),
            EngineEvent::AgentMoved { to, .. } => visited.push(*to),
            _ => {}
        }
    }

    // Manhattan distance 4 plus the two cells needed to step around (0, 0).
    assert_eq!(visited.len(), 6);
    assert!(!visited.contains(&Position::ORIGIN));
    assert_eq!(visited.last(), Some(&Position::new(2, 0)));
    assert_eq!(
        engine.state().agent(mover).map(|a| a.position),
        Some(Position::new(2, 0))
    );
    assert_eq!(engine.state().turn.actions_taken, 1);
}

#[test]
fn obstacle_on_the_line_hides_the_target() {
    let config = GameConfig::default();
    let mut state = GameState::empty(Board::new(10), 0);
    let observer = state
        .add_agent(Team::Red, Position::ORIGIN, 100)
        .expect("observer");
    let obstacle = state.add_obstacle(Position::new(2, 0)).expect("obstacle");
    let target = state
        .add_target(Team::Blue, Position::new(4, 0), 200)
        .expect("target");

    assert!(!compute_sight(&state, observer, &config).contains(&EntityRef::target(target)));

    if let Some(o) = state.obstacles.iter_mut().find(|o| o.id == obstacle) {
        o.position = Position::new(2, 2);
    }
    assert!(compute_sight(&state, observer, &config).contains(&EntityRef::target(target)));
}

/// red_0, blue_0, red_1, blue_1 on an open board.
fn skirmish(blue_0_life: i32) -> (GameState, [EntityId; 4]) {
    let mut state = GameState::empty(Board::new(10), 9);
    let red_0 = state
        .add_agent(Team::Red, Position::new(0, 0), 100)
        .expect("red_0");
    let blue_0 = state
        .add_agent(Team::Blue, Position::new(3, 0), blue_0_life)
        .expect("blue_0");
    let red_1 = state
        .add_agent(Team::Red, Position::new(-6, 6), 100)
        .expect("red_1");
    let blue_1 = state
        .add_agent(Team::Blue, Position::new(6, -6), 100)
        .expect("blue_1");
    (state, [red_0, blue_0, red_1, blue_1])
}

#[test]
fn shot_at_visible_enemy_removes_exact_damage() {
    let config = GameConfig::default();
    let (mut state, [_, blue_0, ..]) = skirmish(100);
    let mut engine = GameEngine::new(&mut state, &config);
    engine.reset_turn_order();

    engine
        .submit(Intent::Attack(Some(Position::new(3, 0))), None)
        .expect("queued");
    let events = engine.settle(MAX_SETTLE);

    assert!(events.iter().any(|e| matches!(
        e,
        EngineEvent::ProjectileResolved { outcome: game_core::ProjectileOutcome::Hit { .. }, .. }
    )));
    assert_eq!(
        engine.state().agent(blue_0).map(|a| a.life),
        Some(config.agent_life - config.bullet_damage)
    );
    assert!(engine.state().projectiles.is_empty());
}

#[test]
fn eliminated_agent_leaves_the_turn_rotation() {
    let config = GameConfig::default().with_actions_per_turn(1);
    let (mut state, [red_0, blue_0, red_1, blue_1]) = skirmish(25);
    let mut engine = GameEngine::new(&mut state, &config);
    engine.reset_turn_order();
    assert_eq!(engine.state().turn.order, vec![red_0, blue_0, red_1, blue_1]);

    engine
        .submit(Intent::Attack(Some(Position::new(3, 0))), None)
        .expect("queued");
    let events = engine.settle(MAX_SETTLE);

    assert!(events.contains(&EngineEvent::AgentEliminated {
        agent: blue_0,
        team: Team::Blue
    }));
    assert_eq!(engine.state().agent(blue_0).map(|a| a.life), Some(0));
    assert_eq!(engine.state().winner, None);
    assert_eq!(engine.state().turn.active, Some(red_1));

    // A full rotation never hands blue_0 the turn again.
    for _ in 0..6 {
        engine.forfeit_action().expect("forfeit");
        engine.settle(MAX_SETTLE);
        assert_ne!(engine.state().turn.active, Some(blue_0));
    }
}

#[test]
fn wiping_out_blue_hands_red_the_win() {
    let config = GameConfig::default();
    let (mut state, [_, blue_0, _, blue_1]) = skirmish(25);
    if let Some(agent) = state.agent_mut(blue_1) {
        agent.life = 0;
    }
    let mut engine = GameEngine::new(&mut state, &config);
    engine.reset_turn_order();

    engine
        .submit(Intent::Attack(Some(Position::new(3, 0))), None)
        .expect("queued");
    engine
        .submit(Intent::Move(Position::new(0, 1)), None)
        .expect("queued");
    let events = engine.settle(MAX_SETTLE);

    assert!(events.contains(&EngineEvent::GameOver { winner: Team::Red }));
    assert_eq!(engine.state().winner, Some(Team::Red));
    assert_eq!(engine.phase(), TurnPhase::GameOver);
    assert!(engine.state().pending.is_empty());
    assert_eq!(engine.state().agent(blue_0).map(|a| a.life), Some(0));
    assert_eq!(
        engine.submit(Intent::Attack(None), None),
        Err(IntentError::GameOver)
    );
}

#[test]
fn destroyed_target_ends_the_game_despite_survivors() {
    let config = GameConfig::default().with_actions_per_turn(1);
    let mut state = GameState::empty(Board::new(10), 3);
    state
        .add_agent(Team::Red, Position::new(-5, -5), 100)
        .expect("red");
    state
        .add_agent(Team::Blue, Position::new(0, 0), 100)
        .expect("blue");
    state
        .add_target(Team::Red, Position::new(3, 0), 25)
        .expect("red target");
    state
        .add_target(Team::Blue, Position::new(-8, 8), 200)
        .expect("blue target");

    let mut engine = GameEngine::new(&mut state, &config);
    engine.reset_turn_order();
    engine.forfeit_action().expect("red passes");
    engine.settle(MAX_SETTLE);

    engine
        .submit(Intent::Attack(Some(Position::new(3, 0))), None)
        .expect("queued");
    engine.settle(MAX_SETTLE);

    assert_eq!(engine.state().winner, Some(Team::Blue));
    assert!(engine.state().alive_agents(Team::Red).next().is_some());
}
