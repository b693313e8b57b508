use std::cell::RefCell;
use std::rc::Rc;

use crate::actor::{Actor, ActorId, BaseStats};
use crate::battle::engine::{Battle, BattleBuilder};
use crate::battle::interfaces::{Playback, PresentationSink};
use crate::battle::phase::AnimationCue;
use crate::battle::state::{BattleEvent, TurnRng};
use crate::battle::turn_orchestrator::BattleAction;
use crate::config::{EngineConfig, EngineOptions};
use crate::errors::{BattleResult, ConfigResult};
use schema::{Move, PokemonType, Side, StatusCondition};

/// A builder for test actors with flat, easy-to-compute stats.
///
/// Defaults: level 50, Normal type, 200 HP and 50 in every other stat,
/// knows Tackle.
///
/// # Example
/// ```ignore
/// let actor = TestActorBuilder::new(1, Side::Player)
///     .with_moves(vec![Move::SolarBeam])
///     .with_speed(100)
///     .build();
/// ```
pub struct TestActorBuilder {
    id: u32,
    side: Side,
    level: u8,
    types: Vec<PokemonType>,
    stats: BaseStats,
    moves: Vec<Move>,
    current_hp: Option<u16>,
    status: Option<StatusCondition>,
}

impl TestActorBuilder {
    pub fn new(id: u32, side: Side) -> Self {
        Self {
            id,
            side,
            level: 50,
            types: vec![PokemonType::Normal],
            stats: BaseStats {
                hp: 200,
                attack: 50,
                defense: 50,
                special_attack: 50,
                special_defense: 50,
                speed: 50,
            },
            moves: vec![Move::Tackle],
            current_hp: None,
            status: None,
        }
    }

    pub fn with_moves(mut self, moves: Vec<Move>) -> Self {
        self.moves = moves;
        self
    }

    pub fn with_types(mut self, types: Vec<PokemonType>) -> Self {
        self.types = types;
        self
    }

    pub fn with_speed(mut self, speed: u16) -> Self {
        self.stats.speed = speed;
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    pub fn build(self) -> Actor {
        let mut actor = Actor::new(
            ActorId(self.id),
            format!("{:?}{}", self.side, self.id),
            self.side,
            self.level,
            self.types,
            self.stats,
            self.moves,
        );
        if let Some(hp) = self.current_hp {
            actor.hp = hp;
        }
        actor.status = self.status;
        actor
    }
}

/// A battle builder over the built-in tables with strict invariants and a
/// predictable rng.
pub fn test_battle() -> BattleBuilder {
    let config = assert_config(EngineConfig::builtin());
    let options = EngineOptions {
        strict_invariants: Some(true),
        ..config.options.clone()
    };
    assert_config(BattleBuilder::from_config(&config))
        .battle_id("test_battle")
        .options(options)
        .rng(predictable_rng())
}

/// Creates a standard 1v1 battle from two actors.
pub fn create_test_battle(player: Actor, enemy: Actor) -> Battle {
    assert_config(test_battle().actor(player).actor(enemy).build())
}

/// Creates a `TurnRng` instance with a long list of default values (50).
/// Every move with 50% or better accuracy hits.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

pub fn use_move(move_id: Move, target: u32) -> BattleAction {
    BattleAction::UseMove {
        move_id,
        targets: vec![ActorId(target)],
    }
}

/// Submits one action per listed actor.
pub fn submit_all(battle: &mut Battle, actions: Vec<(u32, BattleAction)>) {
    for (id, action) in actions {
        assert_ok(battle.submit_action(ActorId(id), action));
    }
}

pub fn count_events(events: &[BattleEvent], predicate: impl Fn(&BattleEvent) -> bool) -> usize {
    events.iter().filter(|event| predicate(event)).count()
}

/// Presenter that asks the engine to wait for every animation and keeps a
/// log of what it was asked to play.
#[derive(Clone, Default)]
pub struct AwaitingPresenter {
    pub played: Rc<RefCell<Vec<AnimationCue>>>,
}

impl PresentationSink for AwaitingPresenter {
    fn animate(&mut self, cue: &AnimationCue) -> Playback {
        self.played.borrow_mut().push(cue.clone());
        Playback::AwaitCompletion
    }
}

/// Helper function to assert that a Result is Ok and return the value.
/// Provides clear error messages in tests when functions unexpectedly fail.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}

pub fn assert_config<T>(result: ConfigResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected valid configuration but got error: {}", err),
    }
}
