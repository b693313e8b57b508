//! Seams to the outside world: presentation and action input.

use crate::actor::Actor;
use crate::battle::phase::AnimationCue;
use crate::battle::state::{BattleEvent, BattleState};
use crate::battle::turn_orchestrator::BattleAction;
use crate::move_data::MoveSource;

/// How a presentation layer handles an animation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// Done already (or nothing to show); the phase continues.
    Instant,
    /// The phase suspends until `Battle::resume` reports completion.
    AwaitCompletion,
}

/// Receives animation requests and every emitted event.
pub trait PresentationSink {
    fn animate(&mut self, cue: &AnimationCue) -> Playback;

    fn announce(&mut self, _event: &BattleEvent) {}
}

/// Headless presenter: never waits, shows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl PresentationSink for NullPresenter {
    fn animate(&mut self, _cue: &AnimationCue) -> Playback {
        Playback::Instant
    }
}

/// A system that can decide on a battle action for an actor on the field.
pub trait ActionSource {
    fn choose(&mut self, actor: &Actor, state: &BattleState, moves: &dyn MoveSource) -> BattleAction;
}
