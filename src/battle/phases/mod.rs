//! Phase handlers. Each phase kind has a `start`; a few also react to
//! [`ResumeInput`] or run extra logic when they end.

mod charge;
mod field;
mod moves;
mod turn;

use crate::battle::engine::Battle;
use crate::battle::phase::{Phase, PhaseKind, PhaseStep, ResumeInput};
use crate::errors::PhaseError;

pub(crate) fn start(battle: &mut Battle, phase: &Phase) -> Result<PhaseStep, PhaseError> {
    match phase.kind() {
        PhaseKind::TurnStart => turn::start_turn(battle),
        PhaseKind::Switch { actor, replacement } => field::switch(battle, *actor, *replacement),
        PhaseKind::UseItem { user, recipient, item } => field::use_item(battle, *user, *recipient, *item),
        PhaseKind::Move {
            actor,
            targets,
            move_id,
            origin,
        } => moves::start_move(battle, *actor, targets, *move_id, *origin),
        PhaseKind::MoveCharge { actor, target, move_id } => charge::start(battle, *actor, *target, *move_id),
        PhaseKind::MoveEffect { actor, target, move_id } => moves::apply_move_effect(battle, *actor, *target, *move_id),
        PhaseKind::MoveEnd { actor, move_id } => moves::end_move(battle, *actor, *move_id),
        PhaseKind::Faint { actor } => field::faint(battle, *actor),
        PhaseKind::Experience {
            actor,
            base_experience,
        } => field::award_experience(battle, *actor, *base_experience),
        PhaseKind::EndOfTurn => turn::end_of_turn(battle),
        PhaseKind::TurnEnd => turn::end_turn(battle),
        PhaseKind::Replacement { side, slot } => field::request_replacement(battle, *side, *slot),
    }
}

pub(crate) fn resume(battle: &mut Battle, phase: &Phase, input: ResumeInput) -> Result<PhaseStep, PhaseError> {
    match (phase.kind(), input) {
        (PhaseKind::MoveCharge { actor, move_id, .. }, ResumeInput::AnimationComplete) => {
            charge::finish_charge_turn(battle, *actor, *move_id)
        }
        (PhaseKind::Replacement { side, slot }, ResumeInput::Replacement(choice)) => {
            field::place_replacement(battle, *side, *slot, choice)
        }
        _ => Err(PhaseError::UnexpectedResume(phase.tag())),
    }
}

/// End logic, run only for phases that finished normally.
pub(crate) fn end(battle: &mut Battle, phase: &Phase) -> Result<(), PhaseError> {
    match phase.kind() {
        PhaseKind::MoveCharge { actor, target, move_id } => charge::end(battle, *actor, *target, *move_id),
        _ => Ok(()),
    }
}
