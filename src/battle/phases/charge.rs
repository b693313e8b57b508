//! The two-turn move protocol.
//!
//! A charging move first runs a `MoveCharge` phase. When it ends, the move
//! either resolves right away (weather or an instant-charge item) by
//! replacing the queued `MoveEnd` with a fresh `Move` phase, or is parked in
//! the actor's deferred queue for its next turn.

use crate::actor::{ActorId, MoveResult, QueuedMove, VolatileTag};
use crate::battle::engine::Battle;
use crate::battle::interfaces::Playback;
use crate::battle::phase::{AnimationCue, MoveOrigin, PhaseKind, PhaseKindTag, PhaseStep, SuspendReason};
use crate::battle::state::BattleEvent;
use crate::errors::PhaseError;
use crate::items::{ComputationHolder, TriggerPoint};
use schema::Move;
use tracing::{debug, warn};

/// Where one actor/move instance is in the protocol. Used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChargeState {
    Announced,
    Charged,
    ResolvedNow,
    Deferred,
}

pub(super) fn start(
    battle: &mut Battle,
    actor_id: ActorId,
    target: Option<ActorId>,
    move_id: Move,
) -> Result<PhaseStep, PhaseError> {
    let is_charging = battle
        .moves
        .move_data(move_id)
        .is_some_and(|data| data.is_charging_move());
    if !is_charging {
        warn!(actor = %actor_id, %move_id, "charge phase for a move that does not charge");
        return Ok(PhaseStep::Abort);
    }
    if !battle.state.is_on_field(actor_id) {
        warn!(actor = %actor_id, %move_id, "charging actor left the field");
        return Ok(PhaseStep::Abort);
    }
    let Some(target) = target.filter(|target| battle.state.is_on_field(*target)) else {
        warn!(actor = %actor_id, %move_id, "charge target is gone");
        return Ok(PhaseStep::Abort);
    };
    debug!(actor = %actor_id, %move_id, %target, state = ?ChargeState::Announced, "charge started");

    let cue = AnimationCue::MoveCharge {
        actor: actor_id,
        move_id,
    };
    match battle.presenter.animate(&cue) {
        Playback::AwaitCompletion => Ok(PhaseStep::Suspend(SuspendReason::Animation(cue))),
        Playback::Instant => finish_charge_turn(battle, actor_id, move_id),
    }
}

/// Announces the charge, applies its stat changes and commits the actor.
pub(super) fn finish_charge_turn(battle: &mut Battle, actor_id: ActorId, move_id: Move) -> Result<PhaseStep, PhaseError> {
    let move_data = battle.move_data(move_id)?;
    battle.emit(BattleEvent::MoveCharging {
        actor: actor_id,
        move_used: move_id,
    });

    let on_charge = move_data.charge.map(|charge| charge.on_charge).unwrap_or_default();
    for (stat, delta) in on_charge {
        let (old_stage, new_stage) = battle.actor_mut(actor_id)?.modify_stat_stage(stat, delta);
        if old_stage != new_stage {
            battle.emit(BattleEvent::StatStageChanged {
                target: actor_id,
                stat,
                old_stage,
                new_stage,
            });
        }
    }

    battle.actor_mut(actor_id)?.add_tag(VolatileTag::Charging(move_id));
    debug!(actor = %actor_id, %move_id, state = ?ChargeState::Charged, "charge turn done");
    Ok(PhaseStep::Finished)
}

/// Decides between resolving now and deferring to the next turn.
pub(super) fn end(
    battle: &mut Battle,
    actor_id: ActorId,
    target: Option<ActorId>,
    move_id: Move,
) -> Result<(), PhaseError> {
    let move_data = battle.move_data(move_id)?;
    let targets: Vec<ActorId> = target.into_iter().collect();

    let instant = if move_data.instant_charge_in(battle.state.weather.weather) {
        true
    } else {
        let mut holder = ComputationHolder::Flag(false);
        battle.run_pipeline(actor_id, TriggerPoint::InstantCharge, None, &mut holder);
        holder.flag().unwrap_or(false)
    };

    if instant {
        let removed = battle.scheduler.remove_where(|phase| {
            phase.tag() == PhaseKindTag::MoveEnd && phase.kind().actor() == Some(actor_id)
        });
        battle.emit(BattleEvent::ChargeSkipped {
            actor: actor_id,
            move_used: move_id,
        });
        battle.scheduler.push_front(PhaseKind::Move {
            actor: actor_id,
            targets: targets.clone(),
            move_id,
            origin: MoveOrigin::ChargeRelease,
        });
        debug!(actor = %actor_id, %move_id, removed, state = ?ChargeState::ResolvedNow, "charge resolved");
    } else {
        battle.actor_mut(actor_id)?.deferred_moves.push_back(QueuedMove {
            move_id,
            targets: targets.clone(),
        });
        debug!(actor = %actor_id, %move_id, state = ?ChargeState::Deferred, "attack deferred to next turn");
    }

    battle.record_move(actor_id, move_id, targets, MoveResult::Other)
}
