use crate::actor::{ActorId, MoveResult, VolatileTag};
use crate::battle::engine::{Battle, DamageCause};
use crate::battle::phase::{MoveOrigin, PhaseKind, PhaseStep};
use crate::battle::state::BattleEvent;
use crate::battle::stats::{calculate_damage, hit_chance};
use crate::errors::PhaseError;
use crate::items::{ComputationHolder, TriggerPoint};
use schema::{Move, MoveCategory};
use tracing::debug;

/// Targets still standing. If every chosen target has left the field the
/// move is redirected to the first opponent on the field.
fn resolve_targets(battle: &Battle, actor: ActorId, targets: &[ActorId]) -> Result<Vec<ActorId>, PhaseError> {
    let mut resolved: Vec<ActorId> = Vec::new();
    for target in targets {
        if battle.state.is_on_field(*target) && !resolved.contains(target) {
            resolved.push(*target);
        }
    }
    if resolved.is_empty() && !targets.is_empty() {
        let side = battle.actor(actor)?.side.opponent();
        if let Some(first) = battle.state.on_field_side(side).first() {
            debug!(%actor, target = %first, "target left the field, redirecting");
            resolved.push(*first);
        }
    }
    Ok(resolved)
}

pub(super) fn start_move(
    battle: &mut Battle,
    actor_id: ActorId,
    targets: &[ActorId],
    move_id: Move,
    origin: MoveOrigin,
) -> Result<PhaseStep, PhaseError> {
    if !battle.state.is_on_field(actor_id) {
        debug!(actor = %actor_id, %move_id, "actor left the field before moving");
        return Ok(PhaseStep::Abort);
    }
    let move_data = battle.move_data(move_id)?;
    let targets = resolve_targets(battle, actor_id, targets)?;
    let charged = battle.actor_mut(actor_id)?.remove_tag(VolatileTag::Charging(move_id));

    if targets.is_empty() {
        battle.emit(BattleEvent::NoValidTarget {
            actor: actor_id,
            move_used: move_id,
        });
        battle.record_move(actor_id, move_id, Vec::new(), MoveResult::Fail)?;
        battle.scheduler.push_front(PhaseKind::MoveEnd {
            actor: actor_id,
            move_id,
        });
        return Ok(PhaseStep::Finished);
    }

    if move_data.is_charging_move() && !charged {
        debug!(actor = %actor_id, %move_id, ?origin, "move needs a charge turn");
        battle.scheduler.push_front(PhaseKind::MoveCharge {
            actor: actor_id,
            target: targets.first().copied(),
            move_id,
        });
        battle.scheduler.push_front(PhaseKind::MoveEnd {
            actor: actor_id,
            move_id,
        });
        return Ok(PhaseStep::Finished);
    }

    battle.emit(BattleEvent::MoveUsed {
        actor: actor_id,
        move_used: move_id,
    });
    for target in targets {
        battle.scheduler.push_front(PhaseKind::MoveEffect {
            actor: actor_id,
            target,
            move_id,
        });
    }
    battle.scheduler.push_front(PhaseKind::MoveEnd {
        actor: actor_id,
        move_id,
    });
    Ok(PhaseStep::Finished)
}

/// One hit of a move against one target: accuracy, power, damage.
pub(super) fn apply_move_effect(
    battle: &mut Battle,
    attacker_id: ActorId,
    defender_id: ActorId,
    move_id: Move,
) -> Result<PhaseStep, PhaseError> {
    if !battle.state.is_on_field(attacker_id) || !battle.state.is_on_field(defender_id) {
        debug!(attacker = %attacker_id, defender = %defender_id, %move_id, "combatant left the field");
        return Ok(PhaseStep::Abort);
    }
    let move_data = battle.move_data(move_id)?;

    if let Some(accuracy) = move_data.accuracy {
        let mut holder = ComputationHolder::Number(u32::from(accuracy));
        battle.run_pipeline(attacker_id, TriggerPoint::AccuracyCheck, Some(move_data.move_type), &mut holder);
        let accuracy = holder.number().unwrap_or(u32::from(accuracy));

        let chance = hit_chance(battle.actor(attacker_id)?, battle.actor(defender_id)?, accuracy);
        let roll = battle.rng.next_outcome("accuracy check");
        if roll > chance {
            battle.emit(BattleEvent::MoveMissed {
                attacker: attacker_id,
                defender: defender_id,
                move_used: move_id,
            });
            battle.record_move(attacker_id, move_id, vec![defender_id], MoveResult::Miss)?;
            return Ok(PhaseStep::Finished);
        }
    }

    if move_data.category == MoveCategory::Status {
        battle.record_move(attacker_id, move_id, vec![defender_id], MoveResult::Other)?;
        return Ok(PhaseStep::Finished);
    }

    let mut holder = ComputationHolder::Number(u32::from(move_data.power));
    battle.run_pipeline(attacker_id, TriggerPoint::PowerCheck, Some(move_data.move_type), &mut holder);
    let power = holder.number().unwrap_or(u32::from(move_data.power));

    let roll = calculate_damage(
        battle.actor(attacker_id)?,
        battle.actor(defender_id)?,
        &move_data,
        power,
    );

    if roll.effectiveness == 0.0 {
        battle.emit(BattleEvent::AttackTypeEffectiveness { multiplier: 0.0 });
        battle.record_move(attacker_id, move_id, vec![defender_id], MoveResult::Miss)?;
        return Ok(PhaseStep::Finished);
    }

    battle.emit(BattleEvent::MoveHit {
        attacker: attacker_id,
        defender: defender_id,
        move_used: move_id,
    });
    if roll.effectiveness != 1.0 {
        battle.emit(BattleEvent::AttackTypeEffectiveness {
            multiplier: roll.effectiveness,
        });
    }
    battle.deal_damage(defender_id, roll.damage, DamageCause::Move)?;
    battle.record_move(attacker_id, move_id, vec![defender_id], MoveResult::Hit)?;
    Ok(PhaseStep::Finished)
}

pub(super) fn end_move(battle: &mut Battle, actor: ActorId, move_id: Move) -> Result<PhaseStep, PhaseError> {
    battle.emit(BattleEvent::MoveEnded {
        actor,
        move_used: move_id,
    });
    Ok(PhaseStep::Finished)
}
