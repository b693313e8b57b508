use crate::actor::ActorId;
use crate::battle::engine::Battle;
use crate::battle::phase::{PhaseKind, PhaseStep, SuspendReason};
use crate::battle::state::BattleEvent;
use crate::errors::PhaseError;
use crate::items::{ComputationHolder, TriggerPoint};
use schema::{HeldItemId, Side};
use tracing::{debug, info};

pub(super) fn switch(battle: &mut Battle, actor_id: ActorId, replacement: ActorId) -> Result<PhaseStep, PhaseError> {
    let outgoing = battle.actor(actor_id)?;
    let side = outgoing.side;
    let Some(slot) = outgoing.slot.filter(|_| outgoing.is_on_field()) else {
        debug!(actor = %actor_id, "switching actor is no longer on the field");
        return Ok(PhaseStep::Abort);
    };
    if !battle.state.bench(side).contains(&replacement) {
        debug!(actor = %actor_id, %replacement, "replacement is not available");
        return Ok(PhaseStep::Abort);
    }

    let outgoing = battle.actor_mut(actor_id)?;
    outgoing.slot = None;
    outgoing.clear_volatile();
    battle.actor_mut(replacement)?.slot = Some(slot);

    battle.emit(BattleEvent::Switched {
        side,
        outgoing: actor_id,
        incoming: replacement,
    });
    battle.check_hp_items(replacement);
    Ok(PhaseStep::Finished)
}

/// Hands one stack of `item` to an ally. A full stack rejects the item.
pub(super) fn use_item(
    battle: &mut Battle,
    user: ActorId,
    recipient: ActorId,
    item: HeldItemId,
) -> Result<PhaseStep, PhaseError> {
    if !battle.state.is_on_field(user) || battle.actor(recipient)?.fainted {
        return Ok(PhaseStep::Abort);
    }

    if battle.ledger.grant(recipient, item, 1) == 0 {
        battle.emit(BattleEvent::ItemRejected { recipient, item });
        return Ok(PhaseStep::Finished);
    }
    battle.emit(BattleEvent::ItemGiven { recipient, item });
    if battle.state.is_on_field(recipient) {
        battle.check_hp_items(recipient);
    }
    Ok(PhaseStep::Finished)
}

pub(super) fn faint(battle: &mut Battle, actor_id: ActorId) -> Result<PhaseStep, PhaseError> {
    let actor = battle.actor_mut(actor_id)?;
    if actor.fainted || actor.hp > 0 {
        return Ok(PhaseStep::Abort);
    }
    actor.fainted = true;
    actor.clear_volatile();
    let side = actor.side;
    let base_experience = actor.experience_yield * u32::from(actor.level) / 7;

    battle.emit(BattleEvent::Fainted { actor: actor_id });

    let removed = battle
        .scheduler
        .remove_where(|phase| phase.kind().actor() == Some(actor_id));
    info!(actor = %actor_id, removed, "actor fainted");

    for winner in battle.state.on_field_side(side.opponent()) {
        battle.scheduler.push_front(PhaseKind::Experience {
            actor: winner,
            base_experience,
        });
    }

    battle.check_battle_end();
    Ok(PhaseStep::Finished)
}

/// Experience and friendship for a knockout, both run through held items.
pub(super) fn award_experience(
    battle: &mut Battle,
    actor_id: ActorId,
    base_experience: u32,
) -> Result<PhaseStep, PhaseError> {
    if battle.actor(actor_id)?.fainted {
        return Ok(PhaseStep::Abort);
    }

    let mut holder = ComputationHolder::Number(base_experience);
    battle.run_pipeline(actor_id, TriggerPoint::ExperienceGain, None, &mut holder);
    let amount = holder.number().unwrap_or(base_experience);

    let mut holder = ComputationHolder::Number(u32::from(battle.options.friendship_per_knockout));
    battle.run_pipeline(actor_id, TriggerPoint::FriendshipGain, None, &mut holder);
    let friendship_gain = holder.number().unwrap_or(0);

    let actor = battle.actor_mut(actor_id)?;
    actor.experience = actor.experience.saturating_add(amount);
    let room = u32::from(u8::MAX - actor.friendship);
    let friendship_gain = friendship_gain.min(room) as u8;
    actor.friendship += friendship_gain;

    battle.emit(BattleEvent::ExperienceGained { actor: actor_id, amount });
    if friendship_gain > 0 {
        battle.emit(BattleEvent::FriendshipGained {
            actor: actor_id,
            amount: friendship_gain,
        });
    }
    Ok(PhaseStep::Finished)
}

/// Fills an empty slot. The player picks through a suspension; the enemy
/// sends out its first benched actor.
pub(super) fn request_replacement(battle: &mut Battle, side: Side, slot: u8) -> Result<PhaseStep, PhaseError> {
    if !battle.state.open_slots(side).contains(&slot) {
        return Ok(PhaseStep::Abort);
    }
    let options = battle.state.bench(side);
    let Some(first) = options.first().copied() else {
        return Ok(PhaseStep::Abort);
    };

    match side {
        Side::Player => Ok(PhaseStep::Suspend(SuspendReason::ReplacementChoice { side, slot, options })),
        Side::Enemy => place_replacement(battle, side, slot, first),
    }
}

pub(super) fn place_replacement(
    battle: &mut Battle,
    side: Side,
    slot: u8,
    choice: ActorId,
) -> Result<PhaseStep, PhaseError> {
    if !battle.state.bench(side).contains(&choice) {
        return Err(PhaseError::UnknownActor(choice));
    }
    if let Some(previous) = battle.state.occupant(side, slot) {
        battle.actor_mut(previous)?.slot = None;
    }
    battle.actor_mut(choice)?.slot = Some(slot);
    battle.emit(BattleEvent::SentOut { side, actor: choice });
    Ok(PhaseStep::Finished)
}
