use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::actor::ActorId;
use crate::battle::phase::{MoveOrigin, PhaseKind};
use crate::battle::state::BattleState;
use crate::battle::stats::effective_speed;
use crate::move_data::MoveSource;
use schema::{HeldItemId, Move, Side};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One submitted action for an actor on the field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum BattleAction {
    UseMove { move_id: Move, targets: Vec<ActorId> },
    /// Swap the actor for a benched ally.
    Switch { replacement: ActorId },
    /// Hand a held item from the bag to an ally.
    UseItem { item: HeldItemId, recipient: ActorId },
}

// Sort key for a single action. Higher sorts first except for position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct ActionPriority {
    action_class: Reverse<u8>, // Switch/Item: 1, Move: 0
    move_priority: Reverse<i8>,
    speed: Reverse<u16>,
    position: (Side, u8),
}

/// Expands a turn into its phases: `TurnStart`, one phase per action in
/// execution order, then `EndOfTurn` and `TurnEnd`.
///
/// Actors with a deferred move run it instead of whatever they submitted;
/// the deferred entry is popped here.
pub fn build_turn_phases(
    state: &mut BattleState,
    moves: &dyn MoveSource,
    submitted: &mut BTreeMap<ActorId, BattleAction>,
) -> Vec<PhaseKind> {
    let mut actions: Vec<(ActorId, BattleAction, MoveOrigin)> = Vec::new();

    for id in state.on_field() {
        let Some(actor) = state.actor_mut(id) else {
            continue;
        };
        if let Some(queued) = actor.deferred_moves.pop_front() {
            submitted.remove(&id);
            let action = BattleAction::UseMove {
                move_id: queued.move_id,
                targets: queued.targets,
            };
            actions.push((id, action, MoveOrigin::Deferred));
        } else if let Some(action) = submitted.remove(&id) {
            actions.push((id, action, MoveOrigin::Selected));
        }
    }
    submitted.clear();

    actions.sort_by_key(|(id, action, _)| calculate_action_priority(*id, action, state, moves));

    let mut phases = Vec::with_capacity(actions.len() + 3);
    phases.push(PhaseKind::TurnStart);
    for (actor, action, origin) in actions {
        debug!(%actor, ?action, ?origin, "action scheduled");
        phases.push(action_to_phase(actor, action, origin));
    }
    phases.push(PhaseKind::EndOfTurn);
    phases.push(PhaseKind::TurnEnd);
    phases
}

pub fn action_to_phase(actor: ActorId, action: BattleAction, origin: MoveOrigin) -> PhaseKind {
    match action {
        BattleAction::UseMove { move_id, targets } => PhaseKind::Move {
            actor,
            targets,
            move_id,
            origin,
        },
        BattleAction::Switch { replacement } => PhaseKind::Switch { actor, replacement },
        BattleAction::UseItem { item, recipient } => PhaseKind::UseItem {
            user: actor,
            recipient,
            item,
        },
    }
}

fn calculate_action_priority(
    id: ActorId,
    action: &BattleAction,
    state: &BattleState,
    moves: &dyn MoveSource,
) -> ActionPriority {
    let (side, slot, speed) = state
        .actor(id)
        .map(|actor| (actor.side, actor.slot.unwrap_or(u8::MAX), effective_speed(actor)))
        .unwrap_or((Side::Enemy, u8::MAX, 0));

    let (action_class, move_priority) = match action {
        BattleAction::Switch { .. } | BattleAction::UseItem { .. } => (1, 0),
        BattleAction::UseMove { move_id, .. } => {
            let priority = moves.move_data(*move_id).map_or(0, |data| data.priority);
            (0, priority)
        }
    };

    ActionPriority {
        action_class: Reverse(action_class),
        move_priority: Reverse(move_priority),
        speed: Reverse(speed),
        position: (side, slot),
    }
}
