use crate::actor::{Actor, ActorId};
use schema::{HeldItemId, Move, Side, StatType, StatusCondition, Weather};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{trace, warn};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum GameState {
    WaitingForActions,
    TurnInProgress,
    PlayerWin,
    EnemyWin,
    Draw,
}

impl GameState {
    pub fn is_finished(self) -> bool {
        matches!(self, GameState::PlayerWin | GameState::EnemyWin | GameState::Draw)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeatherState {
    pub weather: Weather,
    /// `None` lasts until replaced.
    pub turns_remaining: Option<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted {
        turn_number: u32,
    },
    TurnEnded {
        turn_number: u32,
    },

    // Field
    Switched {
        side: Side,
        outgoing: ActorId,
        incoming: ActorId,
    },
    SentOut {
        side: Side,
        actor: ActorId,
    },

    // Moves
    MoveUsed {
        actor: ActorId,
        move_used: Move,
    },
    MoveCharging {
        actor: ActorId,
        move_used: Move,
    },
    ChargeSkipped {
        actor: ActorId,
        move_used: Move,
    },
    MoveHit {
        attacker: ActorId,
        defender: ActorId,
        move_used: Move,
    },
    MoveMissed {
        attacker: ActorId,
        defender: ActorId,
        move_used: Move,
    },
    NoValidTarget {
        actor: ActorId,
        move_used: Move,
    },
    MoveEnded {
        actor: ActorId,
        move_used: Move,
    },
    AttackTypeEffectiveness {
        multiplier: f32,
    },

    // HP
    DamageDealt {
        target: ActorId,
        damage: u16,
        remaining_hp: u16,
    },
    Healed {
        target: ActorId,
        amount: u16,
        new_hp: u16,
    },
    Fainted {
        actor: ActorId,
    },

    // Status and stats
    StatusApplied {
        target: ActorId,
        status: StatusCondition,
    },
    StatusCured {
        target: ActorId,
        status: StatusCondition,
    },
    StatusDamage {
        target: ActorId,
        status: StatusCondition,
        damage: u16,
    },
    WeatherDamage {
        target: ActorId,
        weather: Weather,
        damage: u16,
    },
    WeatherEnded {
        weather: Weather,
    },
    StatStageChanged {
        target: ActorId,
        stat: StatType,
        old_stage: i8,
        new_stage: i8,
    },

    // Held items
    ItemActivated {
        actor: ActorId,
        item: HeldItemId,
    },
    ItemConsumed {
        actor: ActorId,
        item: HeldItemId,
    },
    ItemGiven {
        recipient: ActorId,
        item: HeldItemId,
    },
    ItemRejected {
        recipient: ActorId,
        item: HeldItemId,
    },

    // Rewards
    ExperienceGained {
        actor: ActorId,
        amount: u32,
    },
    FriendshipGained {
        actor: ActorId,
        amount: u8,
    },

    // Battle End
    BattleEnded {
        winner: Option<Side>,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string using battle context.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self, battle_state: &BattleState) -> Option<String> {
        let name = |id: &ActorId| battle_state.actor_name(*id);
        match self {
            BattleEvent::TurnStarted { turn_number } => Some(format!("=== Turn {} ===", turn_number)),
            BattleEvent::TurnEnded { .. } => None,

            BattleEvent::Switched { outgoing, incoming, .. } => Some(format!(
                "{} was withdrawn and {} was sent out!",
                name(outgoing),
                name(incoming)
            )),
            BattleEvent::SentOut { actor, .. } => Some(format!("Go! {}!", name(actor))),

            BattleEvent::MoveUsed { actor, move_used } => Some(format!("{} used {}!", name(actor), move_used)),
            BattleEvent::MoveCharging { actor, move_used } => {
                Some(format!("{} began charging {}!", name(actor), move_used))
            }
            BattleEvent::ChargeSkipped { actor, .. } => {
                Some(format!("{} became fully charged at once!", name(actor)))
            }
            BattleEvent::MoveHit { .. } => None,
            BattleEvent::MoveMissed { attacker, .. } => Some(format!("{}'s attack missed!", name(attacker))),
            BattleEvent::NoValidTarget { .. } => Some("But there was no target...".to_string()),
            BattleEvent::MoveEnded { .. } => None,
            BattleEvent::AttackTypeEffectiveness { multiplier } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m < 1.0 && m > 0.0 => Some("It's not very effective...".to_string()),
                m if m == 0.0 => Some("It had no effect!".to_string()),
                _ => None,
            },

            BattleEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{} took {} damage!", name(target), damage))
            }
            BattleEvent::Healed { target, amount, .. } => Some(format!("{} recovered {} HP!", name(target), amount)),
            BattleEvent::Fainted { actor } => Some(format!("{} fainted!", name(actor))),

            BattleEvent::StatusApplied { target, status } => {
                Some(format!("{} was afflicted with {}!", name(target), status))
            }
            BattleEvent::StatusCured { target, status } => {
                Some(format!("{} was cured of its {}!", name(target), status))
            }
            BattleEvent::StatusDamage { target, status, damage } => Some(format!(
                "{} is hurt by its {}! ({} damage)",
                name(target),
                status,
                damage
            )),
            BattleEvent::WeatherDamage { target, weather, damage } => Some(format!(
                "{} is buffeted by the {}! ({} damage)",
                name(target),
                weather,
                damage
            )),
            BattleEvent::WeatherEnded { weather } => Some(format!("The {} subsided.", weather)),
            BattleEvent::StatStageChanged { target, stat, old_stage, new_stage } => {
                if new_stage > old_stage {
                    Some(format!("{}'s {} rose!", name(target), stat))
                } else if new_stage < old_stage {
                    Some(format!("{}'s {} fell!", name(target), stat))
                } else {
                    None
                }
            }

            BattleEvent::ItemActivated { .. } => None,
            BattleEvent::ItemConsumed { actor, item } => Some(format!("{} used up its {}!", name(actor), item)),
            BattleEvent::ItemGiven { recipient, item } => Some(format!("{} is now holding {}.", name(recipient), item)),
            BattleEvent::ItemRejected { recipient, item } => {
                Some(format!("{} can't hold any more {}!", name(recipient), item))
            }

            BattleEvent::ExperienceGained { actor, amount } => {
                Some(format!("{} gained {} Exp. Points!", name(actor), amount))
            }
            BattleEvent::FriendshipGained { .. } => None,

            BattleEvent::BattleEnded { winner } => match winner {
                Some(Side::Player) => Some("You won the battle!".to_string()),
                Some(Side::Enemy) => Some("You lost the battle...".to_string()),
                None => Some("The battle ended in a draw!".to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        trace!(?event, "battle event");
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Removes and returns every event recorded so far.
    pub fn take(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// User-visible lines for the recorded events, skipping silent ones.
    pub fn formatted(&self, battle_state: &BattleState) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| event.format(battle_state))
            .collect()
    }
}

impl std::fmt::Display for EventBus {
    /// Format the EventBus for printing. Shows debug format of all events.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Source of percentile rolls (1..=100).
///
/// Tests script the outcomes; live battles draw them from `rand`.
#[derive(Debug, Clone)]
pub struct TurnRng {
    outcomes: Vec<u8>,
    index: usize,
    live: bool,
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self {
            outcomes,
            index: 0,
            live: false,
        }
    }

    pub fn new_random() -> Self {
        Self {
            outcomes: Vec::new(),
            index: 0,
            live: true,
        }
    }

    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        if self.live {
            use rand::Rng;
            let outcome = rand::rng().random_range(1..=100);
            trace!(outcome, reason, "rng roll");
            return outcome;
        }
        if self.outcomes.is_empty() {
            warn!(reason, "scripted rng has no outcomes, rolling 1");
            return 1;
        }
        if self.index >= self.outcomes.len() {
            warn!(reason, "scripted rng exhausted, wrapping around");
            self.index = 0;
        }
        let outcome = self.outcomes[self.index];
        trace!(outcome, reason, "rng roll");
        self.index += 1;
        outcome
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleState {
    pub battle_id: String,
    pub actors: BTreeMap<ActorId, Actor>,
    /// Field positions per side.
    pub slots_per_side: u8,
    pub weather: WeatherState,
    pub turn_number: u32,
    pub game_state: GameState,
}

impl BattleState {
    pub fn new(battle_id: String, actors: Vec<Actor>, slots_per_side: u8) -> Self {
        Self {
            battle_id,
            actors: actors.into_iter().map(|actor| (actor.id, actor)).collect(),
            slots_per_side,
            weather: WeatherState::default(),
            turn_number: 1,
            game_state: GameState::WaitingForActions,
        }
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    pub fn actor_name(&self, id: ActorId) -> &str {
        self.actor(id).map(|actor| actor.name.as_str()).unwrap_or("???")
    }

    pub fn is_on_field(&self, id: ActorId) -> bool {
        self.actor(id).is_some_and(Actor::is_on_field)
    }

    /// Everyone on the field, ordered by side then slot.
    pub fn on_field(&self) -> Vec<ActorId> {
        let mut ids: Vec<(Side, u8, ActorId)> = self
            .actors
            .values()
            .filter(|actor| actor.is_on_field())
            .filter_map(|actor| actor.slot.map(|slot| (actor.side, slot, actor.id)))
            .collect();
        ids.sort();
        ids.into_iter().map(|(_, _, id)| id).collect()
    }

    pub fn on_field_side(&self, side: Side) -> Vec<ActorId> {
        self.on_field()
            .into_iter()
            .filter(|id| self.actor(*id).is_some_and(|actor| actor.side == side))
            .collect()
    }

    /// Whoever holds `slot` on `side`, fainted or not.
    pub fn occupant(&self, side: Side, slot: u8) -> Option<ActorId> {
        self.actors
            .values()
            .find(|actor| actor.side == side && actor.slot == Some(slot))
            .map(|actor| actor.id)
    }

    /// Benched actors still able to fight.
    pub fn bench(&self, side: Side) -> Vec<ActorId> {
        self.actors
            .values()
            .filter(|actor| actor.side == side && actor.slot.is_none() && !actor.fainted)
            .map(|actor| actor.id)
            .collect()
    }

    /// Slots on `side` with no standing occupant.
    pub fn open_slots(&self, side: Side) -> Vec<u8> {
        (0..self.slots_per_side)
            .filter(|slot| match self.occupant(side, *slot) {
                Some(id) => !self.is_on_field(id),
                None => true,
            })
            .collect()
    }

    pub fn side_defeated(&self, side: Side) -> bool {
        self.actors
            .values()
            .filter(|actor| actor.side == side)
            .all(|actor| actor.fainted)
    }
}
