use crate::battle::engine::{Battle, DamageCause};
use crate::battle::phase::{PhaseKind, PhaseStep};
use crate::battle::state::BattleEvent;
use crate::errors::PhaseError;
use crate::items::{ComputationHolder, TriggerPoint};
use schema::{PokemonType, Side, Weather};
use tracing::{debug, info};

pub(super) fn start_turn(battle: &mut Battle) -> Result<PhaseStep, PhaseError> {
    let turn_number = battle.state.turn_number;
    battle.emit(BattleEvent::TurnStarted { turn_number });
    Ok(PhaseStep::Finished)
}

fn sandstorm_immune(types: &[PokemonType]) -> bool {
    types
        .iter()
        .any(|t| matches!(t, PokemonType::Rock | PokemonType::Ground | PokemonType::Steel))
}

/// Weather chip, status residue and end-of-turn items for everyone on the
/// field in position order, then the weather clock.
pub(super) fn end_of_turn(battle: &mut Battle) -> Result<PhaseStep, PhaseError> {
    let weather = battle.state.weather.weather;

    for actor_id in battle.state.on_field() {
        let actor = battle.actor(actor_id)?;
        if actor.hp == 0 {
            continue;
        }
        if weather == Weather::Sandstorm && !sandstorm_immune(&actor.types) {
            let chip = (actor.max_hp / 16).max(1);
            battle.deal_damage(actor_id, chip, DamageCause::Weather(weather))?;
        }

        let actor = battle.actor(actor_id)?;
        if actor.hp == 0 {
            continue;
        }
        if let Some((status, divisor)) = actor.status.and_then(|s| s.residual_divisor().map(|d| (s, d))) {
            let chip = (actor.max_hp / divisor).max(1);
            battle.deal_damage(actor_id, chip, DamageCause::Status(status))?;
        }

        if battle.actor(actor_id)?.hp == 0 {
            continue;
        }
        let mut holder = ComputationHolder::Flag(false);
        battle.run_pipeline(actor_id, TriggerPoint::EndOfTurn, None, &mut holder);
    }

    let clock = &mut battle.state.weather;
    if let Some(turns) = clock.turns_remaining {
        let turns = turns.saturating_sub(1);
        if turns == 0 {
            let ended = clock.weather;
            clock.weather = Weather::Clear;
            clock.turns_remaining = None;
            battle.emit(BattleEvent::WeatherEnded { weather: ended });
        } else {
            clock.turns_remaining = Some(turns);
            debug!(%weather, turns, "weather continues");
        }
    }

    battle.check_battle_end();
    Ok(PhaseStep::Finished)
}

/// Closes the turn and queues replacements for emptied slots.
pub(super) fn end_turn(battle: &mut Battle) -> Result<PhaseStep, PhaseError> {
    let turn_number = battle.state.turn_number;
    battle.emit(BattleEvent::TurnEnded { turn_number });
    battle.state.turn_number += 1;

    if !battle.is_over() {
        for side in [Side::Player, Side::Enemy] {
            let bench = battle.state.bench(side).len();
            for slot in battle.state.open_slots(side).into_iter().take(bench) {
                battle.scheduler.push_front(PhaseKind::Replacement { side, slot });
            }
        }
    }

    battle.end_turn_bookkeeping();
    info!(turn = turn_number, "turn ended");
    Ok(PhaseStep::Finished)
}
