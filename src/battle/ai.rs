//! A module for defining AI behaviors for battle opponents.

use crate::actor::Actor;
use crate::battle::interfaces::ActionSource;
use crate::battle::state::BattleState;
use crate::battle::stats::calculate_damage;
use crate::battle::turn_orchestrator::BattleAction;
use crate::move_data::MoveSource;
use schema::Move;

/// Picks the move with the best expected damage against the first opponent
/// on the field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringAi;

impl ScoringAi {
    pub fn new() -> Self {
        Self
    }

    fn score_move(&self, move_id: Move, actor: &Actor, defender: &Actor, moves: &dyn MoveSource) -> f32 {
        let Some(move_data) = moves.move_data(move_id) else {
            return 0.0;
        };
        let roll = calculate_damage(actor, defender, move_data, u32::from(move_data.power));
        let accuracy = move_data.accuracy.map_or(1.0, |a| f32::from(a) / 100.0);
        let mut score = f32::from(roll.damage) * accuracy;

        // Two-turn moves only land every other turn.
        if move_data.is_charging_move() {
            score /= 2.0;
        }
        score
    }
}

impl ActionSource for ScoringAi {
    fn choose(&mut self, actor: &Actor, state: &BattleState, moves: &dyn MoveSource) -> BattleAction {
        let defender = state
            .on_field_side(actor.side.opponent())
            .first()
            .and_then(|id| state.actor(*id));

        let Some(defender) = defender else {
            return BattleAction::UseMove {
                move_id: actor.moves.first().copied().unwrap_or(Move::Tackle),
                targets: Vec::new(),
            };
        };

        let mut best: Option<(Move, f32)> = None;
        for move_id in &actor.moves {
            let score = self.score_move(*move_id, actor, defender, moves);
            let better = match best {
                Some((_, best_score)) => score > best_score,
                None => true,
            };
            if better {
                best = Some((*move_id, score));
            }
        }

        BattleAction::UseMove {
            move_id: best.map_or(Move::Tackle, |(move_id, _)| move_id),
            targets: vec![defender.id],
        }
    }
}
