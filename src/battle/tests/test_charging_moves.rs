#[cfg(test)]
mod tests {
    use crate::actor::{ActorId, MoveResult, MoveUseRecord, VolatileTag};
    use crate::battle::engine::DrainOutcome;
    use crate::battle::phase::PhaseKindTag;
    use crate::battle::scheduler::PhaseRecord;
    use crate::battle::state::BattleEvent;
    use crate::battle::tests::common::{
        assert_config, assert_ok, count_events, create_test_battle, submit_all, test_battle, use_move,
        TestActorBuilder,
    };
    use crate::errors::{ActionError, BattleEngineError};
    use pretty_assertions::assert_eq;
    use schema::{HeldItemId, Move, Side, StatType, Weather};

    fn solar_beam_user() -> crate::actor::Actor {
        TestActorBuilder::new(1, Side::Player)
            .with_moves(vec![Move::SolarBeam, Move::Tackle])
            .with_speed(100)
            .build()
    }

    fn completed_tags(battle: &crate::battle::engine::Battle) -> Vec<PhaseKindTag> {
        battle.scheduler().completed().iter().map(PhaseRecord::tag).collect()
    }

    fn move_ended_for(events: &[BattleEvent], actor: u32) -> usize {
        count_events(events, |e| matches!(e, BattleEvent::MoveEnded { actor: a, .. } if *a == ActorId(actor)))
    }

    #[test]
    fn test_charge_defers_attack_to_next_turn() {
        let enemy = TestActorBuilder::new(2, Side::Enemy).build();
        let mut battle = create_test_battle(solar_beam_user(), enemy);
        battle.take_events();

        // Turn 1: charge only
        submit_all(&mut battle, vec![(1, use_move(Move::SolarBeam, 2)), (2, use_move(Move::Tackle, 1))]);
        let outcome = assert_ok(battle.resolve_turn());
        assert_eq!(outcome, DrainOutcome::Idle);

        let charger = battle.state().actor(ActorId(1)).expect("actor 1");
        assert_eq!(
            charger.move_history,
            vec![MoveUseRecord {
                move_id: Move::SolarBeam,
                targets: vec![ActorId(2)],
                result: MoveResult::Other,
                turn: 1,
            }]
        );
        assert!(charger.has_tag(VolatileTag::Charging(Move::SolarBeam)));
        assert_eq!(charger.deferred_moves.len(), 1);
        assert_eq!(battle.state().actor(ActorId(2)).expect("actor 2").hp, 200);

        let events = battle.take_events();
        assert!(events.contains(&BattleEvent::MoveCharging {
            actor: ActorId(1),
            move_used: Move::SolarBeam,
        }));
        assert_eq!(move_ended_for(&events, 1), 1);
        assert_eq!(
            completed_tags(&battle),
            vec![
                PhaseKindTag::TurnStart,
                PhaseKindTag::Move,
                PhaseKindTag::MoveCharge,
                PhaseKindTag::MoveEnd,
                PhaseKindTag::Move,
                PhaseKindTag::MoveEffect,
                PhaseKindTag::MoveEnd,
                PhaseKindTag::EndOfTurn,
                PhaseKindTag::TurnEnd,
            ]
        );

        // Turn 2: the charging actor is locked in and needs no action
        assert_eq!(battle.actors_needing_action(), vec![ActorId(2)]);
        let locked = battle.submit_action(ActorId(1), use_move(Move::Tackle, 2));
        assert!(matches!(
            locked,
            Err(BattleEngineError::Action(ActionError::ActionLocked(ActorId(1))))
        ));
        submit_all(&mut battle, vec![(2, use_move(Move::Tackle, 1))]);
        assert_ok(battle.resolve_turn());

        let charger = battle.state().actor(ActorId(1)).expect("actor 1");
        assert_eq!(charger.move_history.len(), 2);
        assert_eq!(charger.move_history[1].result, MoveResult::Hit);
        assert_eq!(charger.move_history[1].turn, 2);
        assert!(!charger.has_tag(VolatileTag::Charging(Move::SolarBeam)));
        assert!(charger.deferred_moves.is_empty());
        assert_eq!(battle.state().actor(ActorId(2)).expect("actor 2").hp, 146);

        let events = battle.take_events();
        let attacks = count_events(&events, |e| {
            matches!(e, BattleEvent::MoveUsed { actor, move_used: Move::SolarBeam } if *actor == ActorId(1))
        });
        assert_eq!(attacks, 1);
        assert_eq!(move_ended_for(&events, 1), 1);
    }

    #[test]
    fn test_sun_resolves_charge_in_the_same_turn() {
        let enemy = TestActorBuilder::new(2, Side::Enemy).build();
        let mut battle = assert_config(
            test_battle()
                .actor(solar_beam_user())
                .actor(enemy)
                .weather(Weather::Sun)
                .build(),
        );
        battle.take_events();

        submit_all(&mut battle, vec![(1, use_move(Move::SolarBeam, 2)), (2, use_move(Move::Tackle, 1))]);
        assert_ok(battle.resolve_turn());

        assert_eq!(
            completed_tags(&battle),
            vec![
                PhaseKindTag::TurnStart,
                PhaseKindTag::Move,
                PhaseKindTag::MoveCharge,
                PhaseKindTag::Move,
                PhaseKindTag::MoveEffect,
                PhaseKindTag::MoveEnd,
                PhaseKindTag::Move,
                PhaseKindTag::MoveEffect,
                PhaseKindTag::MoveEnd,
                PhaseKindTag::EndOfTurn,
                PhaseKindTag::TurnEnd,
            ]
        );

        let charger = battle.state().actor(ActorId(1)).expect("actor 1");
        let results: Vec<MoveResult> = charger.move_history.iter().map(|record| record.result).collect();
        assert_eq!(results, vec![MoveResult::Other, MoveResult::Hit]);
        assert!(charger.deferred_moves.is_empty());
        assert!(charger.volatile_tags.is_empty());
        assert_eq!(battle.state().actor(ActorId(2)).expect("actor 2").hp, 146);

        let events = battle.take_events();
        assert!(events.contains(&BattleEvent::ChargeSkipped {
            actor: ActorId(1),
            move_used: Move::SolarBeam,
        }));
        assert_eq!(move_ended_for(&events, 1), 1);
    }

    #[test]
    fn test_power_herb_is_consumed_for_an_instant_charge() {
        let enemy = TestActorBuilder::new(2, Side::Enemy).build();
        let mut battle = assert_config(
            test_battle()
                .actor(solar_beam_user())
                .actor(enemy)
                .hold(ActorId(1), HeldItemId::PowerHerb, 1)
                .build(),
        );

        submit_all(&mut battle, vec![(1, use_move(Move::SolarBeam, 2)), (2, use_move(Move::Tackle, 1))]);
        assert_ok(battle.resolve_turn());

        assert_eq!(battle.ledger().get_stack(ActorId(1), HeldItemId::PowerHerb), 0);
        assert!(!battle.ledger().has(ActorId(1), HeldItemId::PowerHerb));
        assert!(battle.events().contains(&BattleEvent::ItemConsumed {
            actor: ActorId(1),
            item: HeldItemId::PowerHerb,
        }));
        assert_eq!(battle.state().actor(ActorId(2)).expect("actor 2").hp, 146);
        assert_eq!(move_ended_for(battle.events(), 1), 1);
    }

    #[test]
    fn test_weather_charge_leaves_power_herb_alone() {
        let enemy = TestActorBuilder::new(2, Side::Enemy).build();
        let mut battle = assert_config(
            test_battle()
                .actor(solar_beam_user())
                .actor(enemy)
                .hold(ActorId(1), HeldItemId::PowerHerb, 1)
                .weather(Weather::Sun)
                .build(),
        );

        submit_all(&mut battle, vec![(1, use_move(Move::SolarBeam, 2)), (2, use_move(Move::Tackle, 1))]);
        assert_ok(battle.resolve_turn());

        assert_eq!(battle.ledger().get_stack(ActorId(1), HeldItemId::PowerHerb), 1);
    }

    #[test]
    fn test_charge_applies_on_charge_stat_changes() {
        let user = TestActorBuilder::new(1, Side::Player)
            .with_moves(vec![Move::SkullBash])
            .with_speed(100)
            .build();
        let enemy = TestActorBuilder::new(2, Side::Enemy).build();
        let mut battle = create_test_battle(user, enemy);

        submit_all(&mut battle, vec![(1, use_move(Move::SkullBash, 2)), (2, use_move(Move::Tackle, 1))]);
        assert_ok(battle.resolve_turn());

        let user = battle.state().actor(ActorId(1)).expect("actor 1");
        assert_eq!(user.get_stat_stage(StatType::Defense), 1);
        assert_eq!(user.charging_move(), Some(Move::SkullBash));
        assert!(battle.events().contains(&BattleEvent::StatStageChanged {
            target: ActorId(1),
            stat: StatType::Defense,
            old_stage: 0,
            new_stage: 1,
        }));
    }

    #[test]
    fn test_switching_out_drops_a_pending_charge() {
        let user = solar_beam_user();
        let bench = TestActorBuilder::new(3, Side::Player).build();
        let enemy = TestActorBuilder::new(2, Side::Enemy).build();
        let mut battle = assert_config(test_battle().actor(user).actor(bench).actor(enemy).build());

        submit_all(&mut battle, vec![(1, use_move(Move::SolarBeam, 2)), (2, use_move(Move::Tackle, 1))]);
        assert_ok(battle.resolve_turn());
        assert_eq!(battle.actors_needing_action(), vec![ActorId(2)]);

        // Actor 1 is locked in, so force it out between turns the way a
        // content script would.
        let charger = battle.state.actor_mut(ActorId(1)).expect("actor 1");
        charger.slot = None;
        charger.clear_volatile();
        battle.state.actor_mut(ActorId(3)).expect("actor 3").slot = Some(0);

        submit_all(&mut battle, vec![(3, use_move(Move::Tackle, 2)), (2, use_move(Move::Tackle, 3))]);
        assert_ok(battle.resolve_turn());

        let charger = battle.state().actor(ActorId(1)).expect("actor 1");
        assert_eq!(charger.move_history.len(), 1);
        assert!(charger.deferred_moves.is_empty());
    }
}
