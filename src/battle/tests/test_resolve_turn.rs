#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::actor::ActorId;
    use crate::battle::ai::ScoringAi;
    use crate::battle::engine::{BattleBuilder, DrainOutcome};
    use crate::battle::state::{BattleEvent, GameState};
    use crate::battle::tests::common::{
        assert_config, assert_ok, create_test_battle, submit_all, test_battle, use_move, TestActorBuilder,
    };
    use crate::battle::turn_orchestrator::BattleAction;
    use crate::config::EngineConfig;
    use crate::errors::{ActionError, BattleEngineError, BattleStateError, ConfigurationError};
    use crate::items::EffectRegistry;
    use crate::move_data::{MoveSource, MoveTable};
    use pretty_assertions::assert_eq;
    use schema::{HeldItemId, Move, PokemonType, Side, StatType};

    #[test]
    fn test_basic_turn_resolution() {
        let player = TestActorBuilder::new(1, Side::Player).build();
        let enemy = TestActorBuilder::new(2, Side::Enemy).build();
        let mut battle = create_test_battle(player, enemy);
        assert_eq!(
            battle.take_events(),
            vec![
                BattleEvent::SentOut {
                    side: Side::Player,
                    actor: ActorId(1),
                },
                BattleEvent::SentOut {
                    side: Side::Enemy,
                    actor: ActorId(2),
                },
            ]
        );

        submit_all(&mut battle, vec![(1, use_move(Move::Tackle, 2)), (2, use_move(Move::Tackle, 1))]);
        assert!(battle.ready_for_turn());
        let outcome = assert_ok(battle.resolve_turn());

        assert_eq!(outcome, DrainOutcome::Idle);
        assert_eq!(battle.state().actor(ActorId(1)).expect("actor 1").hp, 172);
        assert_eq!(battle.state().actor(ActorId(2)).expect("actor 2").hp, 172);
        assert_eq!(battle.state().turn_number, 2);
        assert_eq!(battle.state().game_state, GameState::WaitingForActions);

        let events = battle.events();
        assert_eq!(events.first(), Some(&BattleEvent::TurnStarted { turn_number: 1 }));
        assert_eq!(events.last(), Some(&BattleEvent::TurnEnded { turn_number: 1 }));
        assert!(!battle.event_bus().formatted(battle.state()).is_empty());
    }

    #[test]
    fn test_action_validation() {
        let player = TestActorBuilder::new(1, Side::Player).build();
        let reserve = TestActorBuilder::new(3, Side::Player).build();
        let enemy = TestActorBuilder::new(2, Side::Enemy).build();
        let mut battle = assert_config(test_battle().actor(player).actor(reserve).actor(enemy).build());

        assert!(matches!(
            battle.submit_action(ActorId(1), use_move(Move::SolarBeam, 2)),
            Err(BattleEngineError::Action(ActionError::UnknownMove {
                actor: ActorId(1),
                move_id: Move::SolarBeam,
            }))
        ));
        assert!(matches!(
            battle.submit_action(ActorId(3), use_move(Move::Tackle, 2)),
            Err(BattleEngineError::Action(ActionError::NotOnField(ActorId(3))))
        ));
        assert!(matches!(
            battle.submit_action(ActorId(1), BattleAction::Switch { replacement: ActorId(2) }),
            Err(BattleEngineError::Action(ActionError::InvalidSwitch(ActorId(2))))
        ));
        assert!(matches!(
            battle.submit_action(ActorId(1), BattleAction::Switch { replacement: ActorId(1) }),
            Err(BattleEngineError::Action(ActionError::InvalidSwitch(ActorId(1))))
        ));

        assert_ok(battle.submit_action(ActorId(1), use_move(Move::Tackle, 2)));
        assert!(matches!(
            battle.submit_action(ActorId(1), use_move(Move::Tackle, 2)),
            Err(BattleEngineError::Action(ActionError::AlreadySubmitted(ActorId(1))))
        ));

        match battle.begin_turn() {
            Err(BattleEngineError::BattleState(BattleStateError::MissingActions(missing))) => {
                assert_eq!(missing, vec![ActorId(2)]);
            }
            other => panic!("expected missing actions, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_targets_default_to_the_opponent() {
        let player = TestActorBuilder::new(1, Side::Player).build();
        let enemy = TestActorBuilder::new(2, Side::Enemy).build();
        let mut battle = create_test_battle(player, enemy);

        submit_all(
            &mut battle,
            vec![
                (
                    1,
                    BattleAction::UseMove {
                        move_id: Move::Tackle,
                        targets: Vec::new(),
                    },
                ),
                (2, use_move(Move::Tackle, 1)),
            ],
        );
        assert_ok(battle.resolve_turn());

        assert_eq!(battle.state().actor(ActorId(2)).expect("actor 2").hp, 172);
    }

    #[test]
    fn test_switch_runs_first_and_attacks_follow_the_newcomer() {
        let player = TestActorBuilder::new(1, Side::Player).build();
        let reserve = TestActorBuilder::new(3, Side::Player).build();
        let enemy = TestActorBuilder::new(2, Side::Enemy).with_speed(200).build();
        let mut battle = assert_config(test_battle().actor(player).actor(reserve).actor(enemy).build());
        battle
            .state
            .actor_mut(ActorId(1))
            .expect("actor 1")
            .set_stat_stage(StatType::Attack, 2);

        submit_all(
            &mut battle,
            vec![
                (1, BattleAction::Switch { replacement: ActorId(3) }),
                (2, use_move(Move::Tackle, 1)),
            ],
        );
        assert_ok(battle.resolve_turn());

        let outgoing = battle.state().actor(ActorId(1)).expect("actor 1");
        assert_eq!(outgoing.slot, None);
        assert_eq!(outgoing.hp, 200);
        assert_eq!(outgoing.get_stat_stage(StatType::Attack), 0);
        assert_eq!(battle.state().actor(ActorId(3)).expect("actor 3").hp, 172);
        assert!(battle.events().contains(&BattleEvent::Switched {
            side: Side::Player,
            outgoing: ActorId(1),
            incoming: ActorId(3),
        }));
    }

    #[test]
    fn test_spread_move_hits_every_target() {
        let builder = test_battle()
            .slots_per_side(2)
            .actor(
                TestActorBuilder::new(1, Side::Player)
                    .with_moves(vec![Move::RockSlide])
                    .with_speed(100)
                    .build(),
            )
            .actor(TestActorBuilder::new(3, Side::Player).build())
            .actor(TestActorBuilder::new(2, Side::Enemy).build())
            .actor(TestActorBuilder::new(4, Side::Enemy).build());
        let mut battle = assert_config(builder.build());

        submit_all(
            &mut battle,
            vec![
                (
                    1,
                    BattleAction::UseMove {
                        move_id: Move::RockSlide,
                        targets: vec![ActorId(2), ActorId(4)],
                    },
                ),
                (3, use_move(Move::Tackle, 2)),
                (2, use_move(Move::Tackle, 3)),
                (4, use_move(Move::Tackle, 3)),
            ],
        );
        assert_ok(battle.resolve_turn());

        // Rock Slide deals 35 to each, Tackle another 28 to actor 2
        assert_eq!(battle.state().actor(ActorId(2)).expect("actor 2").hp, 137);
        assert_eq!(battle.state().actor(ActorId(4)).expect("actor 4").hp, 165);
        let hits = battle
            .events()
            .iter()
            .filter(|e| matches!(e, BattleEvent::MoveHit { attacker, .. } if *attacker == ActorId(1)))
            .count();
        assert_eq!(hits, 2);
    }

    #[test]
    fn test_ai_collects_enemy_actions() {
        let player = TestActorBuilder::new(1, Side::Player)
            .with_types(vec![PokemonType::Fire])
            .build();
        let enemy = TestActorBuilder::new(2, Side::Enemy)
            .with_moves(vec![Move::Tackle, Move::WaterGun])
            .build();
        let mut battle = create_test_battle(player, enemy);

        let mut ai = ScoringAi::new();
        assert_ok(battle.collect_actions(Side::Enemy, &mut ai));
        assert_eq!(battle.actors_needing_action(), vec![ActorId(1)]);
        submit_all(&mut battle, vec![(1, use_move(Move::Tackle, 2))]);
        assert_ok(battle.resolve_turn());

        let last = battle
            .state()
            .actor(ActorId(2))
            .and_then(|actor| actor.last_move())
            .map(|record| record.move_id);
        assert_eq!(last, Some(Move::WaterGun));
    }

    #[test]
    fn test_builder_rejects_invalid_setups() {
        let config = assert_config(EngineConfig::builtin());
        let player = || TestActorBuilder::new(1, Side::Player).build();
        let enemy = || TestActorBuilder::new(2, Side::Enemy).build();

        let one_sided = test_battle().actor(player()).build();
        assert!(matches!(one_sided, Err(ConfigurationError::InvalidSetup(_))));

        let duplicate = test_battle().actor(player()).actor(player()).actor(enemy()).build();
        assert!(matches!(duplicate, Err(ConfigurationError::InvalidSetup(_))));

        let overfull = test_battle()
            .actor(player())
            .actor(enemy())
            .hold(ActorId(1), HeldItemId::SitrusBerry, 3)
            .build();
        assert!(matches!(overfull, Err(ConfigurationError::InvalidSetup(_))));

        let stranger = test_battle()
            .actor(player())
            .actor(enemy())
            .hold(ActorId(9), HeldItemId::Leftovers, 1)
            .build();
        assert!(matches!(stranger, Err(ConfigurationError::InvalidSetup(_))));

        let tackle_only: Vec<_> = config.moves.iter().filter(|m| m.id == Move::Tackle).cloned().collect();
        let registry = Arc::new(assert_config(EffectRegistry::from_config(&config.effects)));
        let moves: Arc<dyn MoveSource> = Arc::new(assert_config(MoveTable::from_config(&tackle_only)));
        let unknown_move = BattleBuilder::new(registry, moves)
            .actor(
                TestActorBuilder::new(1, Side::Player)
                    .with_moves(vec![Move::SolarBeam])
                    .build(),
            )
            .actor(enemy())
            .build();
        assert!(matches!(unknown_move, Err(ConfigurationError::UnknownMove(Move::SolarBeam))));
    }
}
