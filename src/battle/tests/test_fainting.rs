#[cfg(test)]
mod tests {
    use crate::actor::ActorId;
    use crate::battle::engine::DrainOutcome;
    use crate::battle::phase::{PhaseKind, PhaseKindTag, ResumeInput, SuspendReason};
    use crate::battle::scheduler::PhaseRecord;
    use crate::battle::state::{BattleEvent, GameState};
    use crate::battle::tests::common::{
        assert_config, assert_ok, create_test_battle, submit_all, test_battle, use_move, TestActorBuilder,
    };
    use crate::errors::{ActionError, BattleEngineError, BattleStateError};
    use pretty_assertions::assert_eq;
    use schema::{HeldItemId, Move, Side};

    #[test]
    fn test_knockout_cancels_the_fainted_actors_phases() {
        let player = TestActorBuilder::new(1, Side::Player).with_speed(100).build();
        let enemy = TestActorBuilder::new(2, Side::Enemy).with_hp(10).build();
        let mut battle = create_test_battle(player, enemy);

        submit_all(&mut battle, vec![(1, use_move(Move::Tackle, 2)), (2, use_move(Move::Tackle, 1))]);
        assert_ok(battle.resolve_turn());

        let tags: Vec<PhaseKindTag> = battle.scheduler().completed().iter().map(PhaseRecord::tag).collect();
        assert_eq!(
            tags,
            vec![
                PhaseKindTag::TurnStart,
                PhaseKindTag::Move,
                PhaseKindTag::MoveEffect,
                PhaseKindTag::Faint,
                PhaseKindTag::Experience,
            ]
        );

        let fainted = battle.state().actor(ActorId(2)).expect("actor 2");
        assert!(fainted.fainted);
        assert!(fainted.move_history.is_empty());
        assert_eq!(battle.state().actor(ActorId(1)).expect("actor 1").hp, 200);
        assert_eq!(battle.state().game_state, GameState::PlayerWin);
        assert!(battle.events().contains(&BattleEvent::BattleEnded {
            winner: Some(Side::Player),
        }));
        assert!(battle.scheduler().is_empty());
    }

    #[test]
    fn test_knockout_awards_experience_and_friendship() {
        let player = TestActorBuilder::new(1, Side::Player).with_speed(100).build();
        let enemy = TestActorBuilder::new(2, Side::Enemy).with_hp(10).build();
        let mut battle = create_test_battle(player, enemy);

        submit_all(&mut battle, vec![(1, use_move(Move::Tackle, 2)), (2, use_move(Move::Tackle, 1))]);
        assert_ok(battle.resolve_turn());

        // 64 base yield at level 50: 64 * 50 / 7
        let winner = battle.state().actor(ActorId(1)).expect("actor 1");
        assert_eq!(winner.experience, 457);
        assert_eq!(winner.friendship, 74);
        assert!(battle.events().contains(&BattleEvent::ExperienceGained {
            actor: ActorId(1),
            amount: 457,
        }));
    }

    #[test]
    fn test_gain_boosters_scale_rewards() {
        let player = TestActorBuilder::new(1, Side::Player).with_speed(100).build();
        let enemy = TestActorBuilder::new(2, Side::Enemy).with_hp(10).build();
        let mut battle = assert_config(
            test_battle()
                .actor(player)
                .actor(enemy)
                .hold(ActorId(1), HeldItemId::LuckyEgg, 1)
                .hold(ActorId(1), HeldItemId::SootheBell, 1)
                .build(),
        );

        submit_all(&mut battle, vec![(1, use_move(Move::Tackle, 2)), (2, use_move(Move::Tackle, 1))]);
        assert_ok(battle.resolve_turn());

        let winner = battle.state().actor(ActorId(1)).expect("actor 1");
        assert_eq!(winner.experience, 639);
        assert_eq!(winner.friendship, 76);
    }

    #[test]
    fn test_finished_battle_rejects_actions() {
        let player = TestActorBuilder::new(1, Side::Player).with_speed(100).build();
        let enemy = TestActorBuilder::new(2, Side::Enemy).with_hp(10).build();
        let mut battle = create_test_battle(player, enemy);

        submit_all(&mut battle, vec![(1, use_move(Move::Tackle, 2)), (2, use_move(Move::Tackle, 1))]);
        assert_ok(battle.resolve_turn());

        assert!(battle.is_over());
        assert!(matches!(
            battle.submit_action(ActorId(1), use_move(Move::Tackle, 2)),
            Err(BattleEngineError::BattleState(BattleStateError::BattleOver))
        ));
    }

    #[test]
    fn test_player_chooses_replacement_after_a_knockout() {
        let lead = TestActorBuilder::new(1, Side::Player).with_hp(10).build();
        let reserve = TestActorBuilder::new(3, Side::Player).build();
        let enemy = TestActorBuilder::new(2, Side::Enemy).with_speed(100).build();
        let mut battle = assert_config(test_battle().actor(lead).actor(reserve).actor(enemy).build());

        submit_all(&mut battle, vec![(1, use_move(Move::Tackle, 2)), (2, use_move(Move::Tackle, 1))]);
        let outcome = assert_ok(battle.resolve_turn());

        let expected = SuspendReason::ReplacementChoice {
            side: Side::Player,
            slot: 0,
            options: vec![ActorId(3)],
        };
        assert_eq!(outcome, DrainOutcome::Suspended(expected));
        assert!(!battle.ready_for_turn());
        assert_eq!(battle.state().actor(ActorId(1)).expect("actor 1").move_history.len(), 0);
        assert_eq!(battle.state().game_state, GameState::WaitingForActions);

        assert!(matches!(
            battle.submit_action(ActorId(2), use_move(Move::Tackle, 3)),
            Err(BattleEngineError::BattleState(BattleStateError::Suspended))
        ));
        assert!(matches!(
            battle.resume(ResumeInput::AnimationComplete),
            Err(BattleEngineError::Action(ActionError::UnexpectedInput))
        ));
        assert!(matches!(
            battle.resume(ResumeInput::Replacement(ActorId(9))),
            Err(BattleEngineError::Action(ActionError::InvalidReplacement(ActorId(9))))
        ));

        let outcome = assert_ok(battle.resume(ResumeInput::Replacement(ActorId(3))));
        assert_eq!(outcome, DrainOutcome::Idle);
        assert_eq!(battle.state().actor(ActorId(3)).expect("actor 3").slot, Some(0));
        assert_eq!(battle.state().actor(ActorId(1)).expect("actor 1").slot, None);
        assert!(battle.events().contains(&BattleEvent::SentOut {
            side: Side::Player,
            actor: ActorId(3),
        }));
        assert_eq!(battle.actors_needing_action(), vec![ActorId(3), ActorId(2)]);
        assert!(!battle.is_over());
    }

    #[test]
    fn test_enemy_sends_in_its_next_actor_without_asking() {
        let player = TestActorBuilder::new(1, Side::Player).with_speed(100).build();
        let lead = TestActorBuilder::new(2, Side::Enemy).with_hp(10).build();
        let reserve = TestActorBuilder::new(4, Side::Enemy).build();
        let mut battle = assert_config(test_battle().actor(player).actor(lead).actor(reserve).build());

        submit_all(&mut battle, vec![(1, use_move(Move::Tackle, 2)), (2, use_move(Move::Tackle, 1))]);
        let outcome = assert_ok(battle.resolve_turn());

        assert_eq!(outcome, DrainOutcome::Idle);
        assert_eq!(battle.state().on_field_side(Side::Enemy), vec![ActorId(4)]);
        assert_eq!(battle.actors_needing_action(), vec![ActorId(1), ActorId(4)]);
        assert_eq!(battle.state().turn_number, 2);
    }

    #[test]
    fn test_first_side_wiped_out_loses() {
        let player = TestActorBuilder::new(1, Side::Player).build();
        let enemy = TestActorBuilder::new(2, Side::Enemy).build();
        let mut battle = create_test_battle(player, enemy);

        battle.state.actor_mut(ActorId(1)).expect("actor 1").hp = 0;
        battle.state.actor_mut(ActorId(2)).expect("actor 2").hp = 0;
        battle.schedule_back(PhaseKind::Faint { actor: ActorId(1) });
        battle.schedule_back(PhaseKind::Faint { actor: ActorId(2) });
        assert_eq!(battle.drain(), DrainOutcome::Idle);

        assert_eq!(battle.state().game_state, GameState::EnemyWin);
        assert!(!battle.state().actor(ActorId(2)).expect("actor 2").fainted);
    }
}
