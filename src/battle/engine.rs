use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::actor::{Actor, ActorId, MoveResult, MoveUseRecord};
use crate::battle::interfaces::{ActionSource, NullPresenter, PresentationSink};
use crate::battle::phase::{Phase, PhaseKind, PhaseKindTag, PhaseStep, ResumeInput, SuspendReason};
use crate::battle::phases;
use crate::battle::scheduler::PhaseScheduler;
use crate::battle::state::{BattleEvent, BattleState, EventBus, GameState, TurnRng};
use crate::battle::turn_orchestrator::{build_turn_phases, BattleAction};
use crate::config::{EngineConfig, EngineOptions};
use crate::errors::{ActionError, BattleResult, BattleStateError, ConfigResult, ConfigurationError, PhaseError};
use crate::items::{
    apply_effects, ComputationHolder, EffectOutcome, EffectRegistry, LedgerSnapshot, PipelineReport, StackLedger,
    TriggerContext, TriggerPoint,
};
use crate::move_data::{MoveSource, MoveTable};
use schema::{HeldItemId, Move, MoveData, PokemonType, Side, StatusCondition, Weather};
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Result of executing a single phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Ran(PhaseKindTag),
    Suspended(SuspendReason),
    Idle,
}

/// Why a drain stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Nothing left to run.
    Idle,
    /// A phase is waiting on [`Battle::resume`].
    Suspended(SuspendReason),
    /// The next phase is of the requested kind and has not started.
    Reached(PhaseKindTag),
    /// The per-turn phase limit was hit and the queue was dropped.
    Halted,
}

/// What caused HP loss, for event reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DamageCause {
    Move,
    Status(StatusCondition),
    Weather(Weather),
}

/// Everything a persistence layer needs to save a battle.
#[derive(Serialize, Debug, Clone)]
pub struct BattleSnapshot {
    pub state: BattleState,
    pub ledger: LedgerSnapshot,
    pub pending_phases: Vec<Phase>,
    pub suspended: Option<SuspendReason>,
}

/// A running battle: state, held items, the phase queue and the seams to
/// the outside world.
pub struct Battle {
    pub(crate) state: BattleState,
    pub(crate) ledger: StackLedger,
    pub(crate) scheduler: PhaseScheduler,
    pub(crate) moves: Arc<dyn MoveSource>,
    pub(crate) presenter: Box<dyn PresentationSink>,
    pub(crate) bus: EventBus,
    pub(crate) rng: TurnRng,
    pub(crate) options: EngineOptions,
    pending_actions: BTreeMap<ActorId, BattleAction>,
    phases_this_turn: usize,
}

impl fmt::Debug for Battle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Battle")
            .field("state", &self.state)
            .field("ledger", &self.ledger)
            .field("scheduler", &self.scheduler)
            .field("events", &self.bus.len())
            .finish_non_exhaustive()
    }
}

impl Battle {
    // === Inspection ===

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn ledger(&self) -> &StackLedger {
        &self.ledger
    }

    /// Content generators grant, consume, transfer and steal through this.
    pub fn ledger_mut(&mut self) -> &mut StackLedger {
        &mut self.ledger
    }

    pub fn scheduler(&self) -> &PhaseScheduler {
        &self.scheduler
    }

    pub fn events(&self) -> &[BattleEvent] {
        self.bus.events()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        self.bus.take()
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn is_over(&self) -> bool {
        self.state.game_state.is_finished()
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            state: self.state.clone(),
            ledger: self.ledger.snapshot(),
            pending_phases: self.scheduler.pending().cloned().collect(),
            suspended: self.scheduler.suspension().cloned(),
        }
    }

    // === Action Input ===

    /// On-field actors that still owe an action this turn. Actors locked
    /// into a deferred move never do.
    pub fn actors_needing_action(&self) -> Vec<ActorId> {
        self.state
            .on_field()
            .into_iter()
            .filter(|id| !self.pending_actions.contains_key(id))
            .filter(|id| {
                self.state
                    .actor(*id)
                    .is_some_and(|actor| actor.deferred_moves.is_empty())
            })
            .collect()
    }

    pub fn ready_for_turn(&self) -> bool {
        self.state.game_state == GameState::WaitingForActions
            && !self.scheduler.is_suspended()
            && self.scheduler.is_empty()
            && self.actors_needing_action().is_empty()
    }

    pub fn submit_action(&mut self, actor_id: ActorId, action: BattleAction) -> BattleResult<()> {
        self.ensure_accepting_actions()?;

        let actor = self
            .state
            .actor(actor_id)
            .filter(|actor| actor.is_on_field())
            .ok_or(ActionError::NotOnField(actor_id))?;
        if !actor.deferred_moves.is_empty() {
            return Err(ActionError::ActionLocked(actor_id).into());
        }
        if self.pending_actions.contains_key(&actor_id) {
            return Err(ActionError::AlreadySubmitted(actor_id).into());
        }

        let action = match action {
            BattleAction::UseMove { move_id, targets } => {
                if !actor.knows_move(move_id) || self.moves.move_data(move_id).is_none() {
                    return Err(ActionError::UnknownMove {
                        actor: actor_id,
                        move_id,
                    }
                    .into());
                }
                let targets = if targets.is_empty() {
                    self.state.on_field_side(actor.side.opponent()).into_iter().take(1).collect()
                } else {
                    targets
                };
                BattleAction::UseMove { move_id, targets }
            }
            BattleAction::Switch { replacement } => {
                let valid = self.state.actor(replacement).is_some_and(|candidate| {
                    candidate.side == actor.side && candidate.slot.is_none() && !candidate.fainted
                });
                if !valid {
                    return Err(ActionError::InvalidSwitch(replacement).into());
                }
                BattleAction::Switch { replacement }
            }
            BattleAction::UseItem { item, recipient } => {
                self.ledger.registry().require(item)?;
                let valid = self
                    .state
                    .actor(recipient)
                    .is_some_and(|candidate| candidate.side == actor.side && !candidate.fainted);
                if !valid {
                    return Err(ActionError::NotOnField(recipient).into());
                }
                BattleAction::UseItem { item, recipient }
            }
        };

        debug!(actor = %actor_id, ?action, "action submitted");
        self.pending_actions.insert(actor_id, action);
        Ok(())
    }

    /// Asks `source` for every missing action on `side`.
    pub fn collect_actions(&mut self, side: Side, source: &mut dyn ActionSource) -> BattleResult<()> {
        for id in self.actors_needing_action() {
            let Some(actor) = self.state.actor(id).filter(|actor| actor.side == side) else {
                continue;
            };
            let action = source.choose(actor, &self.state, self.moves.as_ref());
            self.submit_action(id, action)?;
        }
        Ok(())
    }

    fn ensure_accepting_actions(&self) -> BattleResult<()> {
        if self.is_over() {
            return Err(BattleStateError::BattleOver.into());
        }
        if self.scheduler.is_suspended() {
            return Err(BattleStateError::Suspended.into());
        }
        if self.state.game_state != GameState::WaitingForActions {
            return Err(BattleStateError::NotAcceptingActions.into());
        }
        Ok(())
    }

    // === Turn Execution ===

    /// Expands the submitted actions into this turn's phases without running
    /// any of them.
    pub fn begin_turn(&mut self) -> BattleResult<()> {
        self.ensure_accepting_actions()?;
        if !self.scheduler.is_empty() {
            return Err(BattleStateError::PhasesPending.into());
        }
        let missing = self.actors_needing_action();
        if !missing.is_empty() {
            return Err(BattleStateError::MissingActions(missing).into());
        }

        let phases = build_turn_phases(&mut self.state, self.moves.as_ref(), &mut self.pending_actions);
        info!(turn = self.state.turn_number, phases = phases.len(), "turn started");
        for kind in phases {
            self.scheduler.push_back(kind);
        }
        self.state.game_state = GameState::TurnInProgress;
        self.phases_this_turn = 0;
        Ok(())
    }

    /// Begins the turn and drains it.
    pub fn resolve_turn(&mut self) -> BattleResult<DrainOutcome> {
        self.begin_turn()?;
        Ok(self.drain())
    }

    /// Runs phases until the queue is empty or a phase suspends.
    pub fn drain(&mut self) -> DrainOutcome {
        self.run_until(None)
    }

    /// Runs phases until the next one is of kind `tag`, leaving it unstarted.
    pub fn run_to_phase_kind(&mut self, tag: PhaseKindTag) -> DrainOutcome {
        self.run_until(Some(tag))
    }

    fn run_until(&mut self, stop_at: Option<PhaseKindTag>) -> DrainOutcome {
        loop {
            if let Some(reason) = self.scheduler.suspension() {
                return DrainOutcome::Suspended(reason.clone());
            }
            let Some(next) = self.scheduler.peek().map(Phase::tag) else {
                return DrainOutcome::Idle;
            };
            if stop_at == Some(next) {
                return DrainOutcome::Reached(next);
            }
            if self.phases_this_turn >= self.options.max_phases_per_turn {
                error!(
                    limit = self.options.max_phases_per_turn,
                    "phase limit reached, dropping the rest of the turn"
                );
                self.scheduler.clear_pending();
                if !self.is_over() {
                    self.state.game_state = GameState::WaitingForActions;
                }
                return DrainOutcome::Halted;
            }
            if let StepOutcome::Idle = self.step() {
                return DrainOutcome::Idle;
            }
        }
    }

    /// Runs exactly one phase from start to end, or until it suspends.
    pub fn step(&mut self) -> StepOutcome {
        if let Some(reason) = self.scheduler.suspension() {
            return StepOutcome::Suspended(reason.clone());
        }
        let phase = match self.scheduler.start_next() {
            Ok(Some(phase)) => phase,
            Ok(None) => return StepOutcome::Idle,
            Err(err) => {
                self.report_invariant(&err);
                return StepOutcome::Idle;
            }
        };
        self.phases_this_turn += 1;
        debug!(phase = phase.id().0, kind = ?phase.tag(), "phase started");

        let step = phases::start(self, &phase);
        self.settle(&phase, step)
    }

    /// Answers the pending suspension and keeps draining.
    pub fn resume(&mut self, input: ResumeInput) -> BattleResult<DrainOutcome> {
        let Some(reason) = self.scheduler.suspension().cloned() else {
            return Err(BattleStateError::NotSuspended.into());
        };
        match (&reason, input) {
            (SuspendReason::Animation(_), ResumeInput::AnimationComplete) => {}
            (SuspendReason::ReplacementChoice { options, .. }, ResumeInput::Replacement(choice)) => {
                if !options.contains(&choice) {
                    return Err(ActionError::InvalidReplacement(choice).into());
                }
            }
            _ => return Err(ActionError::UnexpectedInput.into()),
        }
        let Some(phase) = self.scheduler.current().cloned() else {
            return Err(BattleStateError::NotSuspended.into());
        };

        self.scheduler.take_suspension();
        debug!(phase = phase.id().0, kind = ?phase.tag(), ?input, "phase resumed");
        let step = phases::resume(self, &phase, input);
        self.settle(&phase, step);
        Ok(self.drain())
    }

    fn settle(&mut self, phase: &Phase, step: Result<PhaseStep, PhaseError>) -> StepOutcome {
        match step {
            Ok(PhaseStep::Suspend(reason)) => {
                debug!(phase = phase.id().0, ?reason, "phase suspended");
                self.scheduler.suspend(reason.clone());
                return StepOutcome::Suspended(reason);
            }
            Ok(PhaseStep::Finished) => {
                if let Err(err) = phases::end(self, phase) {
                    error!(phase = phase.id().0, kind = ?phase.tag(), %err, "phase end failed");
                }
            }
            Ok(PhaseStep::Abort) => {
                debug!(phase = phase.id().0, kind = ?phase.tag(), "phase aborted");
            }
            Err(err) => {
                error!(phase = phase.id().0, kind = ?phase.tag(), %err, "phase failed, forcing end");
            }
        }
        if let Err(err) = self.scheduler.finish_current() {
            self.report_invariant(&err);
        }
        StepOutcome::Ran(phase.tag())
    }

    /// Queues a phase at the back. Intended for content and tests that
    /// inject work between turns.
    pub fn schedule_back(&mut self, kind: PhaseKind) {
        self.scheduler.push_back(kind);
    }

    /// Queues a phase ahead of everything pending. Several calls between
    /// turns run in the order they were made.
    pub fn schedule_front(&mut self, kind: PhaseKind) {
        self.scheduler.push_front(kind);
    }

    // === Helpers for phase handlers ===

    pub(crate) fn report_invariant(&self, violation: &PhaseError) {
        if self.options.strict() {
            panic!("battle invariant violated: {violation}");
        }
        error!(%violation, "battle invariant violated");
    }

    pub(crate) fn emit(&mut self, event: BattleEvent) {
        self.presenter.announce(&event);
        self.bus.push(event);
    }

    pub(crate) fn actor(&self, id: ActorId) -> Result<&Actor, PhaseError> {
        self.state.actor(id).ok_or(PhaseError::UnknownActor(id))
    }

    pub(crate) fn actor_mut(&mut self, id: ActorId) -> Result<&mut Actor, PhaseError> {
        self.state.actor_mut(id).ok_or(PhaseError::UnknownActor(id))
    }

    pub(crate) fn move_data(&self, move_id: Move) -> Result<MoveData, PhaseError> {
        self.moves
            .move_data(move_id)
            .cloned()
            .ok_or(PhaseError::MissingMoveData(move_id))
    }

    pub(crate) fn record_move(
        &mut self,
        actor: ActorId,
        move_id: Move,
        targets: Vec<ActorId>,
        result: MoveResult,
    ) -> Result<(), PhaseError> {
        let turn = self.state.turn_number;
        self.actor_mut(actor)?.record_move(MoveUseRecord {
            move_id,
            targets,
            result,
            turn,
        });
        Ok(())
    }

    /// Runs the actor's held items for `trigger` and reports what they did
    /// as battle events.
    pub(crate) fn run_pipeline(
        &mut self,
        actor_id: ActorId,
        trigger: TriggerPoint,
        move_type: Option<PokemonType>,
        holder: &mut ComputationHolder,
    ) -> PipelineReport {
        let Some(actor) = self.state.actors.get_mut(&actor_id) else {
            return PipelineReport::default();
        };
        let mut ctx = TriggerContext::new(actor);
        ctx.move_type = move_type;
        let report = apply_effects(&mut self.ledger, trigger, &mut ctx, holder);
        let outcomes = std::mem::take(&mut ctx.outcomes);

        for item in &report.fired {
            self.emit(BattleEvent::ItemActivated {
                actor: actor_id,
                item: *item,
            });
        }
        for outcome in outcomes {
            let event = match outcome {
                EffectOutcome::Healed(amount) => BattleEvent::Healed {
                    target: actor_id,
                    amount,
                    new_hp: self.state.actor(actor_id).map_or(0, |actor| actor.hp),
                },
                EffectOutcome::StatRaised {
                    stat,
                    old_stage,
                    new_stage,
                } => BattleEvent::StatStageChanged {
                    target: actor_id,
                    stat,
                    old_stage,
                    new_stage,
                },
                EffectOutcome::StatusCured(status) => BattleEvent::StatusCured {
                    target: actor_id,
                    status,
                },
                EffectOutcome::StatusInflicted(status) => BattleEvent::StatusApplied {
                    target: actor_id,
                    status,
                },
            };
            self.emit(event);
        }
        for item in &report.consumed {
            self.emit(BattleEvent::ItemConsumed {
                actor: actor_id,
                item: *item,
            });
        }
        report
    }

    /// Gives HP-threshold items (berries) a chance to react.
    pub(crate) fn check_hp_items(&mut self, actor: ActorId) -> PipelineReport {
        let mut holder = ComputationHolder::Flag(false);
        self.run_pipeline(actor, TriggerPoint::HpThreshold, None, &mut holder)
    }

    /// Weighs a nature multiplier for `actor` through its held items and
    /// returns the adjusted value. Neutral (1.0) is returned unchanged.
    pub fn weigh_nature(&mut self, actor: ActorId, multiplier: f64) -> f64 {
        let mut holder = ComputationHolder::Ratio(multiplier);
        self.run_pipeline(actor, TriggerPoint::NatureWeight, None, &mut holder);
        holder.ratio().unwrap_or(multiplier)
    }

    /// Applies HP loss. A knockout schedules a `Faint` phase right after the
    /// current one; a survivor gets its HP-threshold items checked.
    pub(crate) fn deal_damage(&mut self, target: ActorId, amount: u16, cause: DamageCause) -> Result<u16, PhaseError> {
        let actor = self.actor_mut(target)?;
        let dealt = actor.take_damage(amount);
        let remaining_hp = actor.hp;

        let event = match cause {
            DamageCause::Move => BattleEvent::DamageDealt {
                target,
                damage: dealt,
                remaining_hp,
            },
            DamageCause::Status(status) => BattleEvent::StatusDamage {
                target,
                status,
                damage: dealt,
            },
            DamageCause::Weather(weather) => BattleEvent::WeatherDamage {
                target,
                weather,
                damage: dealt,
            },
        };
        self.emit(event);

        if remaining_hp == 0 {
            if dealt > 0 {
                self.scheduler.push_front(PhaseKind::Faint { actor: target });
            }
        } else {
            self.check_hp_items(target);
        }
        Ok(dealt)
    }

    /// Ends the battle if a side has nobody left. Pending phases other than
    /// experience awards are dropped.
    pub(crate) fn check_battle_end(&mut self) -> bool {
        if self.is_over() {
            return true;
        }
        let player_out = self.state.side_defeated(Side::Player);
        let enemy_out = self.state.side_defeated(Side::Enemy);
        let (game_state, winner) = match (player_out, enemy_out) {
            (false, false) => return false,
            (true, true) => (GameState::Draw, None),
            (true, false) => (GameState::EnemyWin, Some(Side::Enemy)),
            (false, true) => (GameState::PlayerWin, Some(Side::Player)),
        };

        self.state.game_state = game_state;
        self.emit(BattleEvent::BattleEnded { winner });
        let dropped = self
            .scheduler
            .remove_where(|phase| phase.tag() != PhaseKindTag::Experience);
        info!(?winner, dropped, "battle ended");
        true
    }

    pub(crate) fn end_turn_bookkeeping(&mut self) {
        self.pending_actions.clear();
        if !self.is_over() {
            self.state.game_state = GameState::WaitingForActions;
        }
    }
}

/// Assembles a [`Battle`], validating the setup against the registries.
pub struct BattleBuilder {
    battle_id: String,
    registry: Arc<EffectRegistry>,
    moves: Arc<dyn MoveSource>,
    options: EngineOptions,
    actors: Vec<Actor>,
    held_items: Vec<(ActorId, HeldItemId, u32)>,
    slots_per_side: u8,
    weather: Option<(Weather, Option<u8>)>,
    presenter: Option<Box<dyn PresentationSink>>,
    rng: Option<TurnRng>,
}

impl BattleBuilder {
    pub fn new(registry: Arc<EffectRegistry>, moves: Arc<dyn MoveSource>) -> Self {
        Self {
            battle_id: "battle".to_string(),
            registry,
            moves,
            options: EngineOptions::default(),
            actors: Vec::new(),
            held_items: Vec::new(),
            slots_per_side: 1,
            weather: None,
            presenter: None,
            rng: None,
        }
    }

    /// Builds both registries from `config` and adopts its options.
    pub fn from_config(config: &EngineConfig) -> ConfigResult<Self> {
        let registry = Arc::new(EffectRegistry::from_config(&config.effects)?);
        let moves: Arc<dyn MoveSource> = Arc::new(MoveTable::from_config(&config.moves)?);
        Ok(Self::new(registry, moves).options(config.options.clone()))
    }

    pub fn battle_id(mut self, battle_id: impl Into<String>) -> Self {
        self.battle_id = battle_id.into();
        self
    }

    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn slots_per_side(mut self, slots: u8) -> Self {
        self.slots_per_side = slots;
        self
    }

    /// Adds an actor. The first actors of each side, in insertion order,
    /// start on the field.
    pub fn actor(mut self, actor: Actor) -> Self {
        self.actors.push(actor);
        self
    }

    pub fn hold(mut self, actor: ActorId, item: HeldItemId, count: u32) -> Self {
        self.held_items.push((actor, item, count));
        self
    }

    /// Starting weather for the configured default duration.
    pub fn weather(mut self, weather: Weather) -> Self {
        self.weather = Some((weather, None));
        self
    }

    pub fn weather_for(mut self, weather: Weather, turns: u8) -> Self {
        self.weather = Some((weather, Some(turns)));
        self
    }

    pub fn presenter(mut self, presenter: Box<dyn PresentationSink>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn rng(mut self, rng: TurnRng) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn build(self) -> ConfigResult<Battle> {
        if self.slots_per_side == 0 {
            return Err(ConfigurationError::InvalidSetup("a side needs at least one slot".to_string()));
        }
        let mut seen = std::collections::BTreeSet::new();
        for actor in &self.actors {
            if !seen.insert(actor.id) {
                return Err(ConfigurationError::InvalidSetup(format!("actor {} is listed twice", actor.id)));
            }
            for move_id in &actor.moves {
                if self.moves.move_data(*move_id).is_none() {
                    return Err(ConfigurationError::UnknownMove(*move_id));
                }
            }
        }
        for side in [Side::Player, Side::Enemy] {
            if !self.actors.iter().any(|actor| actor.side == side && !actor.fainted) {
                return Err(ConfigurationError::InvalidSetup(format!("{side:?} has no able actors")));
            }
        }

        let mut ledger = StackLedger::new(Arc::clone(&self.registry));
        for (actor, item, count) in &self.held_items {
            let max_stack = self.registry.require(*item)?.descriptor.max_stack;
            if !seen.contains(actor) {
                return Err(ConfigurationError::InvalidSetup(format!("{item} given to unknown actor {actor}")));
            }
            if *count == 0 || ledger.get_stack(*actor, *item) + count > max_stack {
                return Err(ConfigurationError::InvalidSetup(format!(
                    "actor {actor} cannot hold {count} more {item} (max {max_stack})"
                )));
            }
            ledger.grant(*actor, *item, *count);
        }

        let mut actors = self.actors;
        let mut bus = EventBus::new();
        for side in [Side::Player, Side::Enemy] {
            let mut next_slot = 0;
            for actor in actors.iter_mut().filter(|actor| actor.side == side) {
                actor.slot = None;
                if next_slot < self.slots_per_side && !actor.fainted {
                    actor.slot = Some(next_slot);
                    next_slot += 1;
                    bus.push(BattleEvent::SentOut { side, actor: actor.id });
                }
            }
        }

        let mut state = BattleState::new(self.battle_id, actors, self.slots_per_side);
        if let Some((weather, turns)) = self.weather {
            if weather != Weather::Clear {
                state.weather.weather = weather;
                state.weather.turns_remaining = Some(turns.unwrap_or(self.options.default_weather_turns));
            }
        }

        if self.rng.is_none() {
            warn!("no rng supplied, using live randomness");
        }
        debug!(battle = %state.battle_id, actors = state.actors.len(), "battle built");

        Ok(Battle {
            state,
            ledger,
            scheduler: PhaseScheduler::new(),
            moves: self.moves,
            presenter: self.presenter.unwrap_or_else(|| Box::new(NullPresenter)),
            bus,
            rng: self.rng.unwrap_or_else(TurnRng::new_random),
            options: self.options,
            pending_actions: BTreeMap::new(),
            phases_this_turn: 0,
        })
    }
}
