//! Monster Battle Engine
//!
//! A turn/phase execution engine for monster battles. A turn is expanded
//! into a queue of phases that run one at a time, may schedule more phases
//! and may suspend for outside input. Held items are stackable effects kept
//! in a per-actor ledger and applied through a pipeline at fixed trigger
//! points.

// --- MODULE DECLARATIONS ---
pub mod actor;
pub mod battle;
pub mod config;
pub mod errors;
pub mod items;
pub mod move_data;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    ChargeData, HeldItemId, Move, MoveCategory, MoveData, PokemonType, Side, StatType, StatusCondition, Weather,
};

// --- From this crate's modules (`src/`) ---

// Battle engine and its seams.
pub use battle::engine::{Battle, BattleBuilder, BattleSnapshot, DrainOutcome, StepOutcome};
pub use battle::interfaces::{ActionSource, NullPresenter, Playback, PresentationSink};
pub use battle::phase::{AnimationCue, Phase, PhaseId, PhaseKind, PhaseKindTag, PhaseState, ResumeInput, SuspendReason};
pub use battle::state::{BattleEvent, BattleState, GameState, TurnRng};
pub use battle::turn_orchestrator::BattleAction;

// Combatants and held items.
pub use actor::{Actor, ActorId, BaseStats, MoveResult, MoveUseRecord};
pub use items::{ComputationHolder, EffectRegistry, StackLedger, TriggerPoint};

// Static data.
pub use config::{EngineConfig, EngineOptions};
pub use move_data::{MoveSource, MoveTable};

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, BattleStateError, ConfigResult, ConfigurationError, PhaseError,
};
