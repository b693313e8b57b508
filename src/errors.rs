use crate::battle::phase::{PhaseId, PhaseKindTag, PhaseState};
use crate::actor::ActorId;
use crate::items::TriggerPoint;
use schema::{HeldItemId, Move};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the battle engine
#[derive(Debug, Error)]
pub enum BattleEngineError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("phase error: {0}")]
    Phase(#[from] PhaseError),
    #[error("battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    #[error("action error: {0}")]
    Action(#[from] ActionError),
}

/// Fatal setup errors. Raised while loading tables or building a battle,
/// never once a battle is running.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("effect {0} has no behavior")]
    MissingBehavior(HeldItemId),
    #[error("effect {0} is registered more than once")]
    DuplicateEffect(HeldItemId),
    #[error("effect {0} declares a max stack of zero")]
    InvalidMaxStack(HeldItemId),
    #[error("effect {id} declares trigger {declared:?} but its behavior runs at {expected:?}")]
    TriggerMismatch {
        id: HeldItemId,
        declared: TriggerPoint,
        expected: TriggerPoint,
    },
    #[error("effect {id} has an invalid parameter: {reason}")]
    InvalidParameter { id: HeldItemId, reason: String },
    #[error("effect {0} is not registered")]
    UnregisteredEffect(HeldItemId),
    #[error("move {0} is defined more than once")]
    DuplicateMove(Move),
    #[error("move {0} is not in the move table")]
    UnknownMove(Move),
    #[error("battle setup is invalid: {0}")]
    InvalidSetup(String),
}

/// Failures raised while a phase runs. The drain loop logs these and forces
/// the phase to end.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhaseError {
    #[error("phase {phase:?} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        phase: PhaseId,
        from: PhaseState,
        to: PhaseState,
    },
    #[error("phase refers to unknown actor {0}")]
    UnknownActor(ActorId),
    #[error("move {0} has no data")]
    MissingMoveData(Move),
    #[error("{0:?} phase was resumed with input it does not accept")]
    UnexpectedResume(PhaseKindTag),
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    #[error("phases from the previous turn are still pending")]
    PhasesPending,
    #[error("battle is not waiting for actions")]
    NotAcceptingActions,
    #[error("battle is not suspended")]
    NotSuspended,
    #[error("battle is suspended and must be resumed first")]
    Suspended,
    #[error("actions are still missing for {0:?}")]
    MissingActions(Vec<ActorId>),
    #[error("battle has already ended")]
    BattleOver,
}

/// Errors related to submitted actions and resume input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("actor {0} is not on the field")]
    NotOnField(ActorId),
    #[error("actor {0} already submitted an action this turn")]
    AlreadySubmitted(ActorId),
    #[error("actor {0} is locked into a charging move")]
    ActionLocked(ActorId),
    #[error("actor {actor} does not know {move_id}")]
    UnknownMove { actor: ActorId, move_id: Move },
    #[error("actor {0} cannot be switched in")]
    InvalidSwitch(ActorId),
    #[error("actor {0} is not a valid replacement")]
    InvalidReplacement(ActorId),
    #[error("resume input does not answer the pending request")]
    UnexpectedInput,
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using ConfigurationError
pub type ConfigResult<T> = Result<T, ConfigurationError>;
