use crate::actor::ActorId;
use crate::errors::PhaseError;
use schema::{HeldItemId, Move, Side};
use serde::{Deserialize, Serialize};
use strum::EnumDiscriminants;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhaseId(pub u64);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseState {
    Pending,
    Running,
    Ended,
}

/// Why a move phase was created.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOrigin {
    /// Chosen this turn.
    Selected,
    /// Released from the deferred queue on a later turn.
    Deferred,
    /// Follow-up of a charge that completed instantly.
    ChargeRelease,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(name(PhaseKindTag))]
#[strum_discriminants(derive(Hash, Serialize, Deserialize))]
pub enum PhaseKind {
    TurnStart,
    Switch {
        actor: ActorId,
        replacement: ActorId,
    },
    UseItem {
        user: ActorId,
        recipient: ActorId,
        item: HeldItemId,
    },
    Move {
        actor: ActorId,
        targets: Vec<ActorId>,
        move_id: Move,
        origin: MoveOrigin,
    },
    MoveCharge {
        actor: ActorId,
        target: Option<ActorId>,
        move_id: Move,
    },
    MoveEffect {
        actor: ActorId,
        target: ActorId,
        move_id: Move,
    },
    MoveEnd {
        actor: ActorId,
        move_id: Move,
    },
    Faint {
        actor: ActorId,
    },
    Experience {
        actor: ActorId,
        base_experience: u32,
    },
    EndOfTurn,
    TurnEnd,
    Replacement {
        side: Side,
        slot: u8,
    },
}

impl PhaseKind {
    pub fn tag(&self) -> PhaseKindTag {
        PhaseKindTag::from(self)
    }

    /// The actor this phase belongs to, if any.
    pub fn actor(&self) -> Option<ActorId> {
        match self {
            PhaseKind::Switch { actor, .. }
            | PhaseKind::Move { actor, .. }
            | PhaseKind::MoveCharge { actor, .. }
            | PhaseKind::MoveEffect { actor, .. }
            | PhaseKind::MoveEnd { actor, .. }
            | PhaseKind::Faint { actor }
            | PhaseKind::Experience { actor, .. } => Some(*actor),
            PhaseKind::UseItem { user, .. } => Some(*user),
            PhaseKind::TurnStart | PhaseKind::EndOfTurn | PhaseKind::TurnEnd | PhaseKind::Replacement { .. } => None,
        }
    }

    pub fn targets(&self) -> Vec<ActorId> {
        match self {
            PhaseKind::Move { targets, .. } => targets.clone(),
            PhaseKind::MoveCharge { target, .. } => target.iter().copied().collect(),
            PhaseKind::MoveEffect { target, .. } => vec![*target],
            PhaseKind::UseItem { recipient, .. } => vec![*recipient],
            _ => Vec::new(),
        }
    }
}

/// One unit of battle execution.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    id: PhaseId,
    kind: PhaseKind,
    state: PhaseState,
}

impl Phase {
    pub(crate) fn new(id: PhaseId, kind: PhaseKind) -> Self {
        Self {
            id,
            kind,
            state: PhaseState::Pending,
        }
    }

    pub fn id(&self) -> PhaseId {
        self.id
    }

    pub fn kind(&self) -> &PhaseKind {
        &self.kind
    }

    pub fn tag(&self) -> PhaseKindTag {
        self.kind.tag()
    }

    pub fn state(&self) -> PhaseState {
        self.state
    }

    /// Advances the lifecycle. Only `Pending -> Running -> Ended` is legal.
    pub fn transition(&mut self, to: PhaseState) -> Result<(), PhaseError> {
        let legal = matches!(
            (self.state, to),
            (PhaseState::Pending, PhaseState::Running) | (PhaseState::Running, PhaseState::Ended)
        );
        if !legal {
            return Err(PhaseError::InvalidTransition {
                phase: self.id,
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}

/// Outcome of starting or resuming a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseStep {
    /// Run the phase's end logic and move on.
    Finished,
    /// Preconditions failed; end without the phase's end logic.
    Abort,
    /// Wait for outside input before ending.
    Suspend(SuspendReason),
}

/// What a suspended battle is waiting for.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum SuspendReason {
    Animation(AnimationCue),
    ReplacementChoice {
        side: Side,
        slot: u8,
        options: Vec<ActorId>,
    },
}

/// Input that answers a [`SuspendReason`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeInput {
    AnimationComplete,
    Replacement(ActorId),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum AnimationCue {
    MoveCharge { actor: ActorId, move_id: Move },
}
