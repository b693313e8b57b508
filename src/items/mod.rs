//! Held items: stackable, typed effects attached to actors.
//!
//! The registry says what each item does, the ledger says who holds how
//! many, and the pipeline applies them at a trigger point.

pub mod behavior;
pub mod descriptor;
pub mod ledger;
pub mod pipeline;
pub mod registry;

pub use behavior::{BerryKind, ComputationHolder, EffectBehavior, EffectOutcome, TriggerContext};
pub use descriptor::{EffectDescriptor, TriggerPoint};
pub use ledger::{LedgerSnapshot, StackLedger};
pub use pipeline::{apply_effects, PipelineReport};
pub use registry::{EffectRegistry, RegisteredEffect};
