use crate::config::EffectEntry;
use schema::HeldItemId;
use serde::{Deserialize, Serialize};

/// Points in phase execution where held effects are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerPoint {
    AccuracyCheck,
    PowerCheck,
    FriendshipGain,
    ExperienceGain,
    /// After the holder's HP changes, and when an item is handed over.
    HpThreshold,
    EndOfTurn,
    /// When a charging move decides whether to skip its charge turn.
    InstantCharge,
    /// When a nature multiplier is weighed for the holder.
    NatureWeight,
}

/// Immutable per-effect metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectDescriptor {
    pub id: HeldItemId,
    pub trigger: TriggerPoint,
    pub max_stack: u32,
    pub consumable: bool,
    pub transferable: bool,
    pub stealable: bool,
    pub suppressable: bool,
}

impl From<&EffectEntry> for EffectDescriptor {
    fn from(entry: &EffectEntry) -> Self {
        Self {
            id: entry.id,
            trigger: entry.trigger,
            max_stack: entry.max_stack,
            consumable: entry.consumable,
            transferable: entry.transferable,
            stealable: entry.stealable,
            suppressable: entry.suppressable,
        }
    }
}
