use crate::config::EffectEntry;
use crate::errors::{ConfigResult, ConfigurationError};
use crate::items::{EffectBehavior, EffectDescriptor};
use schema::HeldItemId;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredEffect {
    pub descriptor: EffectDescriptor,
    pub behavior: EffectBehavior,
}

/// Maps every known held item to its descriptor and behavior.
///
/// Built once from configuration and shared read-only (behind an `Arc`) by
/// every battle.
#[derive(Debug, Clone, Default)]
pub struct EffectRegistry {
    effects: HashMap<HeldItemId, RegisteredEffect>,
}

impl EffectRegistry {
    pub fn from_config(entries: &[EffectEntry]) -> ConfigResult<Self> {
        let mut effects = HashMap::with_capacity(entries.len());

        for entry in entries {
            let Some(behavior_config) = &entry.behavior else {
                return Err(ConfigurationError::MissingBehavior(entry.id));
            };
            if entry.max_stack == 0 {
                return Err(ConfigurationError::InvalidMaxStack(entry.id));
            }
            let behavior = EffectBehavior::from_config(entry.id, behavior_config)?;
            if behavior.trigger() != entry.trigger {
                return Err(ConfigurationError::TriggerMismatch {
                    id: entry.id,
                    declared: entry.trigger,
                    expected: behavior.trigger(),
                });
            }

            let registered = RegisteredEffect {
                descriptor: EffectDescriptor::from(entry),
                behavior,
            };
            if effects.insert(entry.id, registered).is_some() {
                return Err(ConfigurationError::DuplicateEffect(entry.id));
            }
        }

        debug!(effects = effects.len(), "effect registry built");
        Ok(Self { effects })
    }

    pub fn get(&self, id: HeldItemId) -> Option<&RegisteredEffect> {
        self.effects.get(&id)
    }

    pub fn descriptor(&self, id: HeldItemId) -> Option<&EffectDescriptor> {
        self.effects.get(&id).map(|effect| &effect.descriptor)
    }

    /// Like [`get`](Self::get), for setup code where absence is fatal.
    pub fn require(&self, id: HeldItemId) -> ConfigResult<&RegisteredEffect> {
        self.get(id).ok_or(ConfigurationError::UnregisteredEffect(id))
    }

    pub fn contains(&self, id: HeldItemId) -> bool {
        self.effects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
